//! Glossary loading shared by the vocabulary checks.

use tracing::debug;

use spec_lint_core::paths::PathMatcher;
use spec_lint_core::{
    CheckContext, CheckError, DocumentError, GlossaryFile, GlossaryIndex, LintResult, Location,
    Violation,
};

/// Outcome of loading the glossary: an index to check against, or a verdict
/// that ends the check.
pub(crate) enum Glossary {
    Loaded(GlossaryIndex),
    Verdict(LintResult),
}

/// Loads the configured glossary.
///
/// A missing glossary skips the check. Invalid YAML and an empty term set
/// are structural failures reported under `code`.
pub(crate) fn load(
    ctx: &CheckContext,
    check: &'static str,
    code: &'static str,
) -> Result<Glossary, CheckError> {
    let path = ctx.config.glossary.path.to_string_lossy().replace('\\', "/");
    if !ctx.documents.exists(&path) {
        debug!("{check}: {path} not found");
        return Ok(Glossary::Verdict(LintResult::skipped(
            check,
            format!("{path} not found"),
        )));
    }

    let file: GlossaryFile = match ctx.documents.load_yaml(&path) {
        Ok(file) => file,
        Err(e @ DocumentError::Yaml { .. }) => {
            return Ok(Glossary::Verdict(LintResult::failed(
                check,
                Violation::structural(code, "glossary-shape", Location::file(&path), e.to_string()),
            )));
        }
        Err(e) => return Err(e.into()),
    };

    let index = GlossaryIndex::from_file(&file, ctx.markers());
    if index.is_empty() {
        return Ok(Glossary::Verdict(LintResult::failed(
            check,
            Violation::structural(
                code,
                "glossary-shape",
                Location::file(&path),
                "glossary has no terms",
            ),
        )));
    }
    debug!("{check}: {} term(s) declared in {path}", index.len());
    Ok(Glossary::Loaded(index))
}

/// Process and decision documents scanned for terms, sorted.
pub(crate) fn documents(ctx: &CheckContext) -> Result<Vec<String>, CheckError> {
    let matcher = PathMatcher::new(ctx.config.glossary_documents())?;
    Ok(ctx.documents.find(&matcher)?)
}
