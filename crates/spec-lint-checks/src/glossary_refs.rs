//! Every wrapped term in a process or decision document must be declared.
//!
//! Aggregating: one `GL001` per undefined term, listing every document it
//! appears in.

use std::collections::BTreeMap;
use tracing::debug;

use spec_lint_core::{Check, CheckContext, CheckError, LintResult, Location, Suggestion, Violation};

use crate::glossary_support::{self, Glossary};

/// Checks that wrapped terms resolve against the glossary.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlossaryRefs;

impl GlossaryRefs {
    /// Check name.
    pub const NAME: &'static str = "glossary-refs";

    /// Creates the check.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Where an undefined term was seen.
struct Occurrences {
    first: Location,
    files: Vec<String>,
}

impl Check for GlossaryRefs {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn code(&self) -> &'static str {
        "GL"
    }

    fn description(&self) -> &'static str {
        "Wrapped terms in process and decision documents must be declared in the glossary"
    }

    fn run(&self, ctx: &CheckContext) -> Result<LintResult, CheckError> {
        let index = match glossary_support::load(ctx, Self::NAME, "GL002")? {
            Glossary::Loaded(index) => index,
            Glossary::Verdict(result) => return Ok(result),
        };
        let tokens = index.markers().token_pattern()?;
        let documents = glossary_support::documents(ctx)?;

        let mut undefined: BTreeMap<String, Occurrences> = BTreeMap::new();
        for doc in &documents {
            let content = ctx.documents.read_text(doc)?;
            for m in tokens.find_iter(&content) {
                let token = m.as_str();
                if index.contains(token) {
                    continue;
                }
                let seen = undefined.entry(token.to_string()).or_insert_with(|| Occurrences {
                    first: Location::at_offset(doc, &content, m.start(), m.len()),
                    files: Vec::new(),
                });
                if !seen.files.contains(doc) {
                    seen.files.push(doc.clone());
                }
            }
        }
        debug!(
            "{}: scanned {} document(s), {} undefined term(s)",
            Self::NAME,
            documents.len(),
            undefined.len()
        );

        let mut result = LintResult::new(Self::NAME);
        result.files_checked = documents.len();
        result.violations = undefined
            .into_iter()
            .map(|(term, seen)| {
                Violation::new(
                    "GL001",
                    "undefined-term",
                    seen.first,
                    format!("undefined term {term} in: {}", seen.files.join(", ")),
                )
                .with_suggestion(Suggestion::new(format!(
                    "declare {term} in {}, or fix the spelling",
                    ctx.config.glossary.path.display()
                )))
            })
            .collect();
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spec_lint_core::{ChangedFileSet, Config, ViolationKind};
    use std::fs;
    use std::path::Path;

    fn write(root: &Path, rel: &str, content: &str) {
        let p = root.join(rel);
        fs::create_dir_all(p.parent().unwrap()).unwrap();
        fs::write(p, content).unwrap();
    }

    fn run(root: &Path) -> LintResult {
        let ctx = CheckContext::new(
            root,
            Config::default(),
            ChangedFileSet::new(["spec/glossary.yml"]),
        )
        .unwrap();
        GlossaryRefs::new().execute(&ctx).unwrap()
    }

    #[test]
    fn missing_glossary_skips() {
        let tmp = tempfile::tempdir().unwrap();
        let result = run(tmp.path());
        assert_eq!(result.skipped.as_deref(), Some("spec/glossary.yml not found"));
    }

    #[test]
    fn empty_glossary_is_structural() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "spec/glossary.yml", "terms: []\n");
        let result = run(tmp.path());
        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].kind, ViolationKind::Structural);
        assert_eq!(result.violations[0].message, "glossary has no terms");
    }

    #[test]
    fn invalid_glossary_is_structural() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "spec/glossary.yml", "terms: [\n");
        let result = run(tmp.path());
        assert_eq!(result.violations[0].code, "GL002");
        assert_eq!(result.violations[0].kind, ViolationKind::Structural);
    }

    #[test]
    fn declared_terms_pass() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "spec/glossary.yml", "terms:\n  - term: «Invoice»\n");
        write(
            tmp.path(),
            "spec/process/billing.bpmn",
            r#"<task name="Send «Invoice»"/>"#,
        );
        let result = run(tmp.path());
        assert!(result.violations.is_empty(), "{:#?}", result.violations);
        assert_eq!(result.files_checked, 1);
    }

    #[test]
    fn undefined_terms_are_grouped_per_term() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "spec/glossary.yml", "terms:\n  - term: «Invoice»\n");
        write(
            tmp.path(),
            "spec/process/billing.bpmn",
            "<task name=\"«Receipt»\"/>\n<task name=\"«Receipt» again\"/>\n",
        );
        write(
            tmp.path(),
            "spec/decision/tax.dmn",
            r#"<decision name="«Receipt» and «Rate»"/>"#,
        );
        let result = run(tmp.path());
        assert_eq!(result.violations.len(), 2);

        let rate = &result.violations[0];
        assert_eq!(rate.code, "GL001");
        assert_eq!(rate.message, "undefined term «Rate» in: spec/decision/tax.dmn");

        let receipt = &result.violations[1];
        assert_eq!(
            receipt.message,
            "undefined term «Receipt» in: spec/decision/tax.dmn, spec/process/billing.bpmn"
        );
        assert_eq!(receipt.location.file, Path::new("spec/decision/tax.dmn"));
        assert_eq!(receipt.location.line, 1);
    }
}
