//! Declared terms must not appear unwrapped inside labels.
//!
//! A label containing `Invoice` where the glossary declares `«Invoice»` is a
//! naked occurrence. Occurrences touching either marker count as wrapped.
//! Aggregating, capped at `glossary.max_reported` findings.

use regex::Regex;
use std::collections::HashMap;
use tracing::debug;

use spec_lint_core::{
    Check, CheckContext, CheckError, LabelExtractor, LintResult, Location, Markers,
    RegexLabelExtractor, Suggestion, Violation,
};

use crate::glossary_support::{self, Glossary};

/// Checks labels for unwrapped glossary terms.
#[derive(Debug, Clone, Copy, Default)]
pub struct NakedTerms;

impl NakedTerms {
    /// Check name.
    pub const NAME: &'static str = "naked-terms";

    /// Creates the check.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// A plain term and its escaped search pattern.
struct PlainTerm<'a> {
    text: &'a str,
    pattern: Regex,
}

impl<'a> PlainTerm<'a> {
    fn new(text: &'a str) -> Result<Self, regex::Error> {
        Ok(Self {
            text,
            pattern: Regex::new(&regex::escape(text))?,
        })
    }
}

/// Whether `term` occurs in `label` without an opening marker right before
/// it and without a closing marker right after it. Overlapping matches are
/// considered.
fn has_naked_occurrence(label: &str, term: &Regex, markers: &Markers) -> bool {
    let mut start = 0;
    while let Some(m) = term.find_at(label, start) {
        let wrapped_before = label[..m.start()].ends_with(markers.open.as_str());
        let wrapped_after = label[m.end()..].starts_with(markers.close.as_str());
        if !wrapped_before && !wrapped_after {
            return true;
        }
        let step = label[m.start()..].chars().next().map_or(1, char::len_utf8);
        start = m.start() + step;
        if start > label.len() {
            break;
        }
    }
    false
}

impl Check for NakedTerms {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn code(&self) -> &'static str {
        "NT"
    }

    fn description(&self) -> &'static str {
        "Glossary terms must be wrapped in markers wherever they appear in labels"
    }

    fn run(&self, ctx: &CheckContext) -> Result<LintResult, CheckError> {
        let index = match glossary_support::load(ctx, Self::NAME, "NT002")? {
            Glossary::Loaded(index) => index,
            Glossary::Verdict(result) => return Ok(result),
        };
        let markers = index.markers();
        let terms = index
            .plain_terms()
            .into_iter()
            .map(PlainTerm::new)
            .collect::<Result<Vec<_>, _>>()?;
        let extractor = RegexLabelExtractor::new(
            &ctx.config.glossary.label_attributes,
            &ctx.config.glossary.text_elements,
        )?;
        let documents = glossary_support::documents(ctx)?;
        debug!(
            "{}: {} plain term(s) across {} document(s)",
            Self::NAME,
            terms.len(),
            documents.len()
        );

        let mut result = LintResult::new(Self::NAME);
        result.files_checked = documents.len();
        for doc in &documents {
            let content = ctx.documents.read_text(doc)?;
            // Repeated labels resolve to successive positions.
            let mut search_from: HashMap<String, usize> = HashMap::new();
            for label in extractor.extract(&content) {
                let from = search_from.get(&label).copied().unwrap_or(0);
                let location = match content[from..].find(label.as_str()) {
                    Some(at) => {
                        search_from.insert(label.clone(), from + at + label.len());
                        Location::at_offset(doc, &content, from + at, label.len())
                    }
                    None => Location::file(doc),
                };
                for term in &terms {
                    if !has_naked_occurrence(&label, &term.pattern, markers) {
                        continue;
                    }
                    result.violations.push(
                        Violation::new(
                            "NT001",
                            "naked-term",
                            location.clone(),
                            format!("naked term '{}' in label: {label}", term.text),
                        )
                        .with_suggestion(Suggestion::new(format!(
                            "wrap it as {}",
                            markers.wrap(term.text)
                        ))),
                    );
                }
            }
        }

        result.truncate(ctx.config.glossary.max_reported);
        Ok(result)
    }
}
