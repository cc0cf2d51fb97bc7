//! Shared output formatting for check results.

use anyhow::Result;
use miette::{NamedSource, Report};
use std::path::Path;

use spec_lint_core::{LintResult, Severity, Violation, ViolationDiagnostic};

use super::check::Outcome;
use crate::OutputFormat;

const PASS: &str = "\x1b[32m✓\x1b[0m";
const FAIL: &str = "\x1b[31m✗\x1b[0m";
const WARN: &str = "\x1b[33m!\x1b[0m";

/// Print outcomes in the specified format.
pub fn print(outcomes: &[Outcome], format: OutputFormat, root: &Path) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(outcomes),
        OutputFormat::Json => return print_json(outcomes),
        OutputFormat::Compact => print_compact(outcomes),
        OutputFormat::Fancy => print_fancy(outcomes, root),
    }
    Ok(())
}

fn print_text(outcomes: &[Outcome]) {
    for outcome in outcomes {
        match outcome {
            Outcome::Done(result) => {
                for line in render_result(result) {
                    println!("{line}");
                }
            }
            Outcome::Failed { check, error } => println!("{FAIL} {check} could not run: {error}"),
        }
    }
}

/// Verdict lines for one result: a `✓` line when it passes, otherwise a
/// header (for several findings) and one `✗` line per violation.
fn render_result(result: &LintResult) -> Vec<String> {
    if let Some(reason) = &result.skipped {
        return vec![format!("{PASS} {} skip ({reason})", result.check)];
    }

    let mut lines = Vec::new();
    let shown = result.violations.len();
    let total = result.total_found.unwrap_or(shown);
    if total > shown {
        lines.push(format!(
            "{FAIL} {}: {total} violation(s), showing the first {shown}",
            result.check
        ));
    } else if shown > 1 {
        lines.push(format!("{FAIL} {}: {shown} violation(s)", result.check));
    }

    for violation in &result.violations {
        let marker = match violation.severity {
            Severity::Error => FAIL,
            Severity::Warning | Severity::Info => WARN,
        };
        lines.push(format!("{marker} {violation}"));
        if let Some(suggestion) = &violation.suggestion {
            lines.push(format!("  = help: {}", suggestion.message));
        }
    }

    if !result.has_errors() {
        lines.push(format!(
            "{PASS} {} ok ({} file(s) checked)",
            result.check, result.files_checked
        ));
    }
    lines
}

fn print_json(outcomes: &[Outcome]) -> Result<()> {
    let json = serde_json::to_string_pretty(outcomes)?;
    println!("{json}");
    Ok(())
}

fn print_compact(outcomes: &[Outcome]) {
    for outcome in outcomes {
        match outcome {
            Outcome::Done(result) => {
                for violation in &result.violations {
                    println!("{violation}");
                }
            }
            Outcome::Failed { check, error } => println!("{check}: error {error}"),
        }
    }
}

fn print_fancy(outcomes: &[Outcome], root: &Path) {
    for outcome in outcomes {
        let Outcome::Done(result) = outcome else {
            print_text(std::slice::from_ref(outcome));
            continue;
        };
        if result.violations.is_empty() {
            for line in render_result(result) {
                println!("{line}");
            }
            continue;
        }
        for violation in &result.violations {
            println!("{:?}", diagnostic(violation, root));
        }
        if let Some(total) = result.total_found {
            println!("{} of {total} violation(s) shown", result.violations.len());
        }
    }
}

/// A miette report for the violation, with the offending file attached when
/// the violation points into it.
fn diagnostic(violation: &Violation, root: &Path) -> Report {
    let report = Report::new(ViolationDiagnostic::from(violation));
    if violation.location.length == 0 {
        return report;
    }
    match std::fs::read_to_string(root.join(&violation.location.file)) {
        Ok(content) => report.with_source_code(NamedSource::new(
            violation.location.file.display().to_string(),
            content,
        )),
        Err(_) => report,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spec_lint_core::{Location, Suggestion};

    fn plain(lines: Vec<String>) -> Vec<String> {
        lines
            .into_iter()
            .map(|l| l.replace(PASS, "✓").replace(FAIL, "✗").replace(WARN, "!"))
            .collect()
    }

    #[test]
    fn skipped_and_passing_results() {
        let skipped = LintResult::skipped("naked-terms", "no relevant changes");
        assert_eq!(
            plain(render_result(&skipped)),
            vec!["✓ naked-terms skip (no relevant changes)"]
        );

        let mut ok = LintResult::new("glossary-refs");
        ok.files_checked = 3;
        assert_eq!(
            plain(render_result(&ok)),
            vec!["✓ glossary-refs ok (3 file(s) checked)"]
        );
    }

    #[test]
    fn single_violation_has_no_header() {
        let result = LintResult::failed(
            "change-packages",
            Violation::new(
                "CR003",
                "flag-target-empty",
                Location::file("changes/CR-001.yml"),
                "process_change=true but targets.bpmn is empty",
            )
            .with_suggestion(Suggestion::new("list the changed files")),
        );
        assert_eq!(
            plain(render_result(&result)),
            vec![
                "✗ changes/CR-001.yml: error [CR003] process_change=true but targets.bpmn is empty",
                "  = help: list the changed files",
            ]
        );
    }

    #[test]
    fn truncated_results_state_how_many_are_shown() {
        let mut result = LintResult::new("naked-terms");
        result.violations = (0..4)
            .map(|i| {
                Violation::new(
                    "NT001",
                    "naked-term",
                    Location::file(format!("spec/process/{i}.bpmn")),
                    "naked term 'Invoice' in label: Invoice",
                )
            })
            .collect();
        result.truncate(2);
        let lines = plain(render_result(&result));
        assert_eq!(lines[0], "✗ naked-terms: 4 violation(s), showing the first 2");
        assert_eq!(lines.len(), 3);
    }
}
