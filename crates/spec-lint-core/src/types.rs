//! Core types for check violations and results.

use miette::{Diagnostic, SourceSpan};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Severity level for violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, does not fail the check.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// The class of rule a violation broke.
///
/// Structural violations mean an input document cannot be reasoned about
/// (malformed CR, missing field, absent target file). Policy violations mean
/// the inputs are well-formed but disagree with each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViolationKind {
    /// The input document itself is malformed.
    Structural,
    /// Well-formed inputs break a governance rule.
    Policy,
}

impl std::fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Structural => write!(f, "structural"),
            Self::Policy => write!(f, "policy"),
        }
    }
}

/// Location of a finding inside the repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File path relative to the repository root.
    pub file: PathBuf,
    /// Line number (1-indexed, 0 when the finding concerns the whole file).
    pub line: usize,
    /// Column number (1-indexed, 0 when unknown).
    pub column: usize,
    /// Byte offset in file (for miette integration).
    pub offset: usize,
    /// Length of the span in bytes.
    pub length: usize,
}

impl Location {
    /// Creates a location pointing at a whole file.
    #[must_use]
    pub fn file(file: impl Into<PathBuf>) -> Self {
        Self::new(file.into(), 0, 0)
    }

    /// Creates a new location with explicit values.
    #[must_use]
    pub fn new(file: PathBuf, line: usize, column: usize) -> Self {
        Self {
            file,
            line,
            column,
            offset: 0,
            length: 0,
        }
    }

    /// Sets the byte offset and length for this location.
    #[must_use]
    pub fn with_span(mut self, offset: usize, length: usize) -> Self {
        self.offset = offset;
        self.length = length;
        self
    }

    /// Builds a location from a byte offset into `content`.
    #[must_use]
    pub fn at_offset(file: impl Into<PathBuf>, content: &str, offset: usize, length: usize) -> Self {
        let before = &content[..offset.min(content.len())];
        let line = before.matches('\n').count() + 1;
        let column = before
            .rfind('\n')
            .map_or(before.chars().count(), |nl| before[nl + 1..].chars().count())
            + 1;
        Self::new(file.into(), line, column).with_span(offset, length)
    }

    /// `file`, `file:line` or `file:line:column`, whichever is known.
    #[must_use]
    pub fn display(&self) -> String {
        match (self.line, self.column) {
            (0, _) => self.file.display().to_string(),
            (line, 0) => format!("{}:{line}", self.file.display()),
            (line, column) => format!("{}:{line}:{column}", self.file.display()),
        }
    }
}

/// A suggested fix for a violation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    /// Human-readable description of the fix.
    pub message: String,
}

impl Suggestion {
    /// Creates a new suggestion.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A violation found by a check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    /// Rule code (e.g., "CR003").
    pub code: String,
    /// Rule name (e.g., "flag-target-implication").
    pub rule: String,
    /// Severity of this violation.
    pub severity: Severity,
    /// Structural or policy.
    pub kind: ViolationKind,
    /// Primary location of the violation.
    pub location: Location,
    /// Human-readable message.
    pub message: String,
    /// Optional suggestion for fixing.
    pub suggestion: Option<Suggestion>,
}

impl Violation {
    /// Creates a new error-severity policy violation.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        rule: impl Into<String>,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            rule: rule.into(),
            severity: Severity::Error,
            kind: ViolationKind::Policy,
            location,
            message: message.into(),
            suggestion: None,
        }
    }

    /// Creates a new error-severity structural violation.
    #[must_use]
    pub fn structural(
        code: impl Into<String>,
        rule: impl Into<String>,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind: ViolationKind::Structural,
            ..Self::new(code, rule, location, message)
        }
    }

    /// Overrides the severity.
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Adds a suggestion to this violation.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: Suggestion) -> Self {
        self.suggestion = Some(suggestion);
        self
    }

    /// Formats the violation for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        use std::fmt::Write;
        let mut output = format!(
            "{} {} at {}\n",
            self.code,
            self.rule,
            self.location.display()
        );
        let _ = writeln!(output, "  {} ({}): {}", self.severity, self.kind, self.message);
        if let Some(suggestion) = &self.suggestion {
            let _ = writeln!(output, "  = help: {}", suggestion.message);
        }
        output
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} [{}] {}",
            self.location.display(),
            self.severity,
            self.code,
            self.message
        )
    }
}

/// Converts a Violation to a miette Diagnostic for rich error display.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{message}")]
pub struct ViolationDiagnostic {
    message: String,
    #[help]
    help: Option<String>,
    #[label("{label_message}")]
    span: SourceSpan,
    label_message: String,
}

impl From<&Violation> for ViolationDiagnostic {
    fn from(v: &Violation) -> Self {
        Self {
            message: format!("[{}] {}: {}", v.code, v.location.display(), v.message),
            help: v.suggestion.as_ref().map(|s| s.message.clone()),
            span: SourceSpan::from((v.location.offset, v.location.length)),
            label_message: v.rule.clone(),
        }
    }
}

/// Result of running one check.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct LintResult {
    /// Name of the check that produced this result.
    pub check: String,
    /// All violations found.
    pub violations: Vec<Violation>,
    /// Number of files checked.
    pub files_checked: usize,
    /// Set when the check decided it was not applicable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skipped: Option<String>,
    /// Total number of findings before truncation, when more were found
    /// than are reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_found: Option<usize>,
}

impl LintResult {
    /// Creates a new empty result for a check.
    #[must_use]
    pub fn new(check: impl Into<String>) -> Self {
        Self {
            check: check.into(),
            ..Self::default()
        }
    }

    /// Creates a result recording that the check did not apply.
    #[must_use]
    pub fn skipped(check: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            skipped: Some(reason.into()),
            ..Self::new(check)
        }
    }

    /// Creates a result holding a single violation.
    #[must_use]
    pub fn failed(check: impl Into<String>, violation: Violation) -> Self {
        Self {
            violations: vec![violation],
            ..Self::new(check)
        }
    }

    /// Returns true if the check was skipped.
    #[must_use]
    pub fn is_skipped(&self) -> bool {
        self.skipped.is_some()
    }

    /// Returns true if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.violations
            .iter()
            .any(|v| v.severity == Severity::Error)
    }

    /// Returns true if any violation is structural.
    #[must_use]
    pub fn has_structural(&self) -> bool {
        self.violations
            .iter()
            .any(|v| v.kind == ViolationKind::Structural)
    }

    /// Counts violations by severity.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        let count = |s: Severity| self.violations.iter().filter(|v| v.severity == s).count();
        (
            count(Severity::Error),
            count(Severity::Warning),
            count(Severity::Info),
        )
    }

    /// Keeps at most `limit` violations, remembering how many there were.
    pub fn truncate(&mut self, limit: usize) {
        if self.violations.len() > limit {
            self.total_found = Some(self.violations.len());
            self.violations.truncate(limit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_violation(severity: Severity) -> Violation {
        Violation::new(
            "CR003",
            "flag-target-implication",
            Location::file("changes/CR-001.yml"),
            "process_change=true but targets.bpmn is empty",
        )
        .with_severity(severity)
    }

    #[test]
    fn violation_new_is_policy_error() {
        let v = make_violation(Severity::Error);
        assert_eq!(v.kind, ViolationKind::Policy);
        assert_eq!(v.severity, Severity::Error);
    }

    #[test]
    fn structural_constructor_sets_kind() {
        let v = Violation::structural(
            "CR002",
            "cr-shape",
            Location::file("changes/CR-001.yml"),
            "missing targets",
        );
        assert_eq!(v.kind, ViolationKind::Structural);
    }

    #[test]
    fn display_omits_zero_line() {
        let v = make_violation(Severity::Error);
        insta::assert_snapshot!(
            v.to_string(),
            @"changes/CR-001.yml: error [CR003] process_change=true but targets.bpmn is empty"
        );
    }

    #[test]
    fn format_includes_suggestion() {
        let v = make_violation(Severity::Error)
            .with_suggestion(Suggestion::new("list the changed .bpmn file"));
        let formatted = v.format();
        assert!(formatted.contains("error (policy)"));
        assert!(formatted.contains("= help: list the changed .bpmn file"));
    }

    #[test]
    fn location_at_offset_computes_line_and_column() {
        let content = "import a from \"x\";\nimport b from \"@/contexts/b/internal/y\";\n";
        let offset = content.find("@/contexts").unwrap();
        let loc = Location::at_offset("src/a.ts", content, offset, 5);
        assert_eq!(loc.line, 2);
        assert_eq!(loc.column, 16);
        assert_eq!(loc.display(), "src/a.ts:2:16");
    }

    #[test]
    fn skipped_result_has_no_errors() {
        let r = LintResult::skipped("naked-terms", "spec/glossary.yml not found");
        assert!(r.is_skipped());
        assert!(!r.has_errors());
    }

    #[test]
    fn truncate_remembers_total() {
        let mut r = LintResult::new("naked-terms");
        for _ in 0..5 {
            r.violations.push(make_violation(Severity::Error));
        }
        r.truncate(3);
        assert_eq!(r.violations.len(), 3);
        assert_eq!(r.total_found, Some(5));

        let mut small = LintResult::new("naked-terms");
        small.violations.push(make_violation(Severity::Warning));
        small.truncate(3);
        assert_eq!(small.total_found, None);
        assert_eq!(small.count_by_severity(), (0, 1, 0));
    }
}
