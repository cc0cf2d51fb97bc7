//! Path utilities: normalisation and glob convention matching.

use glob::{MatchOptions, Pattern, PatternError};
use std::path::Path;

/// Options shared by every convention match: `*` never crosses `/`.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Converts a path to the repository-relative, forward-slash form used in
/// change sets and CR targets.
///
/// # Example
///
/// ```ignore
/// assert_eq!(normalize(r"spec\process\a.bpmn"), "spec/process/a.bpmn");
/// assert_eq!(normalize("./spec/glossary.yml"), "spec/glossary.yml");
/// ```
#[must_use]
pub fn normalize(path: &str) -> String {
    let s = path.trim().replace('\\', "/");
    s.strip_prefix("./").map(str::to_string).unwrap_or(s)
}

/// Converts a filesystem path below `root` to its normalised relative form.
#[must_use]
pub fn relative_to(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    normalize(&rel.to_string_lossy())
}

/// Returns the leading directory part of a glob that contains no wildcard.
///
/// Used to start directory walks as deep as possible.
///
/// ```ignore
/// assert_eq!(literal_prefix("spec/process/**/*.bpmn"), "spec/process");
/// assert_eq!(literal_prefix("*.yml"), "");
/// ```
#[must_use]
pub fn literal_prefix(pattern: &str) -> &str {
    let wildcard = pattern
        .find(|c| matches!(c, '*' | '?' | '['))
        .unwrap_or(pattern.len());
    match pattern[..wildcard].rfind('/') {
        Some(slash) => &pattern[..slash],
        None => "",
    }
}

/// A set of compiled glob patterns.
#[derive(Debug, Clone, Default)]
pub struct PathMatcher {
    sources: Vec<String>,
    patterns: Vec<Pattern>,
}

impl PathMatcher {
    /// Compiles the given patterns.
    ///
    /// # Errors
    ///
    /// Returns an error for the first malformed pattern.
    pub fn new<I, S>(patterns: I) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut matcher = Self::default();
        for p in patterns {
            let p = p.as_ref();
            matcher.patterns.push(Pattern::new(p)?);
            matcher.sources.push(p.to_string());
        }
        Ok(matcher)
    }

    /// Returns true if any pattern matches the (normalised) path.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        self.patterns
            .iter()
            .any(|p| p.matches_with(path, MATCH_OPTIONS))
    }

    /// The pattern strings this matcher was built from.
    #[must_use]
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Human-readable list of the patterns, for diagnostics.
    #[must_use]
    pub fn describe(&self) -> String {
        self.sources.join(" | ")
    }
}
