//! Glossary index: the declared vocabulary and its plain forms.

use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeSet;

/// On-disk glossary schema: `{ terms: [{ term: string, ... }] }`.
///
/// Entries are kept loosely typed; only a string `term` is meaningful.
#[derive(Debug, Default, Deserialize)]
pub struct GlossaryFile {
    /// Declared entries.
    #[serde(default)]
    pub terms: Option<Vec<serde_yaml::Value>>,
}

/// Bracket markers wrapping a term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markers {
    /// Opening marker (default `«`).
    pub open: String,
    /// Closing marker (default `»`).
    pub close: String,
}

impl Markers {
    /// Creates markers.
    #[must_use]
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }

    /// Wraps plain text in the markers.
    #[must_use]
    pub fn wrap(&self, plain: &str) -> String {
        format!("{}{plain}{}", self.open, self.close)
    }

    /// Returns the content between the markers, if `term` is
    /// `open + content + close` with non-empty content.
    #[must_use]
    pub fn unwrap<'a>(&self, term: &'a str) -> Option<&'a str> {
        let inner = term
            .strip_prefix(self.open.as_str())?
            .strip_suffix(self.close.as_str())?;
        (!inner.is_empty()).then_some(inner)
    }

    /// Pattern capturing the content of every wrapped token in a text.
    ///
    /// # Errors
    ///
    /// Returns an error if the markers produce an invalid pattern.
    pub fn token_pattern(&self) -> Result<Regex, regex::Error> {
        Regex::new(&format!(
            "(?s){}(.+?){}",
            regex::escape(&self.open),
            regex::escape(&self.close)
        ))
    }
}

impl Default for Markers {
    fn default() -> Self {
        Self::new("«", "»")
    }
}

/// Lookup of declared glossary terms. Duplicates collapse.
#[derive(Debug, Clone, Default)]
pub struct GlossaryIndex {
    terms: BTreeSet<String>,
    markers: Markers,
}

impl GlossaryIndex {
    /// Builds the index from a parsed glossary document.
    ///
    /// Entries without a non-empty string `term` are ignored.
    #[must_use]
    pub fn from_file(file: &GlossaryFile, markers: Markers) -> Self {
        let terms = file
            .terms
            .iter()
            .flatten()
            .filter_map(|e| e.get("term")?.as_str())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
        Self { terms, markers }
    }

    /// Builds the index from term strings.
    #[must_use]
    pub fn from_terms<I, S>(terms: I, markers: Markers) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            terms: terms.into_iter().map(Into::into).collect(),
            markers,
        }
    }

    /// Whether the wrapped term is declared.
    #[must_use]
    pub fn contains(&self, wrapped: &str) -> bool {
        self.terms.contains(wrapped)
    }

    /// Number of distinct declared terms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether no term is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// The markers terms are wrapped in.
    #[must_use]
    pub fn markers(&self) -> &Markers {
        &self.markers
    }

    /// Declared terms in sorted order.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(String::as_str)
    }

    /// Plain forms of every term that is properly wrapped.
    #[must_use]
    pub fn plain_terms(&self) -> Vec<&str> {
        self.terms
            .iter()
            .filter_map(|t| self.markers.unwrap(t))
            .collect()
    }
}
