//! Label extraction from XML-like process and decision documents.
//!
//! [`LabelExtractor`] is the seam between the checks and the document
//! format. [`RegexLabelExtractor`] approximates XML parsing with pattern
//! matching: quoted attribute values (`name="..."`, `label='...'`) and the
//! inner text of designated elements (`<text>...</text>`). It does not
//! decode entities and does not understand CDATA or comments.

use regex::Regex;

/// Produces the human-readable labels of a document.
pub trait LabelExtractor: Send + Sync {
    /// Extracts labels in document order: attribute values first, then
    /// element texts. Empty labels are dropped.
    fn extract(&self, source: &str) -> Vec<String>;
}

/// Pattern-based label extractor.
#[derive(Debug, Clone)]
pub struct RegexLabelExtractor {
    double_quoted: Regex,
    single_quoted: Regex,
    elements: Vec<Regex>,
    whitespace: Regex,
}

impl RegexLabelExtractor {
    /// Builds an extractor for the given attribute and element names.
    ///
    /// # Errors
    ///
    /// Returns an error if a name yields an invalid pattern.
    pub fn new<A, E>(attributes: A, text_elements: E) -> Result<Self, regex::Error>
    where
        A: IntoIterator,
        A::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        let names = attributes
            .into_iter()
            .map(|a| regex::escape(a.as_ref()))
            .collect::<Vec<_>>()
            .join("|");
        let double_quoted = Regex::new(&format!(r#"\b(?:{names})\s*=\s*"([^"]*)""#))?;
        let single_quoted = Regex::new(&format!(r"\b(?:{names})\s*=\s*'([^']*)'"))?;
        let elements = text_elements
            .into_iter()
            .map(|e| {
                let e = regex::escape(e.as_ref());
                Regex::new(&format!(r"(?s)<{e}>(.*?)</{e}>"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            double_quoted,
            single_quoted,
            elements,
            whitespace: Regex::new(r"\s+")?,
        })
    }
}

impl LabelExtractor for RegexLabelExtractor {
    fn extract(&self, source: &str) -> Vec<String> {
        let mut labels = Vec::new();

        for re in [&self.double_quoted, &self.single_quoted] {
            labels.extend(re.captures_iter(source).map(|c| c[1].to_string()));
        }

        for re in &self.elements {
            labels.extend(re.captures_iter(source).map(|c| {
                self.whitespace
                    .replace_all(&c[1], " ")
                    .trim()
                    .to_string()
            }));
        }

        labels.retain(|l| !l.is_empty());
        labels
    }
}
