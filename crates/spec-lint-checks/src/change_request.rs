//! Typed change request records.
//!
//! A CR file is validated once, here, while it is converted into a
//! [`ChangeRequest`]. Everything downstream works on well-typed values and
//! never re-checks shapes.
//!
//! ```yaml
//! change_candidates:
//!   process_change: { value: true, confidence: 0.9 }
//!   decision_change: { value: false, confidence: 0.8 }
//!   glossary_change: { value: false, confidence: 0.8 }
//!   contextmap_change: { value: false, confidence: 1 }
//! targets:
//!   bpmn: [spec/process/order.bpmn]
//!   dmn: []
//!   glossary: []
//!   contextmap: []
//! ```

use serde_yaml::Value;
use std::collections::HashSet;
use thiserror::Error;

use spec_lint_core::Category;

/// Key holding the flags mapping.
pub const FLAGS_KEY: &str = "change_candidates";

/// Accepted alternative spelling of [`FLAGS_KEY`].
const FLAGS_ALIAS: &str = "flags";

/// Key holding the targets mapping.
pub const TARGETS_KEY: &str = "targets";

/// A confidence score in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Confidence(f64);

impl Confidence {
    /// Returns the score if it is finite and within `[0, 1]`.
    #[must_use]
    pub fn new(value: f64) -> Option<Self> {
        (value.is_finite() && (0.0..=1.0).contains(&value)).then_some(Self(value))
    }

    /// The score.
    #[must_use]
    pub fn get(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Confidence {
    type Error = f64;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(value)
    }
}

/// A declared flag: whether a category changes, and how sure the author is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Flag {
    /// Whether the category is declared changed.
    pub value: bool,
    /// Author confidence in the declaration.
    pub confidence: Confidence,
}

/// One value per governed category.
#[derive(Debug, Clone, PartialEq)]
pub struct PerCategory<T> {
    process: T,
    decision: T,
    glossary: T,
    context_map: T,
}

impl<T> PerCategory<T> {
    /// Builds the record by evaluating `f` for every category in order,
    /// stopping at the first error.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `f`.
    pub fn try_build<E>(mut f: impl FnMut(Category) -> Result<T, E>) -> Result<Self, E> {
        Ok(Self {
            process: f(Category::Process)?,
            decision: f(Category::Decision)?,
            glossary: f(Category::Glossary)?,
            context_map: f(Category::ContextMap)?,
        })
    }

    /// The value for `category`.
    #[must_use]
    pub fn get(&self, category: Category) -> &T {
        match category {
            Category::Process => &self.process,
            Category::Decision => &self.decision,
            Category::Glossary => &self.glossary,
            Category::ContextMap => &self.context_map,
        }
    }
}

/// A field of a CR that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} {message}")]
pub struct ShapeError {
    /// Dotted path of the offending field (e.g. `targets.bpmn`).
    pub field: String,
    /// What is wrong with it.
    pub message: String,
}

impl ShapeError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A structurally valid change request.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeRequest {
    /// Repository-relative path of the CR file.
    pub path: String,
    flags: PerCategory<Flag>,
    targets: PerCategory<Vec<String>>,
}

impl ChangeRequest {
    /// Parses and validates a CR document.
    ///
    /// `exists` reports whether a repository-relative path is present on
    /// disk; every target must exist.
    ///
    /// # Errors
    ///
    /// Returns the first field that is missing or ill-typed.
    pub fn parse(
        path: impl Into<String>,
        text: &str,
        exists: impl Fn(&str) -> bool,
    ) -> Result<Self, ShapeError> {
        let doc: Value = serde_yaml::from_str(text)
            .map_err(|e| ShapeError::new("(document)", format!("is not valid YAML: {e}")))?;

        let candidates = doc
            .get(FLAGS_KEY)
            .or_else(|| doc.get(FLAGS_ALIAS))
            .filter(|v| !v.is_null())
            .ok_or_else(|| ShapeError::new(FLAGS_KEY, "is missing"))?;
        let flags = PerCategory::try_build(|c| parse_flag(candidates, c))?;

        let targets_doc = doc
            .get(TARGETS_KEY)
            .filter(|v| !v.is_null())
            .ok_or_else(|| ShapeError::new(TARGETS_KEY, "is missing"))?;
        let targets = PerCategory::try_build(|c| parse_targets(targets_doc, c, &exists))?;

        Ok(Self {
            path: path.into(),
            flags,
            targets,
        })
    }

    /// The declared flag for `category`.
    #[must_use]
    pub fn flag(&self, category: Category) -> Flag {
        *self.flags.get(category)
    }

    /// Whether `category` is declared changed.
    #[must_use]
    pub fn declares(&self, category: Category) -> bool {
        self.flag(category).value
    }

    /// The target paths listed for `category`.
    #[must_use]
    pub fn targets(&self, category: Category) -> &[String] {
        self.targets.get(category)
    }
}

fn parse_flag(candidates: &Value, category: Category) -> Result<Flag, ShapeError> {
    let key = category.flag_key();
    let entry = candidates.get(key);

    let value = entry
        .and_then(|e| e.get("value"))
        .and_then(Value::as_bool)
        .ok_or_else(|| ShapeError::new(format!("{FLAGS_KEY}.{key}.value"), "must be a boolean"))?;

    let confidence = entry
        .and_then(|e| e.get("confidence"))
        .and_then(Value::as_f64)
        .and_then(Confidence::new)
        .ok_or_else(|| {
            ShapeError::new(
                format!("{FLAGS_KEY}.{key}.confidence"),
                "must be a number in 0..=1",
            )
        })?;

    Ok(Flag { value, confidence })
}

fn parse_targets(
    targets: &Value,
    category: Category,
    exists: &impl Fn(&str) -> bool,
) -> Result<Vec<String>, ShapeError> {
    let field = format!("{TARGETS_KEY}.{}", category.target_key());

    let items = targets
        .get(category.target_key())
        .and_then(Value::as_sequence)
        .ok_or_else(|| ShapeError::new(&field, "must be a list"))?;

    let paths = items
        .iter()
        .map(|item| item.as_str().filter(|s| !s.is_empty()).map(str::to_string))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| ShapeError::new(&field, "must contain only non-empty strings"))?;

    let mut seen = HashSet::new();
    if let Some(dup) = paths.iter().find(|p| !seen.insert(p.as_str())) {
        return Err(ShapeError::new(&field, format!("contains a duplicate: {dup}")));
    }

    if let Some(missing) = paths.iter().find(|p| !exists(p.as_str())) {
        return Err(ShapeError::new(
            &field,
            format!("references a file that does not exist: {missing}"),
        ));
    }

    Ok(paths)
}
