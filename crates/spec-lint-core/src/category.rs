//! Governed categories and the compiled path conventions for them.

use glob::PatternError;
use serde::{Deserialize, Serialize};

use crate::config::PathsConfig;
use crate::paths::PathMatcher;

/// A kind of governed artifact with its own CR flag and target list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Process models (BPMN).
    Process,
    /// Decision models (DMN).
    Decision,
    /// The glossary document.
    Glossary,
    /// The context map document.
    ContextMap,
}

impl Category {
    /// All categories, in the order checks report them.
    pub const ALL: [Self; 4] = [
        Self::Process,
        Self::Decision,
        Self::Glossary,
        Self::ContextMap,
    ];

    /// Key of the flag under `change_candidates`.
    #[must_use]
    pub fn flag_key(self) -> &'static str {
        match self {
            Self::Process => "process_change",
            Self::Decision => "decision_change",
            Self::Glossary => "glossary_change",
            Self::ContextMap => "contextmap_change",
        }
    }

    /// Key of the target list under `targets`.
    #[must_use]
    pub fn target_key(self) -> &'static str {
        match self {
            Self::Process => "bpmn",
            Self::Decision => "dmn",
            Self::Glossary => "glossary",
            Self::ContextMap => "contextmap",
        }
    }

    /// Name used in messages.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Process => "BPMN",
            Self::Decision => "DMN",
            Self::Glossary => "Glossary",
            Self::ContextMap => "Context Map",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Compiled path conventions for a repository.
#[derive(Debug, Clone)]
pub struct Conventions {
    relevant_roots: Vec<String>,
    change_requests: PathMatcher,
    categories: [PathMatcher; 4],
}

impl Conventions {
    /// Compiles the conventions from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any glob pattern is malformed.
    pub fn new(paths: &PathsConfig) -> Result<Self, PatternError> {
        Ok(Self {
            relevant_roots: paths.relevant_roots.clone(),
            change_requests: PathMatcher::new(&paths.change_requests)?,
            categories: [
                PathMatcher::new(paths.category(Category::Process))?,
                PathMatcher::new(paths.category(Category::Decision))?,
                PathMatcher::new(paths.category(Category::Glossary))?,
                PathMatcher::new(paths.category(Category::ContextMap))?,
            ],
        })
    }

    /// Whether a changed path lies under any relevant root.
    #[must_use]
    pub fn is_relevant(&self, path: &str) -> bool {
        self.relevant_roots.iter().any(|root| path.starts_with(root.as_str()))
    }

    /// The configured relevant roots.
    #[must_use]
    pub fn relevant_roots(&self) -> &[String] {
        &self.relevant_roots
    }

    /// Whether a path names a change request file.
    #[must_use]
    pub fn is_change_request(&self, path: &str) -> bool {
        self.change_requests.matches(path)
    }

    /// Matcher for one category.
    #[must_use]
    pub fn category(&self, category: Category) -> &PathMatcher {
        let idx = match category {
            Category::Process => 0,
            Category::Decision => 1,
            Category::Glossary => 2,
            Category::ContextMap => 3,
        };
        &self.categories[idx]
    }

    /// Whether a path follows the convention of `category`.
    #[must_use]
    pub fn is_kind(&self, category: Category, path: &str) -> bool {
        self.category(category).matches(path)
    }
}
