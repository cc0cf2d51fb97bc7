//! Context shared by every check in a run.

use std::path::PathBuf;

use crate::category::Conventions;
use crate::changeset::ChangedFileSet;
use crate::check::CheckError;
use crate::config::Config;
use crate::document::DocumentLoader;
use crate::glossary::Markers;

/// Read-only snapshot of the repository a check runs against.
///
/// Built once per run; checks never mutate it.
#[derive(Debug, Clone)]
pub struct CheckContext {
    /// Effective configuration.
    pub config: Config,
    /// Compiled path conventions.
    pub conventions: Conventions,
    /// Document access rooted at the repository.
    pub documents: DocumentLoader,
    /// Files changed in the revision range.
    pub changes: ChangedFileSet,
    /// Scan the whole repository even when the change set is not relevant.
    pub full_scan: bool,
}

impl CheckContext {
    /// Creates a context for the repository at `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured path conventions do not compile.
    pub fn new(
        root: impl Into<PathBuf>,
        config: Config,
        changes: ChangedFileSet,
    ) -> Result<Self, CheckError> {
        let conventions = Conventions::new(&config.paths)?;
        Ok(Self {
            config,
            conventions,
            documents: DocumentLoader::new(root),
            changes,
            full_scan: false,
        })
    }

    /// Sets whether the relevance gate is bypassed.
    #[must_use]
    pub fn with_full_scan(mut self, full_scan: bool) -> Self {
        self.full_scan = full_scan;
        self
    }

    /// Whether any changed path lies under a relevant root.
    #[must_use]
    pub fn has_relevant_changes(&self) -> bool {
        self.changes.iter().any(|p| self.conventions.is_relevant(p))
    }

    /// Glossary markers from configuration.
    #[must_use]
    pub fn markers(&self) -> Markers {
        Markers::new(
            self.config.glossary.open_marker.clone(),
            self.config.glossary.close_marker.clone(),
        )
    }
}
