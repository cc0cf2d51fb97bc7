//! Read-only access to repository documents.

use serde::de::DeserializeOwned;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::paths::{literal_prefix, relative_to, PathMatcher};

/// Errors raised while reading repository documents.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Repository-relative path.
        path: String,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The file is not valid YAML for the expected shape.
    #[error("{path}: invalid YAML: {source}")]
    Yaml {
        /// Repository-relative path.
        path: String,
        /// Parser error.
        source: serde_yaml::Error,
    },

    /// A directory walk failed.
    #[error("failed to walk {path}: {source}")]
    Walk {
        /// Directory being walked.
        path: PathBuf,
        /// Underlying walk error.
        source: walkdir::Error,
    },
}

/// Loads documents relative to a repository root.
///
/// YAML documents come back as structured data, XML-like documents
/// (BPMN/DMN) as raw text.
#[derive(Debug, Clone)]
pub struct DocumentLoader {
    root: PathBuf,
}

impl DocumentLoader {
    /// Creates a loader rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Repository root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path for a repository-relative one.
    #[must_use]
    pub fn resolve(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.root.join(rel)
    }

    /// Whether a repository-relative path exists on disk.
    #[must_use]
    pub fn exists(&self, rel: impl AsRef<Path>) -> bool {
        self.resolve(rel).exists()
    }

    /// Reads a document as text.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn read_text(&self, rel: impl AsRef<Path>) -> Result<String, DocumentError> {
        let rel = rel.as_ref();
        std::fs::read_to_string(self.resolve(rel)).map_err(|e| DocumentError::Io {
            path: rel.display().to_string(),
            source: e,
        })
    }

    /// Reads and parses a YAML document into `T`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not match `T`.
    pub fn load_yaml<T: DeserializeOwned>(&self, rel: impl AsRef<Path>) -> Result<T, DocumentError> {
        let rel = rel.as_ref();
        let text = self.read_text(rel)?;
        parse_yaml(&rel.display().to_string(), &text)
    }

    /// Finds every file matching `matcher`, as sorted repository-relative
    /// paths.
    ///
    /// Each pattern is walked from its wildcard-free leading directory.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be walked.
    pub fn find(&self, matcher: &PathMatcher) -> Result<Vec<String>, DocumentError> {
        let mut found = BTreeSet::new();
        let mut starts: Vec<&str> = matcher.sources().iter().map(|p| literal_prefix(p)).collect();
        starts.sort_unstable();
        starts.dedup();

        for start in starts {
            let dir = self.resolve(start);
            if !dir.is_dir() {
                debug!("skipping missing directory {}", dir.display());
                continue;
            }
            let walker = WalkDir::new(&dir)
                .follow_links(false)
                .into_iter()
                .filter_entry(|e| e.file_name() != ".git");
            for entry in walker {
                let entry = entry.map_err(|e| DocumentError::Walk {
                    path: dir.clone(),
                    source: e,
                })?;
                if !entry.file_type().is_file() {
                    continue;
                }
                let rel = relative_to(&self.root, entry.path());
                if matcher.matches(&rel) {
                    found.insert(rel);
                }
            }
        }

        Ok(found.into_iter().collect())
    }
}

/// Parses YAML text; `path` is only used for the error.
///
/// # Errors
///
/// Returns an error if the text does not match `T`.
pub fn parse_yaml<T: DeserializeOwned>(path: &str, text: &str) -> Result<T, DocumentError> {
    serde_yaml::from_str(text).map_err(|e| DocumentError::Yaml {
        path: path.to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(root: &Path, rel: &str, content: &str) {
        let p = root.join(rel);
        fs::create_dir_all(p.parent().unwrap()).unwrap();
        fs::write(p, content).unwrap();
    }

    #[test]
    fn find_walks_from_literal_prefix() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "spec/process/b.bpmn", "");
        write(tmp.path(), "spec/process/sub/a.bpmn", "");
        write(tmp.path(), "spec/process/notes.md", "");
        write(tmp.path(), "spec/decision/d.dmn", "");
        write(tmp.path(), "other/x.bpmn", "");

        let loader = DocumentLoader::new(tmp.path());
        let matcher =
            PathMatcher::new(["spec/process/**/*.bpmn", "spec/decision/**/*.dmn"]).unwrap();
        let files = loader.find(&matcher).unwrap();
        assert_eq!(
            files,
            [
                "spec/decision/d.dmn",
                "spec/process/b.bpmn",
                "spec/process/sub/a.bpmn"
            ]
        );
    }

    #[test]
    fn find_tolerates_missing_roots() {
        let tmp = tempfile::tempdir().unwrap();
        let loader = DocumentLoader::new(tmp.path());
        let matcher = PathMatcher::new(["spec/process/**/*.bpmn"]).unwrap();
        assert!(loader.find(&matcher).unwrap().is_empty());
    }

    #[test]
    fn load_yaml_reports_path_on_error() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "spec/glossary.yml", "terms: [\n");
        let loader = DocumentLoader::new(tmp.path());
        let err = loader
            .load_yaml::<serde_yaml::Value>("spec/glossary.yml")
            .unwrap_err();
        assert!(err.to_string().starts_with("spec/glossary.yml: invalid YAML"));
    }

    #[test]
    fn read_missing_file_is_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let loader = DocumentLoader::new(tmp.path());
        assert!(!loader.exists("nope.yml"));
        assert!(matches!(
            loader.read_text("nope.yml"),
            Err(DocumentError::Io { .. })
        ));
    }
}
