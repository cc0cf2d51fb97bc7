//! Configuration types for spec-lint.
//!
//! Every repository convention the checks rely on is a default here and can
//! be overridden from `spec-lint.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::category::Category;

/// Top-level configuration for spec-lint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path conventions for change requests and governed categories.
    pub paths: PathsConfig,
    /// Glossary document and label scanning settings.
    pub glossary: GlossaryConfig,
    /// Context map document and source scanning settings.
    pub context_map: ContextMapConfig,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Glob patterns of the process/decision documents scanned for terms.
    ///
    /// Falls back to the process and decision conventions when
    /// `glossary.documents` is not set.
    #[must_use]
    pub fn glossary_documents(&self) -> Vec<String> {
        self.glossary.documents.clone().unwrap_or_else(|| {
            self.paths
                .category(Category::Process)
                .iter()
                .chain(self.paths.category(Category::Decision))
                .cloned()
                .collect()
        })
    }
}

/// Path conventions, expressed as repository-relative globs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Path prefixes whose changes make the change set relevant.
    pub relevant_roots: Vec<String>,
    /// Change request file patterns.
    pub change_requests: Vec<String>,
    /// Process model (BPMN) patterns.
    pub process: Vec<String>,
    /// Decision model (DMN) patterns.
    pub decision: Vec<String>,
    /// Glossary document patterns (the YAML and its Markdown twin).
    pub glossary: Vec<String>,
    /// Context map document patterns (the YAML and its Markdown twin).
    pub context_map: Vec<String>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            relevant_roots: strings(&["src/", "spec/", "tests/", "changes/"]),
            change_requests: strings(&["changes/CR-*.yml", "changes/CR-*.yaml"]),
            process: strings(&["spec/process/**/*.bpmn"]),
            decision: strings(&["spec/decision/**/*.dmn"]),
            glossary: strings(&["spec/glossary.yml", "spec/glossary.md"]),
            context_map: strings(&["spec/context-map.yml", "spec/context-map.md"]),
        }
    }
}

impl PathsConfig {
    /// Patterns of one governed category.
    #[must_use]
    pub fn category(&self, category: Category) -> &[String] {
        match category {
            Category::Process => &self.process,
            Category::Decision => &self.decision,
            Category::Glossary => &self.glossary,
            Category::ContextMap => &self.context_map,
        }
    }
}

/// Glossary settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlossaryConfig {
    /// Repository-relative path of the glossary YAML.
    pub path: PathBuf,
    /// Marker opening a wrapped term.
    pub open_marker: String,
    /// Marker closing a wrapped term.
    pub close_marker: String,
    /// Documents scanned for terms (defaults to process + decision).
    pub documents: Option<Vec<String>>,
    /// Attributes whose values are labels.
    pub label_attributes: Vec<String>,
    /// Elements whose inner text is a label.
    pub text_elements: Vec<String>,
    /// Maximum number of naked-term findings reported.
    pub max_reported: usize,
}

impl Default for GlossaryConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("spec/glossary.yml"),
            open_marker: "«".to_string(),
            close_marker: "»".to_string(),
            documents: None,
            label_attributes: strings(&["name", "label"]),
            text_elements: strings(&["text"]),
            max_reported: 50,
        }
    }
}

/// Context map settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextMapConfig {
    /// Repository-relative path of the context map YAML.
    pub path: PathBuf,
    /// Directories walked for source files.
    pub source_roots: Vec<PathBuf>,
    /// Source file extensions (without the dot).
    pub extensions: Vec<String>,
    /// File name suffixes that are never scanned (type declarations).
    pub exclude_suffixes: Vec<String>,
    /// Directory names that are never descended into.
    pub exclude_dirs: Vec<String>,
    /// Import prefix that addresses a context (`@/contexts/<key>/...`).
    pub import_alias: String,
    /// Sub-path forming a context's public surface.
    pub api_segment: String,
}

impl Default for ContextMapConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("spec/context-map.yml"),
            source_roots: vec![PathBuf::from("src")],
            extensions: strings(&["ts", "tsx", "js", "jsx"]),
            exclude_suffixes: strings(&[".d.ts"]),
            exclude_dirs: strings(&["node_modules"]),
            import_alias: "@/contexts/".to_string(),
            api_segment: "api".to_string(),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },
}
