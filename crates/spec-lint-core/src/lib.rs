//! # spec-lint-core
//!
//! Core framework for spec governance linting.
//!
//! This crate provides the shared building blocks the checks run on:
//!
//! - [`Check`] trait for repository-wide governance checks
//! - [`CheckContext`] holding the read-only snapshot of a run
//! - [`ChangedFileSet`] and [`ChangeSetProvider`] for the revision range
//! - [`DocumentLoader`] for YAML and XML-like documents
//! - [`GlossaryIndex`] and [`LabelExtractor`] for vocabulary checks
//! - [`Violation`] and [`LintResult`] for reporting
//!
//! ## Example
//!
//! ```ignore
//! use spec_lint_core::{ChangeSetProvider, CheckContext, Config, GitChangeSet};
//!
//! let changes = GitChangeSet::new(".").changed_files()?;
//! let ctx = CheckContext::new(".", Config::default(), changes)?;
//! let result = my_check.execute(&ctx)?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod category;
mod changeset;
mod check;
mod config;
mod context;
mod document;
mod glossary;
mod labels;
mod types;

/// Path normalisation and glob matching.
pub mod paths;

pub use category::{Category, Conventions};
pub use changeset::{
    is_git_repo, ChangeSetError, ChangeSetProvider, ChangedFileSet, GitChangeSet, StaticChangeSet,
};
pub use check::{Check, CheckBox, CheckError};
pub use config::{Config, ConfigError, ContextMapConfig, GlossaryConfig, PathsConfig};
pub use context::CheckContext;
pub use document::{parse_yaml, DocumentError, DocumentLoader};
pub use glossary::{GlossaryFile, GlossaryIndex, Markers};
pub use labels::{LabelExtractor, RegexLabelExtractor};
pub use types::{
    LintResult, Location, Severity, Suggestion, Violation, ViolationDiagnostic, ViolationKind,
};
