//! # spec-lint-checks
//!
//! Built-in governance checks for spec-lint.
//!
//! ## Available Checks
//!
//! | Prefix | Name | Description |
//! |--------|------|-------------|
//! | CR | `change-packages` | Change requests accompany and exactly describe governed changes |
//! | GL | `glossary-refs` | Wrapped terms in process/decision documents are declared |
//! | NT | `naked-terms` | Declared terms never appear unwrapped in labels |
//! | CTX | `context-imports` | Cross-context imports are allowed and go through `api` |
//!
//! Structural failures (malformed inputs) use the `002`/`003` codes of each
//! prefix; everything else is a policy failure.
//!
//! ## Usage
//!
//! ```ignore
//! use spec_lint_checks::all_checks;
//! use spec_lint_core::{ChangeSetProvider, CheckContext, Config, GitChangeSet};
//!
//! let ctx = CheckContext::new(".", Config::default(), GitChangeSet::new(".").changed_files()?)?;
//! for check in all_checks() {
//!     let result = check.execute(&ctx)?;
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod change_packages;
mod change_request;
mod context_imports;
mod context_map;
mod glossary_refs;
mod glossary_support;
mod naked_terms;
mod registry;

pub use change_packages::ChangePackages;
pub use change_request::{ChangeRequest, Confidence, Flag, PerCategory, ShapeError};
pub use context_imports::ContextImports;
pub use context_map::{
    ContextDef, ContextImport, ContextMap, ContextMapError, ContextMapFile, ContextResolver,
};
pub use glossary_refs::GlossaryRefs;
pub use naked_terms::NakedTerms;
pub use registry::{all_checks, check_by_name};
