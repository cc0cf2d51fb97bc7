//! The check trait.

use tracing::info;

use crate::changeset::ChangeSetError;
use crate::context::CheckContext;
use crate::document::DocumentError;
use crate::types::LintResult;

/// Errors that keep a check from producing a verdict at all.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    /// A document could not be read.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// The change set could not be resolved.
    #[error(transparent)]
    ChangeSet(#[from] ChangeSetError),

    /// A configured path convention is not a valid glob.
    #[error("invalid path pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// A configured name produced an invalid search pattern.
    #[error("invalid search pattern: {0}")]
    Regex(#[from] regex::Error),

    /// A source tree could not be walked.
    #[error("failed to walk source tree: {0}")]
    Walk(#[from] ignore::Error),
}

/// A repository-wide governance check.
///
/// Each check is an independent pass over a [`CheckContext`]: it reads the
/// snapshot, never writes, and returns one [`LintResult`].
///
/// # Example
///
/// ```ignore
/// use spec_lint_core::{Check, CheckContext, CheckError, LintResult};
///
/// pub struct RequireReadme;
///
/// impl Check for RequireReadme {
///     fn name(&self) -> &'static str { "require-readme" }
///     fn code(&self) -> &'static str { "RD" }
///
///     fn run(&self, ctx: &CheckContext) -> Result<LintResult, CheckError> {
///         Ok(LintResult::new(self.name()))
///     }
/// }
/// ```
pub trait Check: Send + Sync {
    /// Returns the kebab-case name of this check (e.g., "naked-terms").
    fn name(&self) -> &'static str;

    /// Returns the code prefix of this check's violations (e.g., "NT").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this check verifies.
    fn description(&self) -> &'static str {
        ""
    }

    /// Runs the check without the relevance gate.
    ///
    /// # Errors
    ///
    /// Returns an error if the check cannot run at all (unreadable files,
    /// invalid configuration). Rule breaches are violations, not errors.
    fn run(&self, ctx: &CheckContext) -> Result<LintResult, CheckError>;

    /// Runs the check behind the relevance gate: when the change set touches
    /// no relevant root and `full_scan` is off, the check is skipped.
    ///
    /// # Errors
    ///
    /// See [`Check::run`].
    fn execute(&self, ctx: &CheckContext) -> Result<LintResult, CheckError> {
        if !ctx.full_scan && !ctx.has_relevant_changes() {
            info!("{}: no relevant changes", self.name());
            return Ok(LintResult::skipped(self.name(), "no relevant changes"));
        }
        self.run(ctx)
    }
}

/// Type alias for boxed Check trait objects.
pub type CheckBox = Box<dyn Check>;
