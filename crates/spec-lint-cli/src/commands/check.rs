//! Check command implementation.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::path::Path;

use spec_lint_checks::check_by_name;
use spec_lint_core::{
    is_git_repo, ChangeSetProvider, ChangedFileSet, CheckContext, GitChangeSet, LintResult,
    StaticChangeSet,
};

use crate::config_resolver::ConfigSource;
use crate::RunArgs;

/// What running one check produced.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    /// The check ran and reached a verdict.
    Done(LintResult),
    /// The check could not run.
    Failed {
        /// Check name.
        check: String,
        /// Why it could not run.
        error: String,
    },
}

impl Outcome {
    /// Whether this outcome fails the run.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        match self {
            Self::Done(result) => result.has_errors(),
            Self::Failed { .. } => true,
        }
    }
}

/// Runs the named checks, each independently, against one change set.
pub fn run(root: &Path, source: &ConfigSource, args: &RunArgs, names: &[&str]) -> Result<()> {
    let config = source.load()?;
    let changes = changed_files(root, args)?;
    tracing::info!("{} changed file(s)", changes.len());

    let ctx = CheckContext::new(root, config, changes)
        .context("Invalid path conventions in config")?
        .with_full_scan(args.full);

    let mut outcomes = Vec::with_capacity(names.len());
    for name in names {
        let check = check_by_name(name).with_context(|| format!("Unknown check: {name}"))?;
        let outcome = match check.execute(&ctx) {
            Ok(result) => Outcome::Done(result),
            Err(e) => {
                tracing::error!("{name}: {e}");
                Outcome::Failed {
                    check: (*name).to_string(),
                    error: e.to_string(),
                }
            }
        };
        outcomes.push(outcome);
    }

    super::output::print(&outcomes, args.format, root)?;

    if outcomes.iter().any(Outcome::is_failure) {
        std::process::exit(1);
    }

    Ok(())
}

fn changed_files(root: &Path, args: &RunArgs) -> Result<ChangedFileSet> {
    if let Some(paths) = &args.changed {
        return Ok(StaticChangeSet::new(paths).changed_files()?);
    }

    if !is_git_repo(root) {
        if args.full {
            tracing::warn!("{} is not a git repository, assuming no changes", root.display());
            return Ok(ChangedFileSet::default());
        }
        bail!(
            "{} is not a git repository. Use --changed to list the changed files.",
            root.display()
        );
    }

    GitChangeSet::new(root)
        .with_event_path(args.event_path.clone())
        .with_remote_main(args.remote_main.clone())
        .changed_files()
        .context("Failed to resolve the change set")
}
