//! CR consistency: change requests versus the files actually changed.
//!
//! Fail-fast. Rules, in evaluation order:
//!
//! | Code  | Rule                    |
//! |-------|-------------------------|
//! | CR001 | `cr-presence`           |
//! | CR002 | `cr-shape`              |
//! | CR003 | `flag-target-empty`     |
//! | CR004 | `flag-target-not-in-diff` |
//! | CR005 | `flag-target-wrong-kind`  |
//! | CR006 | `undeclared-diff`       |
//! | CR007 | `target-coverage`       |

use std::collections::HashSet;
use tracing::{debug, info};

use spec_lint_core::{
    Category, Check, CheckContext, CheckError, LintResult, Location, Suggestion, Violation,
};

use crate::change_request::{ChangeRequest, FLAGS_KEY, TARGETS_KEY};

/// Why evaluation stopped early.
enum Abort {
    Violation(Box<Violation>),
    Error(CheckError),
}

impl From<Violation> for Abort {
    fn from(v: Violation) -> Self {
        Self::Violation(Box::new(v))
    }
}

impl From<CheckError> for Abort {
    fn from(e: CheckError) -> Self {
        Self::Error(e)
    }
}

/// Cross-checks change requests against the change set.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChangePackages;

impl ChangePackages {
    /// Check name.
    pub const NAME: &'static str = "change-packages";

    /// Creates the check.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn evaluate(&self, ctx: &CheckContext) -> Result<usize, Abort> {
        let cr_paths: Vec<&str> = ctx
            .changes
            .iter()
            .filter(|p| ctx.conventions.is_change_request(p))
            .collect();

        if cr_paths.is_empty() {
            return Err(presence_violation(ctx).into());
        }
        for category in Category::ALL {
            let changed = ctx
                .changes
                .iter()
                .filter(|p| ctx.conventions.is_kind(category, p))
                .count();
            debug!("{category}: {changed} changed file(s)");
        }

        let mut crs = Vec::with_capacity(cr_paths.len());
        for path in cr_paths {
            if !ctx.documents.exists(path) {
                debug!("{path}: deleted in this change, not validated");
                continue;
            }
            let cr = load(ctx, path)?;
            check_declared_targets(ctx, &cr)?;
            crs.push(cr);
        }
        info!("validated {} change request(s)", crs.len());

        check_undeclared_diffs(ctx, &crs)?;
        check_target_coverage(ctx, &crs)?;

        Ok(crs.len())
    }
}

impl Check for ChangePackages {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn code(&self) -> &'static str {
        "CR"
    }

    fn description(&self) -> &'static str {
        "Change requests must accompany and exactly describe governed changes"
    }

    /// The change set is always required here, so `full_scan` does not
    /// bypass the relevance gate.
    fn execute(&self, ctx: &CheckContext) -> Result<LintResult, CheckError> {
        self.run(ctx)
    }

    fn run(&self, ctx: &CheckContext) -> Result<LintResult, CheckError> {
        if !ctx.has_relevant_changes() {
            info!("{}: no relevant changes", Self::NAME);
            return Ok(LintResult::skipped(Self::NAME, "no relevant changes"));
        }

        match self.evaluate(ctx) {
            Ok(checked) => Ok(LintResult {
                files_checked: checked,
                ..LintResult::new(Self::NAME)
            }),
            Err(Abort::Violation(v)) => Ok(LintResult::failed(Self::NAME, *v)),
            Err(Abort::Error(e)) => Err(e),
        }
    }
}

fn presence_violation(ctx: &CheckContext) -> Violation {
    let trigger = ctx
        .changes
        .iter()
        .find(|p| ctx.conventions.is_relevant(p))
        .unwrap_or_default();
    Violation::new(
        "CR001",
        "cr-presence",
        Location::file(trigger),
        format!(
            "no change request ({}) in the change set, but {trigger} changed",
            ctx.config.paths.change_requests.join(" | ")
        ),
    )
    .with_suggestion(Suggestion::new(
        "create a change request describing this change before merging",
    ))
}

fn load(ctx: &CheckContext, path: &str) -> Result<ChangeRequest, Abort> {
    let text = ctx.documents.read_text(path).map_err(CheckError::from)?;
    ChangeRequest::parse(path, &text, |target| ctx.documents.exists(target)).map_err(|e| {
        Violation::structural("CR002", "cr-shape", Location::file(path), e.to_string()).into()
    })
}

/// A CR that declares a flag `true` must name changed files of that kind.
fn check_declared_targets(ctx: &CheckContext, cr: &ChangeRequest) -> Result<(), Violation> {
    for category in Category::ALL {
        if !cr.declares(category) {
            continue;
        }
        let flag = category.flag_key();
        let field = format!("{TARGETS_KEY}.{}", category.target_key());
        let targets = cr.targets(category);

        if targets.is_empty() {
            return Err(Violation::new(
                "CR003",
                "flag-target-empty",
                Location::file(&cr.path),
                format!("{flag}=true but {field} is empty"),
            )
            .with_suggestion(Suggestion::new(format!(
                "list the changed {category} files in {field}, or set {flag} to false"
            ))));
        }

        for target in targets {
            if !ctx.changes.contains(target) {
                return Err(Violation::new(
                    "CR004",
                    "flag-target-not-in-diff",
                    Location::file(&cr.path),
                    format!("{flag}=true but {field} entry is not in the change set: {target}"),
                ));
            }
            if !ctx.conventions.is_kind(category, target) {
                return Err(Violation::new(
                    "CR005",
                    "flag-target-wrong-kind",
                    Location::file(&cr.path),
                    format!(
                        "{field} entry does not match the {category} convention ({}): {target}",
                        ctx.conventions.category(category).describe()
                    ),
                ));
            }
        }
    }
    Ok(())
}

/// A changed governed file needs some CR declaring its category.
fn check_undeclared_diffs(ctx: &CheckContext, crs: &[ChangeRequest]) -> Result<(), Violation> {
    for category in Category::ALL {
        let Some(changed) = ctx
            .changes
            .iter()
            .find(|p| ctx.conventions.is_kind(category, p))
        else {
            continue;
        };
        if !crs.iter().any(|cr| cr.declares(category)) {
            let flag = category.flag_key();
            return Err(Violation::new(
                "CR006",
                "undeclared-diff",
                Location::file(changed),
                format!("{category} changed ({changed}) but no change request declares {FLAGS_KEY}.{flag}=true"),
            )
            .with_suggestion(Suggestion::new(format!("set {flag}.value to true in the change request"))));
        }
    }
    Ok(())
}

/// Every changed governed file must be named in some CR's target list.
fn check_target_coverage(ctx: &CheckContext, crs: &[ChangeRequest]) -> Result<(), Violation> {
    for category in Category::ALL {
        let covered = union_targets(crs, category);
        let field = format!("{TARGETS_KEY}.{}", category.target_key());
        if let Some(uncovered) = ctx
            .changes
            .iter()
            .filter(|p| ctx.conventions.is_kind(category, p))
            .find(|p| !covered.contains(p))
        {
            return Err(Violation::new(
                "CR007",
                "target-coverage",
                Location::file(uncovered),
                format!("{category} changed but is not listed in any change request's {field}: {uncovered}"),
            )
            .with_suggestion(Suggestion::new(format!("add {uncovered} to {field}"))));
        }
    }
    Ok(())
}

/// Union of one category's targets across all loaded CRs.
fn union_targets(crs: &[ChangeRequest], category: Category) -> HashSet<&str> {
    crs.iter()
        .flat_map(|cr| cr.targets(category))
        .map(String::as_str)
        .collect()
}
