//! The set of built-in checks.

use spec_lint_core::CheckBox;

use crate::{ChangePackages, ContextImports, GlossaryRefs, NakedTerms};

/// Returns every built-in check, in the order `spec-lint all` runs them.
///
/// - `change-packages` (CR) - change requests versus the change set
/// - `glossary-refs` (GL) - wrapped terms are declared
/// - `naked-terms` (NT) - declared terms are wrapped in labels
/// - `context-imports` (CTX) - cross-context imports follow the map
#[must_use]
pub fn all_checks() -> Vec<CheckBox> {
    vec![
        Box::new(ChangePackages::new()),
        Box::new(GlossaryRefs::new()),
        Box::new(NakedTerms::new()),
        Box::new(ContextImports::new()),
    ]
}

/// Looks a check up by name.
#[must_use]
pub fn check_by_name(name: &str) -> Option<CheckBox> {
    all_checks().into_iter().find(|c| c.name() == name)
}
