//! List checks command implementation.

use spec_lint_checks::all_checks;

/// Runs the list-checks command.
pub fn run() {
    println!("Available checks:\n");
    println!("{:<8} {:<20} Description", "Prefix", "Name");
    println!("{}", "-".repeat(80));

    for check in all_checks() {
        println!(
            "{:<8} {:<20} {}",
            check.code(),
            check.name(),
            check.description()
        );
    }

    println!("\nRun one check, or all of them:");
    println!("  spec-lint naked-terms");
    println!("  spec-lint all --format json");
}
