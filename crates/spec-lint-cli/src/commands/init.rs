//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# spec-lint configuration
# Every value below is the built-in default; delete what you do not change.

[paths]
# A change set touching none of these prefixes skips every check
relevant_roots = ["src/", "spec/", "tests/", "changes/"]
change_requests = ["changes/CR-*.yml", "changes/CR-*.yaml"]
process = ["spec/process/**/*.bpmn"]
decision = ["spec/decision/**/*.dmn"]
glossary = ["spec/glossary.yml", "spec/glossary.md"]
context_map = ["spec/context-map.yml", "spec/context-map.md"]

[glossary]
path = "spec/glossary.yml"
open_marker = "«"
close_marker = "»"
# Documents scanned for terms (default: the process and decision patterns)
# documents = ["spec/**/*.bpmn"]
label_attributes = ["name", "label"]
text_elements = ["text"]
max_reported = 50

[context_map]
path = "spec/context-map.yml"
source_roots = ["src"]
extensions = ["ts", "tsx", "js", "jsx"]
exclude_suffixes = [".d.ts"]
exclude_dirs = ["node_modules"]
import_alias = "@/contexts/"
api_segment = "api"
"#;

/// Runs the init command.
pub fn run(root: &Path, force: bool) -> Result<()> {
    let config_path = root.join("spec-lint.toml");

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!("Created {}", config_path.display());
    println!("\nNext steps:");
    println!("  1. Adjust the path conventions in spec-lint.toml");
    println!("  2. Run: spec-lint all");

    Ok(())
}
