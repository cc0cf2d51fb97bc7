//! Cross-context imports must be allowed and go through the `api` surface.
//!
//! Fail-fast: the first offending import ends the check.
//!
//! | Code   | Rule                     |
//! |--------|--------------------------|
//! | CTX001 | `context-edge`           |
//! | CTX002 | `context-api-surface`    |
//! | CTX003 | `context-map-shape`      |

use regex::Regex;
use std::path::Path;
use tracing::{debug, info};

use spec_lint_core::paths::relative_to;
use spec_lint_core::{
    Check, CheckContext, CheckError, ContextMapConfig, DocumentError, LintResult, Location,
    Suggestion, Violation,
};

use crate::context_map::{ContextImport, ContextMap, ContextMapFile, ContextResolver};

/// Static `from "x"`, side-effect `import "x"`, `require("x")` and dynamic
/// `import("x")`.
const IMPORT_PATTERN: &str =
    r#"(?:\bfrom\s+|\bimport\s+|\b(?:require|import)\s*\(\s*)["']([^"'\n]+)["']"#;

/// Enforces the context map on source imports.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextImports;

impl ContextImports {
    /// Check name.
    pub const NAME: &'static str = "context-imports";

    /// Creates the check.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn load_map(ctx: &CheckContext, path: &str) -> Result<Result<ContextMap, Violation>, CheckError> {
        let structural = |message: String| {
            Violation::structural("CTX003", "context-map-shape", Location::file(path), message)
        };
        let file: ContextMapFile = match ctx.documents.load_yaml(path) {
            Ok(file) => file,
            Err(e @ DocumentError::Yaml { .. }) => return Ok(Err(structural(e.to_string()))),
            Err(e) => return Err(e.into()),
        };
        Ok(ContextMap::from_file(file).map_err(|e| structural(format!("{path}: {e}"))))
    }
}

impl Check for ContextImports {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn code(&self) -> &'static str {
        "CTX"
    }

    fn description(&self) -> &'static str {
        "Imports across bounded contexts must be allowed and use the context's api"
    }

    fn run(&self, ctx: &CheckContext) -> Result<LintResult, CheckError> {
        let settings = &ctx.config.context_map;
        let map_path = settings.path.to_string_lossy().replace('\\', "/");
        if !ctx.documents.exists(&map_path) {
            debug!("{}: {map_path} not found", Self::NAME);
            return Ok(LintResult::skipped(Self::NAME, format!("{map_path} not found")));
        }
        let map = match Self::load_map(ctx, &map_path)? {
            Ok(map) => map,
            Err(v) => return Ok(LintResult::failed(Self::NAME, v)),
        };

        let resolver = ContextResolver::new(&map);
        let imports = Regex::new(IMPORT_PATTERN)?;
        let files = source_files(ctx.documents.root(), settings)?;

        let mut result = LintResult::new(Self::NAME);
        for file in &files {
            let Some(from) = resolver.resolve(file) else {
                continue;
            };
            result.files_checked += 1;
            let content = ctx.documents.read_text(file)?;
            if let Some(v) = first_violation(&content, file, from, &map, settings, &imports) {
                result.violations.push(v);
                return Ok(result);
            }
        }
        info!(
            "{}: {} file(s) owned by {} context(s)",
            Self::NAME,
            result.files_checked,
            map.contexts().len()
        );
        Ok(result)
    }
}

fn first_violation(
    content: &str,
    file: &str,
    from: &str,
    map: &ContextMap,
    settings: &ContextMapConfig,
    imports: &Regex,
) -> Option<Violation> {
    for caps in imports.captures_iter(content) {
        let statement = caps.get(0)?;
        let specifier = caps.get(1)?.as_str();
        let Some(target) =
            ContextImport::parse(specifier, &settings.import_alias, &settings.api_segment)
        else {
            continue;
        };
        if target.key == from {
            continue;
        }
        let location =
            Location::at_offset(file, content, statement.start(), statement.len());

        if !map.allows(from, target.key) {
            return Some(
                Violation::new(
                    "CTX001",
                    "context-edge",
                    location,
                    format!(
                        "context '{from}' may not import from '{}': {}",
                        target.key,
                        statement.as_str()
                    ),
                )
                .with_suggestion(Suggestion::new(format!(
                    "add '{}' to allow.{from} in {}, or remove the import",
                    target.key,
                    settings.path.display()
                ))),
            );
        }
        if !target.through_api {
            return Some(
                Violation::new(
                    "CTX002",
                    "context-api-surface",
                    location,
                    format!(
                        "import bypasses the {} surface of '{}': {specifier}",
                        settings.api_segment, target.key
                    ),
                )
                .with_suggestion(Suggestion::new(format!(
                    "import from a module under {}{}/{}/ instead",
                    settings.import_alias, target.key, settings.api_segment
                ))),
            );
        }
    }
    None
}

/// Source files under the configured roots, as sorted repository-relative
/// paths.
fn source_files(root: &Path, settings: &ContextMapConfig) -> Result<Vec<String>, CheckError> {
    let mut files = Vec::new();
    for source_root in &settings.source_roots {
        let dir = root.join(source_root);
        if !dir.is_dir() {
            debug!("skipping missing source root {}", dir.display());
            continue;
        }

        let exclude_dirs = settings.exclude_dirs.clone();
        let mut builder = ignore::WalkBuilder::new(&dir);
        builder
            .hidden(true)
            .git_ignore(true)
            .filter_entry(move |e| {
                let is_dir = e.file_type().is_some_and(|t| t.is_dir());
                !(is_dir && exclude_dirs.iter().any(|d| e.file_name() == d.as_str()))
            });

        for entry in builder.build() {
            let entry = entry?;
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            let rel = relative_to(root, entry.path());
            if is_source_file(&rel, settings) {
                files.push(rel);
            }
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn is_source_file(path: &str, settings: &ContextMapConfig) -> bool {
    let has_extension = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| settings.extensions.iter().any(|x| x == ext));
    has_extension && !settings.exclude_suffixes.iter().any(|s| path.ends_with(s.as_str()))
}
