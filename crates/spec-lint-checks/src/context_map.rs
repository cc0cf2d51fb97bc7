//! Context map: bounded contexts, their roots, and the allowed edges.

use serde::Deserialize;
use std::collections::{BTreeMap, HashMap, HashSet};

/// On-disk schema: `{ contexts: [{key, root}], allow: { key: [key...] } }`.
///
/// Lists are optional so that `contexts:` or `allow:` left empty parse as
/// absent rather than failing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContextMapFile {
    /// Declared contexts.
    #[serde(default)]
    pub contexts: Option<Vec<ContextDef>>,
    /// Allowed imports: source context key to target context keys.
    #[serde(default)]
    pub allow: Option<BTreeMap<String, Option<Vec<String>>>>,
}

/// One bounded context.
#[derive(Debug, Clone, Deserialize)]
pub struct ContextDef {
    /// Context key (e.g. `billing`).
    pub key: String,
    /// Directory owning the context's files (e.g. `src/contexts/billing`).
    pub root: String,
}

/// Errors in a context map's content.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContextMapError {
    /// No context is declared.
    #[error("contexts is empty")]
    NoContexts,
    /// A context has an empty key.
    #[error("contexts[{index}].key is empty")]
    EmptyKey {
        /// Position in `contexts`.
        index: usize,
    },
    /// A context has an empty root.
    #[error("contexts[{index}].root is empty (context '{key}')")]
    EmptyRoot {
        /// Position in `contexts`.
        index: usize,
        /// Context key.
        key: String,
    },
    /// Two contexts share a key.
    #[error("contexts: duplicate key '{0}'")]
    DuplicateKey(String),
    /// `allow` names a context that is not declared.
    #[error("allow.{from}: unknown context '{unknown}'")]
    UnknownContext {
        /// Allow entry the unknown key was found in.
        from: String,
        /// Undeclared key.
        unknown: String,
    },
}

/// Validated context map.
#[derive(Debug, Clone)]
pub struct ContextMap {
    contexts: Vec<ContextDef>,
    allow: HashMap<String, HashSet<String>>,
}

impl ContextMap {
    /// Validates a parsed context map.
    ///
    /// Roots have trailing slashes trimmed.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn from_file(file: ContextMapFile) -> Result<Self, ContextMapError> {
        let contexts: Vec<ContextDef> = file
            .contexts
            .unwrap_or_default()
            .into_iter()
            .map(|c| ContextDef {
                root: c.root.trim().trim_end_matches('/').to_string(),
                key: c.key.trim().to_string(),
            })
            .collect();
        if contexts.is_empty() {
            return Err(ContextMapError::NoContexts);
        }

        let mut keys = HashSet::new();
        for (index, c) in contexts.iter().enumerate() {
            if c.key.is_empty() {
                return Err(ContextMapError::EmptyKey { index });
            }
            if c.root.is_empty() {
                return Err(ContextMapError::EmptyRoot {
                    index,
                    key: c.key.clone(),
                });
            }
            if !keys.insert(c.key.as_str()) {
                return Err(ContextMapError::DuplicateKey(c.key.clone()));
            }
        }

        let mut allow = HashMap::new();
        for (from, targets) in file.allow.unwrap_or_default() {
            let targets = targets.unwrap_or_default();
            for key in std::iter::once(&from).chain(&targets) {
                if !keys.contains(key.as_str()) {
                    return Err(ContextMapError::UnknownContext {
                        from: from.clone(),
                        unknown: key.clone(),
                    });
                }
            }
            allow.insert(from, targets.into_iter().collect());
        }

        Ok(Self { contexts, allow })
    }

    /// Whether `from` may import from `to`.
    #[must_use]
    pub fn allows(&self, from: &str, to: &str) -> bool {
        self.allow.get(from).is_some_and(|t| t.contains(to))
    }

    /// Contexts in declaration order.
    #[must_use]
    pub fn contexts(&self) -> &[ContextDef] {
        &self.contexts
    }

    /// Whether `key` names a declared context.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.contexts.iter().any(|c| c.key == key)
    }
}

/// Maps repository paths to the context owning them.
///
/// Longest root wins, so nested roots resolve to the innermost context.
pub struct ContextResolver {
    /// (root, key) sorted by root length descending.
    map: Vec<(String, String)>,
}

impl ContextResolver {
    /// Builds a resolver for a map.
    #[must_use]
    pub fn new(map: &ContextMap) -> Self {
        let mut map: Vec<(String, String)> = map
            .contexts()
            .iter()
            .map(|c| (c.root.clone(), c.key.clone()))
            .collect();
        map.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        Self { map }
    }

    /// Context owning `path`, if any.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<&str> {
        self.map
            .iter()
            .find(|(root, _)| {
                path.strip_prefix(root.as_str())
                    .is_some_and(|rest| rest.starts_with('/'))
            })
            .map(|(_, key)| key.as_str())
    }
}

/// An import specifier addressing a context through the alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextImport<'a> {
    /// Target context key.
    pub key: &'a str,
    /// Whether the import goes through the context's public surface.
    pub through_api: bool,
}

impl<'a> ContextImport<'a> {
    /// Parses `<alias><key>/<rest>`. A bare `<alias><key>` is not a context
    /// import, and only `<alias><key>/<api>/<module>` goes through the api.
    #[must_use]
    pub fn parse(specifier: &'a str, alias: &str, api_segment: &str) -> Option<Self> {
        let (key, rest) = specifier.strip_prefix(alias)?.split_once('/')?;
        if key.is_empty() {
            return None;
        }
        Some(Self {
            key,
            through_api: rest
                .strip_prefix(api_segment)
                .is_some_and(|module| module.starts_with('/')),
        })
    }
}
