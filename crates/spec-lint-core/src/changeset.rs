//! Change set resolution.
//!
//! A [`ChangedFileSet`] is the ordered, deduplicated list of repository
//! relative paths modified in the revision range under review. It is
//! produced once per run by a [`ChangeSetProvider`].
//!
//! [`GitChangeSet`] resolves the range in this order:
//!
//! 1. Pull request event payload (`GITHUB_EVENT_PATH`) → `base...head`
//! 2. `git merge-base HEAD origin/main` → `base...HEAD`
//! 3. `HEAD~1..HEAD`

use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

use crate::paths::normalize;

/// Errors raised while resolving the change set.
#[derive(Debug, thiserror::Error)]
pub enum ChangeSetError {
    /// `git` could not be spawned.
    #[error("failed to run git: {0}")]
    Spawn(#[from] std::io::Error),

    /// `git` exited with a failure status.
    #[error("git {args} failed: {stderr}")]
    Git {
        /// Arguments passed to git.
        args: String,
        /// Captured standard error.
        stderr: String,
    },
}

/// Ordered, deduplicated set of changed paths. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangedFileSet {
    paths: Vec<String>,
    index: HashSet<String>,
}

impl ChangedFileSet {
    /// Builds a set from raw paths: normalises separators, drops empty
    /// entries and keeps the first occurrence of duplicates.
    #[must_use]
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();
        for raw in paths {
            let path = normalize(raw.as_ref());
            if path.is_empty() || set.index.contains(&path) {
                continue;
            }
            set.index.insert(path.clone());
            set.paths.push(path);
        }
        set
    }

    /// Parses the output of `git diff --name-only`.
    #[must_use]
    pub fn from_name_only(output: &str) -> Self {
        Self::new(output.lines())
    }

    /// Whether `path` was changed.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.index.contains(path)
    }

    /// Paths in diff order.
    #[must_use]
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// Iterates over the paths in diff order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    /// Number of changed paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Source of the change set for a run.
pub trait ChangeSetProvider {
    /// Returns the changed paths. An empty diff is an empty set, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying source cannot be queried.
    fn changed_files(&self) -> Result<ChangedFileSet, ChangeSetError>;
}

/// A fixed change set, e.g. from the command line.
#[derive(Debug, Clone, Default)]
pub struct StaticChangeSet {
    paths: Vec<String>,
}

impl StaticChangeSet {
    /// Creates a provider returning exactly these paths.
    #[must_use]
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }
}

impl ChangeSetProvider for StaticChangeSet {
    fn changed_files(&self) -> Result<ChangedFileSet, ChangeSetError> {
        Ok(ChangedFileSet::new(&self.paths))
    }
}

/// Change set computed from git history.
#[derive(Debug, Clone)]
pub struct GitChangeSet {
    repo: PathBuf,
    event_path: Option<PathBuf>,
    remote_main: String,
}

#[derive(Debug, Deserialize)]
struct EventPayload {
    pull_request: Option<PullRequest>,
}

#[derive(Debug, Deserialize)]
struct PullRequest {
    base: Option<GitRef>,
    head: Option<GitRef>,
}

#[derive(Debug, Deserialize)]
struct GitRef {
    sha: Option<String>,
}

impl GitChangeSet {
    /// Creates a provider for the repository at `repo`, comparing against
    /// `origin/main` and without a CI event payload.
    #[must_use]
    pub fn new(repo: impl Into<PathBuf>) -> Self {
        Self {
            repo: repo.into(),
            event_path: None,
            remote_main: "origin/main".to_string(),
        }
    }

    /// Sets the CI event payload file (pull request context).
    #[must_use]
    pub fn with_event_path(mut self, path: Option<PathBuf>) -> Self {
        self.event_path = path;
        self
    }

    /// Sets the remote branch used for the merge-base fallback.
    #[must_use]
    pub fn with_remote_main(mut self, remote: impl Into<String>) -> Self {
        self.remote_main = remote.into();
        self
    }

    /// Base and head revisions from the pull request payload, if any.
    ///
    /// A missing, unreadable or malformed payload counts as absent.
    fn pull_request_range(&self) -> Option<(String, String)> {
        let path = self.event_path.as_deref()?;
        let content = std::fs::read_to_string(path).ok()?;
        let event: EventPayload = match serde_json::from_str(&content) {
            Ok(e) => e,
            Err(e) => {
                debug!("ignoring unparsable event payload {}: {e}", path.display());
                return None;
            }
        };
        let pr = event.pull_request?;
        let base = pr.base?.sha.filter(|s| !s.is_empty())?;
        let head = pr.head?.sha.filter(|s| !s.is_empty())?;
        Some((base, head))
    }

    fn git(&self, args: &[&str]) -> Result<String, ChangeSetError> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo)
            .output()?;

        if !output.status.success() {
            return Err(ChangeSetError::Git {
                args: args.join(" "),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn diff(&self, range: &str) -> Result<ChangedFileSet, ChangeSetError> {
        debug!("git diff --name-only {range}");
        let out = self.git(&["-c", "core.quotePath=false", "diff", "--name-only", range])?;
        Ok(ChangedFileSet::from_name_only(&out))
    }

    fn diff_against_merge_base(&self) -> Result<ChangedFileSet, ChangeSetError> {
        let base = self.git(&["merge-base", "HEAD", &self.remote_main])?;
        self.diff(&format!("{base}...HEAD"))
    }
}

impl ChangeSetProvider for GitChangeSet {
    fn changed_files(&self) -> Result<ChangedFileSet, ChangeSetError> {
        if let Some((base, head)) = self.pull_request_range() {
            return self.diff(&format!("{base}...{head}"));
        }

        match self.diff_against_merge_base() {
            Ok(set) => Ok(set),
            Err(e) => {
                debug!("merge-base with {} unavailable: {e}", self.remote_main);
                self.diff("HEAD~1..HEAD")
            }
        }
    }
}

/// Returns true if `dir` is inside a git work tree.
#[must_use]
pub fn is_git_repo(dir: &Path) -> bool {
    Command::new("git")
        .args(["rev-parse", "--is-inside-work-tree"])
        .current_dir(dir)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn run_git(repo_dir: &Path, args: &[&str]) -> String {
        let output = Command::new("git")
            .args(args)
            .current_dir(repo_dir)
            .output()
            .unwrap();
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    fn commit_file(repo: &Path, rel: &str, content: &str) {
        let path = repo.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
        run_git(repo, &["add", "-A"]);
        run_git(repo, &["commit", "-q", "-m", rel]);
    }

    fn make_git_repo() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        run_git(dir.path(), &["init", "-q"]);
        run_git(dir.path(), &["config", "user.name", "test-user"]);
        run_git(dir.path(), &["config", "user.email", "test@example.com"]);
        commit_file(dir.path(), "README.md", "init\n");
        dir
    }

    #[test]
    fn new_dedups_and_normalizes() {
        let set = ChangedFileSet::new([
            "spec/process/a.bpmn",
            "",
            r"changes\CR-001.yml",
            "spec/process/a.bpmn",
            "changes/CR-001.yml",
        ]);
        assert_eq!(set.paths(), ["spec/process/a.bpmn", "changes/CR-001.yml"]);
        assert!(set.contains("changes/CR-001.yml"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn empty_output_is_empty_set() {
        let set = ChangedFileSet::from_name_only("");
        assert!(set.is_empty());
    }

    #[test]
    fn static_provider_returns_its_paths() {
        let provider = StaticChangeSet::new(["src/a.ts", "src/a.ts"]);
        let set = provider.changed_files().unwrap();
        assert_eq!(set.paths(), ["src/a.ts"]);
    }

    #[test]
    fn falls_back_to_previous_commit_without_remote() {
        let repo = make_git_repo();
        commit_file(repo.path(), "spec/process/order.bpmn", "<bpmn/>");

        let set = GitChangeSet::new(repo.path()).changed_files().unwrap();
        assert_eq!(set.paths(), ["spec/process/order.bpmn"]);
    }

    #[test]
    fn pull_request_payload_defines_range() {
        let repo = make_git_repo();
        let base = run_git(repo.path(), &["rev-parse", "HEAD"]);
        commit_file(repo.path(), "changes/CR-001.yml", "x: 1\n");
        commit_file(repo.path(), "spec/process/order.bpmn", "<bpmn/>");
        let head = run_git(repo.path(), &["rev-parse", "HEAD"]);

        let event = repo.path().join("event.json");
        fs::write(
            &event,
            format!(r#"{{"pull_request":{{"base":{{"sha":"{base}"}},"head":{{"sha":"{head}"}}}}}}"#),
        )
        .unwrap();

        let set = GitChangeSet::new(repo.path())
            .with_event_path(Some(event))
            .changed_files()
            .unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains("changes/CR-001.yml"));
        assert!(set.contains("spec/process/order.bpmn"));
    }

    #[test]
    fn malformed_payload_is_ignored() {
        let repo = make_git_repo();
        commit_file(repo.path(), "src/a.ts", "export {}\n");
        let event = repo.path().join("event.json");
        fs::write(&event, "not json").unwrap();

        let set = GitChangeSet::new(repo.path())
            .with_event_path(Some(event))
            .changed_files()
            .unwrap();
        assert_eq!(set.paths(), ["src/a.ts"]);
    }

    #[test]
    fn non_pr_payload_is_ignored() {
        let repo = make_git_repo();
        commit_file(repo.path(), "src/b.ts", "export {}\n");
        let event = repo.path().join("event.json");
        fs::write(&event, r#"{"ref":"refs/heads/main"}"#).unwrap();

        let set = GitChangeSet::new(repo.path())
            .with_event_path(Some(event))
            .changed_files()
            .unwrap();
        assert_eq!(set.paths(), ["src/b.ts"]);
    }

    #[test]
    fn outside_repo_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!is_git_repo(dir.path()));
        assert!(GitChangeSet::new(dir.path()).changed_files().is_err());
    }
}
