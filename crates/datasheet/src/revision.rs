//! Access to the version-control history of the repository.
//!
//! The history is consumed through a small capability interface so
//! commands can be exercised in tests without a real repository.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

pub(crate) trait RevisionStore {
    /// Returns the identifier of the revision that last touched
    /// `path`, or `None` if the path has no history.
    fn latest_revision(&self, path: &Path) -> Option<String>;

    /// Whether `ancestor` is an ancestor of `rev`.
    fn is_ancestor(&self, ancestor: &str, rev: &str) -> bool;
}

/// A [RevisionStore] backed by the `git` binary.
pub(crate) struct GitRevisionStore {
    repo_dir: PathBuf,
}

impl GitRevisionStore {
    pub(crate) fn new<P: Into<PathBuf>>(repo_dir: P) -> Self {
        Self {
            repo_dir: repo_dir.into(),
        }
    }
}

impl RevisionStore for GitRevisionStore {
    fn latest_revision(&self, path: &Path) -> Option<String> {
        let output = Command::new("git")
            .arg("log")
            .arg("--max-count=1")
            .arg("--format=%H")
            .arg("--")
            .arg(path)
            .current_dir(&self.repo_dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .output()
            .ok()?;

        if !output.status.success() {
            return None;
        }

        let rev = std::str::from_utf8(&output.stdout)
            .ok()?
            .trim()
            .to_string();

        if rev.is_empty() {
            None
        } else {
            Some(rev)
        }
    }

    fn is_ancestor(&self, ancestor: &str, rev: &str) -> bool {
        Command::new("git")
            .arg("merge-base")
            .arg("--is-ancestor")
            .arg(ancestor)
            .arg(rev)
            .current_dir(&self.repo_dir)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }
}

/// Whether the statistics file for a datasheet is out of date.
///
/// Statistics are stale when the datasheet has been touched by a
/// later revision than the one that produced the statistics, or
/// when the statistics were never committed at all. An uncommitted
/// datasheet has no history to compare against and counts as fresh.
pub(crate) fn stats_stale(
    store: &dyn RevisionStore,
    sheet: &Path,
    stats: &Path,
) -> bool {
    let Some(sheet_rev) = store.latest_revision(sheet) else {
        return false;
    };

    match store.latest_revision(stats) {
        None => true,
        Some(stats_rev) => {
            stats_rev != sheet_rev
                && store.is_ancestor(&stats_rev, &sheet_rev)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    /// Fake store with a linear history: revision "r1" precedes
    /// "r2" precedes "r3".
    struct FakeStore {
        revisions: HashMap<PathBuf, String>,
    }

    impl FakeStore {
        fn new(revisions: &[(&str, &str)]) -> Self {
            Self {
                revisions: revisions
                    .iter()
                    .map(|(path, rev)| {
                        (PathBuf::from(path), rev.to_string())
                    })
                    .collect(),
            }
        }
    }

    impl RevisionStore for FakeStore {
        fn latest_revision(&self, path: &Path) -> Option<String> {
            self.revisions.get(path).cloned()
        }

        fn is_ancestor(&self, ancestor: &str, rev: &str) -> bool {
            ancestor <= rev
        }
    }

    #[test]
    fn stale_when_sheet_touched_later() {
        let store = FakeStore::new(&[
            ("data/x/x.md", "r3"),
            ("data/x/descriptive_stats.json", "r1"),
        ]);

        assert!(stats_stale(
            &store,
            Path::new("data/x/x.md"),
            Path::new("data/x/descriptive_stats.json"),
        ));
    }

    #[test]
    fn fresh_when_same_revision() {
        let store = FakeStore::new(&[
            ("data/x/x.md", "r2"),
            ("data/x/descriptive_stats.json", "r2"),
        ]);

        assert!(!stats_stale(
            &store,
            Path::new("data/x/x.md"),
            Path::new("data/x/descriptive_stats.json"),
        ));
    }

    #[test]
    fn stale_when_stats_never_committed() {
        let store = FakeStore::new(&[("data/x/x.md", "r1")]);

        assert!(stats_stale(
            &store,
            Path::new("data/x/x.md"),
            Path::new("data/x/descriptive_stats.json"),
        ));
    }

    #[test]
    fn fresh_when_sheet_not_committed() {
        let store = FakeStore::new(&[]);

        assert!(!stats_stale(
            &store,
            Path::new("data/x/x.md"),
            Path::new("data/x/descriptive_stats.json"),
        ));
    }
}
