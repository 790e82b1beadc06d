//! Locating the latest published artifact of a dataset.
//!
//! Dataset artifacts live below the dataset root in directories of
//! the form `<tier>/v<semver>/`. The latest artifact is the one
//! with the most preferred processing tier; ties are broken by the
//! highest semantic version.

use std::fmt::{self, Display};
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use semver::Version;

/// A processing stage of a dataset artifact.
///
/// Lower priority values are preferred when multiple stages of the
/// same dataset are published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Tier {
    Processed,
    Deduplicated,
    Raw,
}

impl Tier {
    #[inline]
    pub(crate) fn priority(self) -> u8 {
        match self {
            Self::Processed => 1,
            Self::Deduplicated => 2,
            Self::Raw => 3,
        }
    }

    /// Maps a directory name onto a tier. Alias spellings found in
    /// older dataset trees are accepted.
    pub(crate) fn from_dir_name(name: &str) -> Option<Self> {
        match name {
            "processed" => Some(Self::Processed),
            "deduplicated" | "dedup" => Some(Self::Deduplicated),
            "raw" | "original" => Some(Self::Raw),
            _ => None,
        }
    }
}

impl Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Processed => write!(f, "processed"),
            Self::Deduplicated => write!(f, "deduplicated"),
            Self::Raw => write!(f, "raw"),
        }
    }
}

/// A versioned dataset artifact directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct VersionedArtifact {
    pub(crate) tier: Tier,
    pub(crate) version: Version,
    pub(crate) path: PathBuf,
}

impl Display for VersionedArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/v{}", self.tier, self.version)
    }
}

/// Finds the latest artifact below the dataset root directory.
///
/// Immediate subdirectories that are not a recognized tier are
/// skipped, as are version directories whose name is not `v`
/// followed by a parseable semantic version. A missing root or the
/// absence of any valid candidate yields `None`; the scan never
/// fails and never mutates the filesystem.
pub(crate) fn find_latest_version(
    root: &Path,
) -> Option<VersionedArtifact> {
    if !root.is_dir() {
        debug!(
            "not a directory or does not exist: {}",
            root.display()
        );
        return None;
    }

    let mut candidates = vec![];

    for entry in fs::read_dir(root).ok()?.filter_map(Result::ok) {
        let tier_dir = entry.path();
        if !tier_dir.is_dir() {
            continue;
        }

        let Some(name) =
            tier_dir.file_name().and_then(|name| name.to_str())
        else {
            continue;
        };

        let Some(tier) = Tier::from_dir_name(name) else {
            debug!(
                "skipping unknown tier directory: {}",
                tier_dir.display()
            );
            continue;
        };

        let Ok(entries) = fs::read_dir(&tier_dir) else {
            continue;
        };

        for entry in entries.filter_map(Result::ok) {
            let version_dir = entry.path();
            if !version_dir.is_dir() {
                continue;
            }

            let Some(rest) = version_dir
                .file_name()
                .and_then(|name| name.to_str())
                .and_then(|name| name.strip_prefix('v'))
            else {
                debug!(
                    "skipping non-versioned directory: {}",
                    version_dir.display()
                );
                continue;
            };

            match Version::parse(rest) {
                Ok(version) => {
                    candidates.push(VersionedArtifact {
                        tier,
                        version,
                        path: version_dir,
                    });
                }
                Err(_) => {
                    debug!(
                        "skipping invalid version string: {}",
                        version_dir.display()
                    );
                }
            }
        }
    }

    // Lowest tier priority wins, then the highest version; equal
    // (tier, version) pairs fall back to the lexically smallest
    // path so the result is deterministic.
    candidates.into_iter().min_by(|a, b| {
        a.tier
            .priority()
            .cmp(&b.tier.priority())
            .then_with(|| b.version.cmp(&a.version))
            .then_with(|| a.path.cmp(&b.path))
    })
}

#[cfg(test)]
mod tests {
    use std::fs::create_dir_all;

    use tempfile::TempDir;

    use super::*;

    type TestResult = anyhow::Result<()>;

    fn artifact_dirs(dirs: &[&str]) -> anyhow::Result<TempDir> {
        let root = TempDir::new()?;
        for dir in dirs {
            create_dir_all(root.path().join(dir))?;
        }
        Ok(root)
    }

    #[test]
    fn tier_from_dir_name() {
        use Tier::*;

        assert_eq!(Tier::from_dir_name("processed"), Some(Processed));
        assert_eq!(
            Tier::from_dir_name("deduplicated"),
            Some(Deduplicated)
        );
        assert_eq!(Tier::from_dir_name("dedup"), Some(Deduplicated));
        assert_eq!(Tier::from_dir_name("raw"), Some(Raw));
        assert_eq!(Tier::from_dir_name("original"), Some(Raw));
        assert_eq!(Tier::from_dir_name("images"), None);
    }

    #[test]
    fn tier_beats_version_magnitude() -> TestResult {
        let root = artifact_dirs(&[
            "processed/v1.0.0",
            "deduplicated/v9.9.9",
        ])?;

        let artifact =
            find_latest_version(root.path()).expect("artifact");
        assert_eq!(artifact.tier, Tier::Processed);
        assert_eq!(artifact.version, Version::new(1, 0, 0));
        Ok(())
    }

    #[test]
    fn prerelease_precedence() -> TestResult {
        // 2.0.0-beta > 1.9.0 under semver precedence
        let root = artifact_dirs(&[
            "raw/v1.0.0",
            "raw/v2.0.0-beta",
            "raw/v1.9.0",
        ])?;

        let artifact =
            find_latest_version(root.path()).expect("artifact");
        assert_eq!(artifact.version, Version::parse("2.0.0-beta")?);
        assert!(artifact.path.ends_with("raw/v2.0.0-beta"));
        Ok(())
    }

    #[test]
    fn release_outranks_prerelease_of_same_version() -> TestResult {
        let root = artifact_dirs(&[
            "raw/v2.0.0-beta",
            "raw/v2.0.0",
        ])?;

        let artifact =
            find_latest_version(root.path()).expect("artifact");
        assert_eq!(artifact.version, Version::new(2, 0, 0));
        Ok(())
    }

    #[test]
    fn invalid_version_names_are_skipped() -> TestResult {
        let root = artifact_dirs(&[
            "raw/v1.0.0",
            "raw/vnext",
            "raw/v2.0",
            "raw/notes",
        ])?;

        let artifact =
            find_latest_version(root.path()).expect("artifact");
        assert_eq!(artifact.version, Version::new(1, 0, 0));
        Ok(())
    }

    #[test]
    fn unrecognized_tiers_are_skipped() -> TestResult {
        let root = artifact_dirs(&[
            "images/v9.0.0",
            "scratch/v2.0.0",
        ])?;

        assert_eq!(find_latest_version(root.path()), None);
        Ok(())
    }

    #[test]
    fn missing_root_is_none() {
        let root = Path::new("/no/such/dataset");
        assert_eq!(find_latest_version(root), None);
    }

    #[test]
    fn no_valid_candidates_is_none() -> TestResult {
        let root = artifact_dirs(&["raw/vgarbage"])?;
        assert_eq!(find_latest_version(root.path()), None);
        Ok(())
    }
}
