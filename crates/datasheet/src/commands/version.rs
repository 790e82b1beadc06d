use clap::{Parser, ValueEnum};

use crate::datasheet::README_TABLE;
use crate::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum BumpPart {
    Major,
    Minor,
    Patch,
}

/// Get or set the version of the dataset collection.
#[derive(Debug, Parser)]
pub(crate) struct Version {
    /// Whether to overwrite the current version or not.
    #[arg(short, long)]
    force: bool,

    /// Increment the given part of the current version instead of
    /// setting it explicitly.
    #[arg(long, value_name = "part", conflicts_with = "version")]
    bump: Option<BumpPart>,

    /// The new version of the dataset collection. Unless the
    /// `--force` option is set, the new version must be greater
    /// than the current version.
    version: Option<semver::Version>,
}

impl Version {
    pub(crate) fn execute(self) -> DatasheetResult<()> {
        let repo = Repository::discover()?;
        let mut config = repo.config()?;
        let current = config.metadata.version.clone();

        let next = match (self.version, self.bump) {
            (Some(version), _) => version,
            (None, Some(part)) => bumped(&current, part),
            (None, None) => {
                println!("{current}");
                return Ok(());
            }
        };

        if !self.force && next <= current {
            bail!("{next} must be greater than {current}");
        }

        config.metadata.version = next.clone();
        config.save()?;

        // The README mirrors the version in its overview table.
        let mut sheet = repo.main_sheet()?;
        let table = sheet.tag_content(README_TABLE)?;
        sheet.replace_tag(
            README_TABLE,
            &set_version_row(&table, &next)?,
        )?;
        sheet.write()?;

        Ok(())
    }
}

fn bumped(
    current: &semver::Version,
    part: BumpPart,
) -> semver::Version {
    match part {
        BumpPart::Major => {
            semver::Version::new(current.major + 1, 0, 0)
        }
        BumpPart::Minor => semver::Version::new(
            current.major,
            current.minor + 1,
            0,
        ),
        BumpPart::Patch => semver::Version::new(
            current.major,
            current.minor,
            current.patch + 1,
        ),
    }
}

/// Rewrites the `**Version**` row of the README table.
fn set_version_row(
    table: &str,
    version: &semver::Version,
) -> DatasheetResult<String> {
    let mut found = false;

    let lines: Vec<String> = table
        .lines()
        .map(|line| {
            if line.contains("**Version**") {
                found = true;
                format!(
                    "| **Version** | {version} \
                        ([Changelog](/CHANGELOG.md)) |"
                )
            } else {
                line.to_string()
            }
        })
        .collect();

    if !found {
        bail!("**Version** row not found in README table");
    }

    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = anyhow::Result<()>;

    #[test]
    fn bump_parts() {
        let current = semver::Version::new(1, 2, 3);

        assert_eq!(
            bumped(&current, BumpPart::Major),
            semver::Version::new(2, 0, 0)
        );
        assert_eq!(
            bumped(&current, BumpPart::Minor),
            semver::Version::new(1, 3, 0)
        );
        assert_eq!(
            bumped(&current, BumpPart::Patch),
            semver::Version::new(1, 2, 4)
        );
    }

    #[test]
    fn version_row_is_rewritten() -> TestResult {
        let table = "| **Language** | dan, dansk |\n\
            | **Version** | 1.0.0 ([Changelog](/CHANGELOG.md)) |\n\
            | **License** | Openly licensed |";

        let out = set_version_row(
            table,
            &semver::Version::new(1, 0, 1),
        )?;

        assert!(out.contains(
            "| **Version** | 1.0.1 ([Changelog](/CHANGELOG.md)) |"
        ));
        assert!(out.contains("| **Language** | dan, dansk |"));
        assert!(!out.contains("1.0.0"));
        Ok(())
    }

    #[test]
    fn version_row_must_exist() {
        let table = "| **Language** | dan, dansk |";
        assert!(set_version_row(
            table,
            &semver::Version::new(1, 0, 1)
        )
        .is_err());
    }
}
