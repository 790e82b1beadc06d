use clap::{Parser, ValueEnum};
use indicatif::ParallelProgressIterator;
use rayon::prelude::*;

use crate::datasheet::{
    DATASET_PLOTS, DESC_STATS, LICENSE_HEADER, SHORT_DESCRIPTION,
};
use crate::prelude::*;
use crate::utils::relpath;
use crate::vocab::License;

const PBAR_VERIFY: &str =
    "Verifying datasheets: {human_pos} ({percent}%) | \
        elapsed: {elapsed_precise}{msg}";

#[derive(Clone, Debug, PartialEq, PartialOrd, Default, ValueEnum)]
pub(crate) enum VerifyMode {
    Permissive,
    #[default]
    Strict,
    Pedantic,
}

/// Verify that all datasheets follow the documented structure.
#[derive(Debug, Default, Parser)]
pub(crate) struct Verify {
    /// Run verbosely. Print additional progress information to the
    /// standard error stream. This option conflicts with the
    /// `--quiet` option.
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Operate quietly; do not show progress. This option conflicts
    /// with the `--verbose` option.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Set the verify mode: permissive, strict (default), or
    /// pedantic.
    #[arg(
        short,
        long,
        default_value = "strict",
        value_name = "mode",
        hide_possible_values = true,
        hide_default_value = true
    )]
    mode: VerifyMode,
}

impl Verify {
    pub(crate) fn execute(self) -> DatasheetResult<()> {
        let repo = Repository::discover()?;
        let datasets = repo.datasets()?;

        let pbar = ProgressBarBuilder::new(PBAR_VERIFY, self.quiet)
            .len(datasets.len() as u64)
            .build();

        let failures: Vec<String> = datasets
            .par_iter()
            .progress_with(pbar)
            .filter_map(|dataset| {
                verify_sheet(&repo, dataset, &self.mode)
                    .err()
                    .map(|error| format!("{dataset}: {error}"))
            })
            .collect();

        if !failures.is_empty() {
            for failure in &failures {
                eprintln!("verification failed: {failure}");
            }

            bail!(
                "{} datasheet(s) failed verification",
                failures.len()
            );
        }

        Ok(())
    }
}

fn verify_sheet(
    repo: &Repository,
    dataset: &str,
    mode: &VerifyMode,
) -> DatasheetResult<()> {
    let path = repo.sheet_path(dataset);
    if !path.is_file() {
        bail!(
            "datasheet not found (path = {:?})",
            relpath(&path, repo.base_dir())
        );
    }

    let sheet = Datasheet::load(&path)?;

    for tag in [SHORT_DESCRIPTION, DESC_STATS, DATASET_PLOTS] {
        sheet.tag_content(tag)?;
    }

    if *mode >= VerifyMode::Strict {
        if sheet.pretty_name.trim().is_empty() {
            bail!("pretty name is missing");
        }

        if sheet.license == License::Other {
            if sheet.license_name.is_none() {
                bail!("license 'other' requires a license name");
            }

            let info = sheet.license_information()?;
            if info
                .trim_start_matches(LICENSE_HEADER)
                .trim()
                .is_empty()
            {
                bail!(
                    "license 'other' requires license information"
                );
            }
        }

        if !matches!(&sheet.domains, Some(domains)
            if !domains.is_empty())
        {
            bail!("domains annotations are missing");
        }
    }

    if *mode >= VerifyMode::Pedantic {
        for header in
            ["## Dataset Description", "## Additional Information"]
        {
            sheet.section_by_header(header)?;
        }

        if !repo.stats_path(dataset).is_file() {
            bail!("missing statistics file");
        }
    }

    Ok(())
}
