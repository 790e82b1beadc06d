use clap::Parser;
use glob::glob_with;
use indicatif::ParallelProgressIterator;
use log::{debug, info};
use rayon::prelude::*;

use crate::datasheet::{
    DATASET_PLOTS, DATASET_PLOTS_BLOCK, DESC_STATS, DOMAIN_TABLE,
    LICENSE_TABLE, MAIN_TABLE,
};
use crate::prelude::*;
use crate::stats::DescriptiveStats;
use crate::tables::{self, GroupBy};
use crate::utils::relpath;
use crate::version::find_latest_version;

const PBAR_UPDATE: &str =
    "Updating datasheets: {human_pos} ({percent}%) | \
        elapsed: {elapsed_precise}{msg}";

/// Update descriptive statistics and embedded tables.
///
/// Every dataset is processed independently; a failure in one
/// dataset never aborts the others. Failures are reported together
/// at the end of the run.
#[derive(Debug, Default, Parser)]
pub(crate) struct Update {
    /// Run verbosely. Print additional progress information to the
    /// standard error stream. This option conflicts with the
    /// `--quiet` option.
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Operate quietly; do not show progress. This option conflicts
    /// with the `--verbose` option.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Only update the given dataset.
    #[arg(long, value_name = "name")]
    dataset: Option<String>,

    /// Recompute statistics even if they already exist.
    #[arg(short, long)]
    force: bool,
}

impl Update {
    pub(crate) fn execute(self) -> DatasheetResult<()> {
        let repo = Repository::discover()?;
        let datasets = repo.datasets()?;

        let selected = match &self.dataset {
            Some(name) => {
                if !datasets.iter().any(|dataset| dataset == name) {
                    bail!("unknown dataset '{name}'");
                }

                vec![name.clone()]
            }
            None => datasets,
        };

        let pbar = ProgressBarBuilder::new(PBAR_UPDATE, self.quiet)
            .len(selected.len() as u64)
            .build();

        let failures: Vec<(String, DatasheetError)> = selected
            .par_iter()
            .progress_with(pbar)
            .filter_map(|dataset| {
                update_dataset(&repo, dataset, self.force)
                    .err()
                    .map(|error| (dataset.clone(), error))
            })
            .collect();

        if self.dataset.is_none() {
            update_main(&repo)?;
        }

        for (dataset, error) in &failures {
            eprintln!("error: updating '{dataset}' failed: {error}");
        }

        if !failures.is_empty() {
            bail!(
                "failed to update {} dataset(s)",
                failures.len()
            );
        }

        Ok(())
    }
}

fn update_dataset(
    repo: &Repository,
    dataset: &str,
    force: bool,
) -> DatasheetResult<()> {
    let sheet_path = repo.sheet_path(dataset);
    let stats_path = repo.stats_path(dataset);

    if stats_path.is_file() && !force {
        debug!(
            "statistics for '{dataset}' already exist, skipping"
        );
        return Ok(());
    }

    let mut sheet = Datasheet::load(&sheet_path)?;

    let Some(artifact) =
        find_latest_version(&repo.dataset_dir(dataset))
    else {
        bail!("no published artifact found for dataset '{dataset}'");
    };

    info!("computing statistics for '{dataset}' from {artifact}");

    let stats = DescriptiveStats::from_artifact(&artifact.path)?;
    stats.to_path(&stats_path)?;

    let summary = sheet.stats_summary(&stats);
    sheet.replace_tag(DESC_STATS, &summary)?;
    sheet.replace_tag(DATASET_PLOTS, DATASET_PLOTS_BLOCK)?;
    sheet.write()?;

    debug!("updated {}", relpath(&sheet_path, repo.base_dir()));
    Ok(())
}

/// Aggregates the per-dataset statistics and refreshes the stats
/// block and the overview/domain/license tables of the repository
/// README.
fn update_main(repo: &Repository) -> DatasheetResult<()> {
    info!("updating repository datasheet");

    let pattern = format!(
        "{}/**/{}",
        repo.data_dir().display(),
        DescriptiveStats::FILENAME
    );

    let mut merged: Option<DescriptiveStats> = None;
    for path in glob_with(&pattern, Default::default())
        .map_err(|e| DatasheetError::other(e.to_string()))?
        .filter_map(Result::ok)
    {
        let stats = DescriptiveStats::from_path(&path)?;
        merged = Some(match merged {
            Some(acc) => acc + stats,
            None => stats,
        });
    }

    let Some(total) = merged else {
        bail!(
            "no statistics found; update the datasets before the \
                repository datasheet"
        );
    };

    total
        .to_path(repo.base_dir().join(DescriptiveStats::FILENAME))?;

    let rows = tables::collect_rows(repo)?;
    let mut sheet = repo.main_sheet()?;

    let summary = sheet.stats_summary(&total);
    sheet.replace_tag(DESC_STATS, &summary)?;
    sheet.replace_tag(MAIN_TABLE, &tables::overview_table(&rows))?;
    sheet.replace_tag(
        DOMAIN_TABLE,
        &tables::grouped_table(&rows, GroupBy::Domain),
    )?;
    sheet.replace_tag(
        LICENSE_TABLE,
        &tables::grouped_table(&rows, GroupBy::License),
    )?;
    sheet.write()?;

    Ok(())
}
