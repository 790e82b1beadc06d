use clap::Parser;
use comfy_table::{presets, Row, Table};

use crate::prelude::*;
use crate::revision::{stats_stale, GitRevisionStore};
use crate::stats::DescriptiveStats;
use crate::utils::human_readable_large_int;
use crate::version::find_latest_version;

/// Show the per-dataset status of the repository.
#[derive(Debug, Default, Parser)]
pub(crate) struct Status {
    /// Run verbosely. Print additional progress information to the
    /// standard error stream. This option conflicts with the
    /// `--quiet` option.
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Operate quietly; do not show progress. This option conflicts
    /// with the `--verbose` option.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Status {
    pub(crate) fn execute(self) -> DatasheetResult<()> {
        let repo = Repository::discover()?;
        let config = repo.config()?;
        let store = GitRevisionStore::new(repo.base_dir());

        let mut table = Table::new();
        table.load_preset(presets::UTF8_FULL_CONDENSED);
        table.set_header(Row::from(vec![
            "dataset", "artifact", "tokens", "stats",
        ]));

        for dataset in repo.datasets()? {
            let artifact =
                find_latest_version(&repo.dataset_dir(&dataset))
                    .map(|artifact| artifact.to_string())
                    .unwrap_or_else(|| "-".into());

            let stats_path = repo.stats_path(&dataset);
            let (tokens, state) = if stats_path.is_file() {
                let stats =
                    DescriptiveStats::from_path(&stats_path)?;
                let state = if stats_stale(
                    &store,
                    &repo.sheet_path(&dataset),
                    &stats_path,
                ) {
                    "stale"
                } else {
                    "ok"
                };

                (
                    human_readable_large_int(
                        stats.number_of_tokens,
                    ),
                    state,
                )
            } else {
                ("-".to_string(), "missing")
            };

            table.add_row(vec![
                dataset,
                artifact,
                tokens,
                state.to_string(),
            ]);
        }

        eprintln!(
            "datasheet repository '{}', version {}.\n",
            config.metadata.name, config.metadata.version
        );
        println!("{table}");

        Ok(())
    }
}
