use clap::Parser;
use comfy_table::{presets, Row, Table};

use crate::prelude::*;
use crate::tables::{self, GroupBy};
use crate::utils::human_readable_large_int;

/// Prints a summary of the dataset collection.
#[derive(Debug, Default, Parser)]
pub(crate) struct Summary {
    /// Run verbosely. Print additional progress information to the
    /// standard error stream. This option conflicts with the
    /// `--quiet` option.
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Operate quietly; do not show progress. This option conflicts
    /// with the `--verbose` option.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Aggregate token counts by a frontmatter feature instead of
    /// listing every dataset.
    #[arg(short, long, value_name = "feature")]
    group: Option<GroupBy>,

    /// Print the markdown rendition embedded into the README.
    #[arg(long)]
    markdown: bool,
}

impl Summary {
    pub(crate) fn execute(self) -> DatasheetResult<()> {
        let repo = Repository::discover()?;
        let rows = tables::collect_rows(&repo)?;

        if self.markdown {
            match self.group {
                Some(group) => {
                    println!(
                        "{}",
                        tables::grouped_table(&rows, group)
                    );
                }
                None => {
                    println!("{}", tables::overview_table(&rows));
                }
            }

            return Ok(());
        }

        let mut table = Table::new();
        table.load_preset(presets::UTF8_FULL_CONDENSED);

        match self.group {
            Some(group) => {
                table.set_header(Row::from(vec![
                    "group", "sources", "tokens",
                ]));

                for (key, sources, tokens) in
                    tables::grouped_entries(&rows, group)
                {
                    table.add_row(vec![
                        key,
                        sources.join(", "),
                        human_readable_large_int(tokens),
                    ]);
                }
            }
            None => {
                table.set_header(Row::from(vec![
                    "dataset",
                    "domain",
                    "license",
                    "tokens",
                    "description",
                ]));

                for row in &rows {
                    table.add_row(vec![
                        row.name.clone(),
                        row.domain
                            .map(|domain| domain.to_string())
                            .unwrap_or_default(),
                        row.license_label(),
                        human_readable_large_int(row.tokens),
                        row.description.clone(),
                    ]);
                }
            }
        }

        let total: u64 = rows.iter().map(|row| row.tokens).sum();
        eprintln!(
            "{} dataset(s), {} tokens.\n",
            rows.len(),
            human_readable_large_int(total)
        );
        println!("{table}");

        Ok(())
    }
}
