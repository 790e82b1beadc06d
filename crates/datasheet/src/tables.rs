//! Markdown tables embedded into the repository README.

use std::collections::BTreeMap;

use clap::ValueEnum;
use comfy_table::{presets, Row, Table};

use crate::prelude::*;
use crate::stats::DescriptiveStats;
use crate::utils::human_readable_large_int;
use crate::vocab::{Domain, Language, License};

/// Link targets for the canonical licenses; `other` licenses link
/// to the license section of their datasheet instead.
const DEFAULT_LICENSE_REFERENCES: &str = "\
[CC0]: https://creativecommons.org/publicdomain/zero/1.0/legalcode.en
[CC BY-SA 4.0]: https://creativecommons.org/licenses/by-sa/4.0/deed.en
[Apache 2.0]: https://www.apache.org/licenses/LICENSE-2.0
";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum,
)]
pub(crate) enum GroupBy {
    #[default]
    Domain,
    Language,
    License,
}

impl GroupBy {
    fn label(self) -> &'static str {
        match self {
            Self::Domain => "Domain",
            Self::Language => "Language",
            Self::License => "License",
        }
    }
}

/// One dataset of the overview, assembled from its datasheet and
/// statistics file.
#[derive(Debug, Clone)]
pub(crate) struct OverviewRow {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) domain: Option<Domain>,
    pub(crate) language: Vec<Language>,
    pub(crate) license: License,
    pub(crate) license_name: Option<String>,
    pub(crate) tokens: u64,
}

impl OverviewRow {
    pub(crate) fn license_label(&self) -> String {
        self.license_name
            .clone()
            .or_else(|| {
                self.license.display_name().map(String::from)
            })
            .unwrap_or_else(|| self.license.to_string())
    }

    fn group_key(&self, group: GroupBy) -> String {
        match group {
            GroupBy::Domain => self
                .domain
                .map(|domain| domain.to_string())
                .unwrap_or_else(|| "N/A".into()),
            GroupBy::Language => {
                let codes: Vec<_> = self
                    .language
                    .iter()
                    .map(|lang| lang.code())
                    .collect();
                codes.join(", ")
            }
            GroupBy::License => self
                .license
                .display_name()
                .unwrap_or("Other")
                .into(),
        }
    }
}

/// Collects one row per registered dataset, sorted by descending
/// token count.
pub(crate) fn collect_rows(
    repo: &Repository,
) -> DatasheetResult<Vec<OverviewRow>> {
    let mut rows = vec![];

    for dataset in repo.datasets()? {
        let sheet = Datasheet::load(repo.sheet_path(&dataset))?;
        let stats =
            DescriptiveStats::from_path(repo.stats_path(&dataset))?;

        rows.push(OverviewRow {
            description: sheet.short_description()?,
            domain: sheet
                .domains
                .as_ref()
                .and_then(|domains| domains.first().copied()),
            language: sheet.language,
            license: sheet.license,
            license_name: sheet.license_name,
            tokens: stats.number_of_tokens,
            name: dataset,
        });
    }

    rows.sort_by(|a, b| b.tokens.cmp(&a.tokens));
    Ok(rows)
}

fn markdown_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::ASCII_MARKDOWN);
    table.set_header(Row::from(header));
    table
}

fn readme_references(rows: &[OverviewRow]) -> String {
    rows.iter().fold(String::new(), |mut out, row| {
        out.push_str(&format!(
            "[{name}]: data/{name}/{name}.md\n",
            name = row.name
        ));
        out
    })
}

fn license_references(rows: &[OverviewRow]) -> String {
    let mut out = String::from(DEFAULT_LICENSE_REFERENCES);

    for row in rows {
        if row.license == License::Other {
            if let Some(name) = &row.license_name {
                out.push_str(&format!(
                    "[{name}]: ./data/{ds}/{ds}.md#license-information\n",
                    ds = row.name
                ));
            }
        }
    }

    out
}

/// The `MAIN TABLE` region: per-dataset overview with a total row
/// and the link references used by the table cells.
pub(crate) fn overview_table(rows: &[OverviewRow]) -> String {
    let mut table = markdown_table(vec![
        "Source",
        "Description",
        "Domain",
        "N. Tokens",
        "License",
    ]);

    for row in rows {
        table.add_row(vec![
            format!("[{}]", row.name),
            row.description.clone(),
            row.group_key(GroupBy::Domain),
            human_readable_large_int(row.tokens),
            format!("[{}]", row.license_label()),
        ]);
    }

    let total: u64 = rows.iter().map(|row| row.tokens).sum();
    table.add_row(vec![
        "**Total**".to_string(),
        String::new(),
        String::new(),
        human_readable_large_int(total),
        String::new(),
    ]);

    format!(
        "{table}\n\n{}\n{}",
        readme_references(rows),
        license_references(rows)
    )
}

/// Aggregates token counts and source names by a frontmatter
/// feature, sorted by descending token count.
pub(crate) fn grouped_entries(
    rows: &[OverviewRow],
    group: GroupBy,
) -> Vec<(String, Vec<String>, u64)> {
    let mut groups: BTreeMap<String, (Vec<String>, u64)> =
        BTreeMap::new();

    for row in rows {
        let entry =
            groups.entry(row.group_key(group)).or_default();
        entry.0.push(row.name.clone());
        entry.1 += row.tokens;
    }

    let mut entries: Vec<_> = groups
        .into_iter()
        .map(|(key, (sources, tokens))| (key, sources, tokens))
        .collect();
    entries.sort_by(|a, b| b.2.cmp(&a.2));
    entries
}

/// A `DOMAIN TABLE`/`LICENSE TABLE`-style region: token counts
/// aggregated by a frontmatter feature.
pub(crate) fn grouped_table(
    rows: &[OverviewRow],
    group: GroupBy,
) -> String {
    let mut table = markdown_table(vec![
        group.label(),
        "Sources",
        "N. Tokens",
    ]);

    let mut total = 0;
    for (key, sources, tokens) in grouped_entries(rows, group) {
        let sources: Vec<_> = sources
            .iter()
            .map(|name| format!("[{name}]"))
            .collect();

        table.add_row(vec![
            key,
            sources.join(", "),
            human_readable_large_int(tokens),
        ]);
        total += tokens;
    }

    table.add_row(vec![
        "**Total**".to_string(),
        String::new(),
        human_readable_large_int(total),
    ]);

    format!("{table}\n\n{}", readme_references(rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<OverviewRow> {
        vec![
            OverviewRow {
                name: "wiki".into(),
                description: "Encyclopedia dump".into(),
                domain: Some(Domain::Encyclopedic),
                language: vec![Language::Da],
                license: License::Cc0,
                license_name: Some("CC0".into()),
                tokens: 2_000_000,
            },
            OverviewRow {
                name: "memos".into(),
                description: "Internal memos".into(),
                domain: Some(Domain::Legal),
                language: vec![Language::Da, Language::En],
                license: License::Other,
                license_name: Some("Memo License".into()),
                tokens: 5_000,
            },
            OverviewRow {
                name: "laws".into(),
                description: "Legal corpus".into(),
                domain: Some(Domain::Legal),
                language: vec![Language::Da],
                license: License::CcBySa4,
                license_name: None,
                tokens: 495_000,
            },
        ]
    }

    #[test]
    fn overview_has_total_and_references() {
        let out = overview_table(&rows());

        assert!(out.contains("| [wiki]"));
        assert!(out.contains("2.00M"));
        assert!(out.contains("**Total**"));
        assert!(out.contains("2.50M"));
        assert!(out.contains("[wiki]: data/wiki/wiki.md"));
        assert!(out.contains(
            "[Memo License]: ./data/memos/memos.md#license-information"
        ));
        assert!(out.contains("[CC BY-SA 4.0]:"));
    }

    #[test]
    fn grouped_by_domain_aggregates_sources() {
        let out = grouped_table(&rows(), GroupBy::Domain);

        let legal = out
            .lines()
            .find(|line| line.contains("Legal"))
            .expect("legal row");
        assert!(legal.contains("[memos]"));
        assert!(legal.contains("[laws]"));
        assert!(out.contains("**Total**"));
    }

    #[test]
    fn grouped_by_license_uses_display_names() {
        let out = grouped_table(&rows(), GroupBy::License);

        assert!(out.contains("CC0"));
        assert!(out.contains("Other"));
        assert!(out.contains("CC BY-SA 4.0"));
    }

    #[test]
    fn license_label_falls_back_to_display_name() {
        let rows = rows();
        assert_eq!(rows[2].license_label(), "CC BY-SA 4.0");
        assert_eq!(rows[1].license_label(), "Memo License");
    }
}
