//! A datasheet is a markdown document with YAML frontmatter that
//! describes a single dataset (or, for the repository README, the
//! whole collection).

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_yaml::{Mapping, Value};

use crate::error::{bail, DatasheetError, DatasheetResult};
use crate::region;
use crate::stats::DescriptiveStats;
use crate::utils::human_readable_large_int;
use crate::vocab::{Domain, Language, License};

/// Tagged regions every dataset datasheet must provide.
pub(crate) const SHORT_DESCRIPTION: &str = "SHORT DESCRIPTION";
pub(crate) const DESC_STATS: &str = "DESC-STATS";
pub(crate) const DATASET_PLOTS: &str = "DATASET PLOTS";

/// Regions of the repository README.
pub(crate) const MAIN_TABLE: &str = "MAIN TABLE";
pub(crate) const DOMAIN_TABLE: &str = "DOMAIN TABLE";
pub(crate) const LICENSE_TABLE: &str = "LICENSE TABLE";
pub(crate) const README_TABLE: &str = "README TABLE";

pub(crate) const LICENSE_HEADER: &str = "## License Information";

/// Interior of the plots region; the referenced image is produced
/// by an external chart renderer.
pub(crate) const DATASET_PLOTS_BLOCK: &str = "\
<p align=\"center\">\n\
<img src=\"./images/dist_document_length.png\" width=\"600\" style=\"margin-right: 10px;\" />\n\
</p>";

#[derive(Debug, Deserialize)]
struct Frontmatter {
    pretty_name: String,
    license: License,
    #[serde(default)]
    license_name: Option<String>,
    language: Vec<Language>,
    #[serde(default)]
    domains: Option<Vec<Domain>>,
}

#[derive(Debug)]
pub(crate) struct Datasheet {
    /// Location the datasheet was loaded from and is written back
    /// to.
    pub(crate) path: PathBuf,

    /// The complete frontmatter, including passthrough keys such as
    /// `configs` that have no typed field.
    pub(crate) frontmatter: Mapping,

    /// The markdown body following the frontmatter block.
    pub(crate) body: String,

    pub(crate) pretty_name: String,
    pub(crate) license: License,
    pub(crate) license_name: Option<String>,
    pub(crate) language: Vec<Language>,
    pub(crate) domains: Option<Vec<Domain>>,
}

fn split_frontmatter(
    content: &str,
) -> DatasheetResult<(&str, &str)> {
    if let Some(rest) = content.strip_prefix("---") {
        if let Some(end) = rest.find("\n---") {
            return Ok((&rest[..end], &rest[end + 4..]));
        }
    }

    bail!("no frontmatter found in datasheet")
}

impl Datasheet {
    pub(crate) fn from_str<P>(
        path: P,
        content: &str,
    ) -> DatasheetResult<Self>
    where
        P: Into<PathBuf>,
    {
        let (frontmatter, body) = split_frontmatter(content)?;
        let fields: Frontmatter = serde_yaml::from_str(frontmatter)?;

        if let (Some(expected), Some(name)) =
            (fields.license.display_name(), &fields.license_name)
        {
            if name.as_str() != expected {
                bail!(
                    "license name '{name}' does not match \
                        license '{}'",
                    fields.license
                );
            }
        }

        Ok(Self {
            path: path.into(),
            frontmatter: serde_yaml::from_str(frontmatter)?,
            body: body.to_string(),
            pretty_name: fields.pretty_name,
            license: fields.license,
            license_name: fields.license_name,
            language: fields.language,
            domains: fields.domains,
        })
    }

    /// Loads a datasheet from disk.
    pub(crate) fn load<P: AsRef<Path>>(
        path: P,
    ) -> DatasheetResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_str(path.as_ref(), &content)
    }

    /// Renders the datasheet back to markdown.
    pub(crate) fn render(&self) -> DatasheetResult<String> {
        let frontmatter =
            serde_yaml::to_string(&self.frontmatter)?;

        Ok(format!(
            "---\n{}\n---\n\n{}\n",
            frontmatter.trim(),
            self.body.trim()
        ))
    }

    /// Writes the datasheet to the location it was loaded from.
    pub(crate) fn write(&self) -> DatasheetResult<()> {
        self.write_to(&self.path)
    }

    pub(crate) fn write_to<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> DatasheetResult<()> {
        fs::write(path, self.render()?)?;
        Ok(())
    }

    /// Returns the trimmed interior of a tagged region of the body.
    pub(crate) fn tag_content(
        &self,
        tag: &str,
    ) -> DatasheetResult<String> {
        region::extract(&self.body, tag)
    }

    /// Replaces the interior of a tagged region of the body.
    pub(crate) fn replace_tag(
        &mut self,
        tag: &str,
        content: &str,
    ) -> DatasheetResult<()> {
        self.body = region::replace(&self.body, tag, content)?;
        Ok(())
    }

    /// The short description, without a trailing full stop.
    pub(crate) fn short_description(
        &self,
    ) -> DatasheetResult<String> {
        let mut desc = self.tag_content(SHORT_DESCRIPTION)?;
        if desc.ends_with('.') {
            desc.pop();
        }

        Ok(desc)
    }

    /// Returns the section starting at `header` up to the next
    /// heading of the same or a shallower level.
    pub(crate) fn section_by_header(
        &self,
        header: &str,
    ) -> DatasheetResult<String> {
        let level =
            header.chars().take_while(|&c| c == '#').count();

        let Some(start) = self.body.find(header) else {
            bail!("header '{header}' not found in datasheet");
        };

        let tail_start = start + header.len();
        let mut end = self.body.len();
        let mut pos = tail_start;

        for line in self.body[tail_start..].split_inclusive('\n') {
            let depth =
                line.chars().take_while(|&c| c == '#').count();
            if depth > 0 && depth <= level {
                end = pos;
                break;
            }

            pos += line.len();
        }

        Ok(self.body[start..end].trim_end().to_string())
    }

    pub(crate) fn license_information(
        &self,
    ) -> DatasheetResult<String> {
        self.section_by_header(LICENSE_HEADER)
    }

    /// The markdown block spliced into the `DESC-STATS` region.
    pub(crate) fn stats_summary(
        &self,
        stats: &DescriptiveStats,
    ) -> String {
        let languages: Vec<_> =
            self.language.iter().map(|lang| lang.name()).collect();

        let mut out =
            format!("- **Language**: {}\n", languages.join(", "));

        if let Some(domains) = &self.domains {
            if !domains.is_empty() {
                let domains: Vec<_> = domains
                    .iter()
                    .map(|domain| domain.to_string())
                    .collect();
                out.push_str(&format!(
                    "- **Domains**: {}\n",
                    domains.join(", ")
                ));
            }
        }

        out.push_str(&format!(
            "- **Number of samples**: {}\n",
            human_readable_large_int(stats.number_of_samples)
        ));
        out.push_str(&format!(
            "- **Number of tokens (Llama 3)**: {}\n",
            human_readable_large_int(stats.number_of_tokens)
        ));
        out.push_str(&format!(
            "- **Average document length (characters)**: {:.2}\n",
            stats.average_document_length_characters()
        ));

        out
    }

    /// The dataset names registered in the `configs` frontmatter
    /// list (repository README only); the `default` config is not
    /// a dataset.
    pub(crate) fn configs(&self) -> Vec<String> {
        let Some(Value::Sequence(configs)) =
            self.frontmatter.get("configs")
        else {
            return vec![];
        };

        configs
            .iter()
            .filter_map(|cfg| {
                cfg.get("config_name").and_then(Value::as_str)
            })
            .filter(|name| *name != "default")
            .map(String::from)
            .collect()
    }

    /// Registers a dataset in the `configs` frontmatter list.
    pub(crate) fn add_config(&mut self, name: &str) {
        if self.configs().iter().any(|cfg| cfg == name) {
            return;
        }

        let mut entry = Mapping::new();
        entry.insert("config_name".into(), name.into());

        match self.frontmatter.get_mut("configs") {
            Some(Value::Sequence(configs)) => {
                configs.push(Value::Mapping(entry));
            }
            _ => {
                self.frontmatter.insert(
                    "configs".into(),
                    Value::Sequence(vec![Value::Mapping(entry)]),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = anyhow::Result<()>;

    const SHEET: &str = "---\n\
        pretty_name: Test Corpus\n\
        language:\n\
        - da\n\
        - en\n\
        license: cc0-1.0\n\
        license_name: CC0\n\
        domains:\n\
        - Books\n\
        - Web\n\
        ---\n\
        \n\
        # Dataset Card for Test Corpus\n\
        \n\
        <!-- START-SHORT DESCRIPTION -->\n\
        A tiny corpus used in tests.\n\
        <!-- END-SHORT DESCRIPTION -->\n\
        \n\
        ## Dataset Description\n\
        \n\
        <!-- START-DESC-STATS -->\n\
        - **Number of samples**: 0\n\
        <!-- END-DESC-STATS -->\n\
        \n\
        ### Extra\n\
        \n\
        details\n\
        \n\
        ## License Information\n\
        \n\
        Public domain.\n";

    fn sheet() -> Datasheet {
        Datasheet::from_str("test.md", SHEET).expect("valid sheet")
    }

    #[test]
    fn parse_typed_fields() {
        let sheet = sheet();

        assert_eq!(sheet.pretty_name, "Test Corpus");
        assert_eq!(sheet.license, License::Cc0);
        assert_eq!(sheet.license_name.as_deref(), Some("CC0"));
        assert_eq!(
            sheet.language,
            vec![Language::Da, Language::En]
        );
        assert_eq!(
            sheet.domains,
            Some(vec![Domain::Books, Domain::Web])
        );
    }

    #[test]
    fn parse_requires_frontmatter() {
        assert!(
            Datasheet::from_str("test.md", "# no frontmatter\n")
                .is_err()
        );
    }

    #[test]
    fn parse_rejects_license_name_mismatch() {
        let content =
            SHEET.replace("license_name: CC0", "license_name: MIT");
        assert!(Datasheet::from_str("test.md", &content).is_err());
    }

    #[test]
    fn render_roundtrip() -> TestResult {
        let rendered = sheet().render()?;
        let reparsed =
            Datasheet::from_str("test.md", &rendered)?;

        assert_eq!(reparsed.pretty_name, "Test Corpus");
        assert_eq!(reparsed.body.trim(), sheet().body.trim());
        assert_eq!(reparsed.render()?, rendered);
        Ok(())
    }

    #[test]
    fn short_description_strips_trailing_period() -> TestResult {
        assert_eq!(
            sheet().short_description()?,
            "A tiny corpus used in tests"
        );
        Ok(())
    }

    #[test]
    fn section_spans_subsections() -> TestResult {
        let section =
            sheet().section_by_header("## Dataset Description")?;

        assert!(section.starts_with("## Dataset Description"));
        assert!(section.contains("### Extra"));
        assert!(!section.contains("## License Information"));
        Ok(())
    }

    #[test]
    fn license_information_section() -> TestResult {
        let section = sheet().license_information()?;
        assert!(section.contains("Public domain."));
        Ok(())
    }

    #[test]
    fn replace_tag_in_body() -> TestResult {
        let mut sheet = sheet();
        sheet.replace_tag(DESC_STATS, "- **Samples**: 42")?;

        assert_eq!(
            sheet.tag_content(DESC_STATS)?,
            "- **Samples**: 42"
        );
        assert!(sheet.body.contains("A tiny corpus used in tests."));
        Ok(())
    }

    #[test]
    fn configs_roundtrip() {
        let mut sheet = sheet();
        assert!(sheet.configs().is_empty());

        sheet.add_config("wiki");
        sheet.add_config("books");
        sheet.add_config("wiki");

        assert_eq!(sheet.configs(), vec!["wiki", "books"]);
    }
}
