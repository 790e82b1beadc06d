use std::fs;

use clap::Parser;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, MultiSelect, Select};

use crate::prelude::*;
use crate::vocab::{Domain, Language, License};

/// Skeleton every new datasheet starts from; the placeholders are
/// filled from the prompt answers.
const TEMPLATE: &str = "---
pretty_name: PRETTY_NAME
language:
- da
license: cc0-1.0
license_name: CC0
domains:
- Other
---

# Dataset Card for PRETTY_NAME

<!-- START-SHORT DESCRIPTION -->
SHORT_DESCRIPTION
<!-- END-SHORT DESCRIPTION -->

## Dataset Description

<!-- START-DESC-STATS -->
- **Number of samples**: 0
<!-- END-DESC-STATS -->

LONG_DESCRIPTION

## Additional Information

<!-- START-DATASET PLOTS -->
<!-- END-DATASET PLOTS -->

## License Information

LICENSE_INFORMATION

## Citation Information

CITATION_INFORMATION
";

/// Create a new datasheet and register it in the repository
/// README.
#[derive(Debug, Parser)]
pub(crate) struct New {
    /// Whether to overwrite an existing datasheet or not.
    #[arg(short, long)]
    force: bool,
}

impl New {
    pub(crate) fn execute(self) -> DatasheetResult<()> {
        let repo = Repository::discover()?;
        let theme = ColorfulTheme::default();

        let pretty_name: String = Input::with_theme(&theme)
            .with_prompt("Pretty name of the dataset")
            .interact_text()
            .map_err(DatasheetError::other)?;

        let id: String = Input::with_theme(&theme)
            .with_prompt("Dataset id")
            .validate_with(|input: &String| {
                let valid = !input.is_empty()
                    && input.chars().all(|c| {
                        c.is_ascii_lowercase()
                            || c.is_ascii_digit()
                            || c == '-'
                            || c == '_'
                    });

                if valid {
                    Ok(())
                } else {
                    Err("ids are lowercase alphanumerics, \
                        '-' or '_'")
                }
            })
            .interact_text()
            .map_err(DatasheetError::other)?;

        let sheet_path = repo.sheet_path(&id);
        if sheet_path.exists() && !self.force {
            bail!("datasheet for '{id}' already exists");
        }

        let codes: Vec<_> = Language::all()
            .iter()
            .map(|lang| format!("{} ({})", lang.code(), lang.name()))
            .collect();
        let selected = MultiSelect::with_theme(&theme)
            .with_prompt("Languages")
            .items(&codes)
            .interact()
            .map_err(DatasheetError::other)?;
        if selected.is_empty() {
            bail!("at least one language is required");
        }
        let languages: Vec<Language> = selected
            .into_iter()
            .map(|idx| Language::all()[idx])
            .collect();

        let selected = MultiSelect::with_theme(&theme)
            .with_prompt("Domains")
            .items(Domain::all())
            .interact()
            .map_err(DatasheetError::other)?;
        let domains: Vec<Domain> = selected
            .into_iter()
            .map(|idx| Domain::all()[idx])
            .collect();

        let licenses = [
            License::Cc0,
            License::CcBySa4,
            License::Apache2,
            License::Other,
        ];
        let selected = Select::with_theme(&theme)
            .with_prompt("License")
            .items(&licenses)
            .default(0)
            .interact()
            .map_err(DatasheetError::other)?;
        let license = licenses[selected];

        let license_name = match license.display_name() {
            Some(name) => name.to_string(),
            None => Input::with_theme(&theme)
                .with_prompt("License name")
                .interact_text()
                .map_err(DatasheetError::other)?,
        };

        let prompt_text = |prompt: &str| -> DatasheetResult<String> {
            Input::with_theme(&theme)
                .with_prompt(prompt)
                .allow_empty(true)
                .interact_text()
                .map_err(DatasheetError::other)
        };

        let short_description =
            prompt_text("Short description (one sentence)")?;
        let long_description = prompt_text("Long description")?;
        let license_information =
            prompt_text("License information")?;
        let citation_information =
            prompt_text("Citation information")?;

        let content = TEMPLATE
            .replace("PRETTY_NAME", &pretty_name)
            .replace("SHORT_DESCRIPTION", &short_description)
            .replace("LONG_DESCRIPTION", &long_description)
            .replace("LICENSE_INFORMATION", &license_information)
            .replace(
                "CITATION_INFORMATION",
                &citation_information,
            );

        let mut sheet =
            Datasheet::from_str(&sheet_path, &content)?;
        sheet.frontmatter.insert(
            "pretty_name".into(),
            pretty_name.clone().into(),
        );
        sheet.frontmatter.insert(
            "language".into(),
            serde_yaml::to_value(&languages)?,
        );
        sheet.frontmatter.insert(
            "license".into(),
            serde_yaml::to_value(license)?,
        );
        sheet.frontmatter.insert(
            "license_name".into(),
            license_name.clone().into(),
        );
        sheet.frontmatter.insert(
            "domains".into(),
            serde_yaml::to_value(&domains)?,
        );

        fs::create_dir_all(
            sheet_path.parent().expect("dataset directory"),
        )?;
        sheet.write()?;

        let mut main = repo.main_sheet()?;
        main.add_config(&id);
        main.write()?;

        println!(
            "Created datasheet for '{id}' at {}",
            sheet_path.display()
        );

        Ok(())
    }
}
