use std::path::PathBuf;
use std::{env, fs};

use crate::config::Config;
use crate::datasheet::Datasheet;
use crate::error::{DatasheetError, DatasheetResult};

/// The root of a dataset-collection repository.
pub(crate) struct Repository {
    root_dir: PathBuf,
}

impl Repository {
    pub(crate) const CONFIG: &'static str = "datasheet.toml";
    pub(crate) const README: &'static str = "README.md";
    pub(crate) const DATA_DIR: &'static str = "data";
    pub(crate) const DATASETS_DIR: &'static str = "datasets";

    /// Discovers the repository root.
    ///
    /// This function fails, if neither the current directory nor
    /// any parent directory contains a repository [Config].
    pub(crate) fn discover() -> DatasheetResult<Self> {
        let mut root_dir = env::current_dir()?;

        loop {
            if let Ok(metadata) =
                fs::metadata(root_dir.join(Self::CONFIG))
            {
                if metadata.is_file() {
                    break;
                }
            }

            if !root_dir.pop() {
                return Err(DatasheetError::Other(
                    "not a datasheet repository (or any parent \
                        directory)"
                        .into(),
                ));
            }
        }

        Ok(Self { root_dir })
    }

    /// Returns the config associated with the repository.
    #[inline]
    pub(crate) fn config(&self) -> DatasheetResult<Config> {
        Config::from_path(self.root_dir.join(Self::CONFIG))
    }

    /// Returns the base directory of the repository.
    #[inline]
    pub(crate) fn base_dir(&self) -> &PathBuf {
        &self.root_dir
    }

    /// Returns the directory holding datasheets and statistics.
    #[inline]
    pub(crate) fn data_dir(&self) -> PathBuf {
        self.root_dir.join(Self::DATA_DIR)
    }

    /// Returns the directory holding versioned dataset artifacts.
    #[inline]
    pub(crate) fn datasets_dir(&self) -> PathBuf {
        self.root_dir.join(Self::DATASETS_DIR)
    }

    /// Loads the repository README (the main datasheet).
    ///
    /// The main datasheet is loaded once at the start of a run and
    /// passed along explicitly; it is never process-wide state.
    pub(crate) fn main_sheet(&self) -> DatasheetResult<Datasheet> {
        Datasheet::load(self.root_dir.join(Self::README))
    }

    /// The datasets registered in the main datasheet.
    pub(crate) fn datasets(&self) -> DatasheetResult<Vec<String>> {
        Ok(self.main_sheet()?.configs())
    }

    /// Path of the datasheet of a dataset.
    pub(crate) fn sheet_path(&self, dataset: &str) -> PathBuf {
        self.data_dir().join(dataset).join(format!("{dataset}.md"))
    }

    /// Path of the statistics file of a dataset.
    pub(crate) fn stats_path(&self, dataset: &str) -> PathBuf {
        self.data_dir()
            .join(dataset)
            .join(crate::stats::DescriptiveStats::FILENAME)
    }

    /// Root directory of the versioned artifacts of a dataset.
    pub(crate) fn dataset_dir(&self, dataset: &str) -> PathBuf {
        self.datasets_dir().join(dataset)
    }
}
