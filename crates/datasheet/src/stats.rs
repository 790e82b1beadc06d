//! Descriptive statistics over a dataset artifact.
//!
//! Artifacts are parquet files with the tabular schema `id`, `text`,
//! `source`, `added`, `created` and a precomputed `token_count`
//! column; tokenization itself happens upstream.

use std::fs;
use std::ops::Add;
use std::path::Path;

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{bail, DatasheetError, DatasheetResult};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize,
)]
pub(crate) struct DescriptiveStats {
    pub(crate) number_of_samples: u64,
    pub(crate) number_of_tokens: u64,
    pub(crate) min_length_tokens: u64,
    pub(crate) max_length_tokens: u64,
    pub(crate) number_of_characters: u64,
    pub(crate) min_length_characters: u64,
    pub(crate) max_length_characters: u64,
}

impl DescriptiveStats {
    /// Name of the stats file next to each datasheet.
    pub(crate) const FILENAME: &'static str =
        "descriptive_stats.json";

    pub(crate) fn average_document_length_tokens(&self) -> f64 {
        if self.number_of_samples == 0 {
            return 0.0;
        }

        self.number_of_tokens as f64 / self.number_of_samples as f64
    }

    pub(crate) fn average_document_length_characters(&self) -> f64 {
        if self.number_of_samples == 0 {
            return 0.0;
        }

        self.number_of_characters as f64
            / self.number_of_samples as f64
    }

    /// Loads previously computed statistics.
    pub(crate) fn from_path<P: AsRef<Path>>(
        path: P,
    ) -> DatasheetResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Persists the statistics as pretty-printed JSON.
    pub(crate) fn to_path<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> DatasheetResult<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Computes statistics over all parquet files of an artifact
    /// directory.
    pub(crate) fn from_artifact(
        dir: &Path,
    ) -> DatasheetResult<Self> {
        let pattern = dir.join("*.parquet");
        let Some(pattern) = pattern.to_str() else {
            bail!("non-utf8 artifact path: {}", dir.display());
        };

        let lf = LazyFrame::scan_parquet(
            pattern,
            ScanArgsParquet::default(),
        )?;

        Self::from_lazy(lf)
    }

    pub(crate) fn from_frame(
        df: DataFrame,
    ) -> DatasheetResult<Self> {
        Self::from_lazy(df.lazy())
    }

    fn from_lazy(lf: LazyFrame) -> DatasheetResult<Self> {
        let df = lf
            .select([
                col("token_count")
                    .count()
                    .cast(DataType::UInt64)
                    .alias("samples"),
                col("token_count")
                    .sum()
                    .cast(DataType::UInt64)
                    .alias("tokens"),
                col("token_count")
                    .min()
                    .cast(DataType::UInt64)
                    .alias("min_tokens"),
                col("token_count")
                    .max()
                    .cast(DataType::UInt64)
                    .alias("max_tokens"),
                col("text")
                    .str()
                    .len_chars()
                    .sum()
                    .cast(DataType::UInt64)
                    .alias("chars"),
                col("text")
                    .str()
                    .len_chars()
                    .min()
                    .cast(DataType::UInt64)
                    .alias("min_chars"),
                col("text")
                    .str()
                    .len_chars()
                    .max()
                    .cast(DataType::UInt64)
                    .alias("max_chars"),
            ])
            .collect()?;

        let value = |name: &str| -> DatasheetResult<u64> {
            Ok(df
                .column(name)?
                .u64()?
                .get(0)
                .unwrap_or_default())
        };

        Ok(Self {
            number_of_samples: value("samples")?,
            number_of_tokens: value("tokens")?,
            min_length_tokens: value("min_tokens")?,
            max_length_tokens: value("max_tokens")?,
            number_of_characters: value("chars")?,
            min_length_characters: value("min_chars")?,
            max_length_characters: value("max_chars")?,
        })
    }
}

impl Add for DescriptiveStats {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            number_of_samples: self.number_of_samples
                + other.number_of_samples,
            number_of_tokens: self.number_of_tokens
                + other.number_of_tokens,
            min_length_tokens: self
                .min_length_tokens
                .min(other.min_length_tokens),
            max_length_tokens: self
                .max_length_tokens
                .max(other.max_length_tokens),
            number_of_characters: self.number_of_characters
                + other.number_of_characters,
            min_length_characters: self
                .min_length_characters
                .min(other.min_length_characters),
            max_length_characters: self
                .max_length_characters
                .max(other.max_length_characters),
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    type TestResult = anyhow::Result<()>;

    fn stats(samples: u64, tokens: u64) -> DescriptiveStats {
        DescriptiveStats {
            number_of_samples: samples,
            number_of_tokens: tokens,
            min_length_tokens: 1,
            max_length_tokens: tokens,
            number_of_characters: 4 * tokens,
            min_length_characters: 4,
            max_length_characters: 4 * tokens,
        }
    }

    #[test]
    fn from_frame_counts() -> TestResult {
        let df = polars::df!(
            "text" => &["ab", "cdef", "ghi"],
            "token_count" => &[1i64, 3, 2],
        )?;

        let stats = DescriptiveStats::from_frame(df)?;

        assert_eq!(stats.number_of_samples, 3);
        assert_eq!(stats.number_of_tokens, 6);
        assert_eq!(stats.min_length_tokens, 1);
        assert_eq!(stats.max_length_tokens, 3);
        assert_eq!(stats.number_of_characters, 9);
        assert_eq!(stats.min_length_characters, 2);
        assert_eq!(stats.max_length_characters, 4);
        assert_eq!(stats.average_document_length_tokens(), 2.0);
        assert_eq!(stats.average_document_length_characters(), 3.0);
        Ok(())
    }

    #[test]
    fn empty_stats_have_zero_averages() {
        let stats = DescriptiveStats {
            number_of_samples: 0,
            number_of_tokens: 0,
            min_length_tokens: 0,
            max_length_tokens: 0,
            number_of_characters: 0,
            min_length_characters: 0,
            max_length_characters: 0,
        };

        assert_eq!(stats.average_document_length_tokens(), 0.0);
        assert_eq!(stats.average_document_length_characters(), 0.0);
    }

    #[test]
    fn merge_sums_and_extremes() {
        let merged = stats(2, 10) + stats(3, 4);

        assert_eq!(merged.number_of_samples, 5);
        assert_eq!(merged.number_of_tokens, 14);
        assert_eq!(merged.min_length_tokens, 1);
        assert_eq!(merged.max_length_tokens, 10);
        assert_eq!(merged.number_of_characters, 56);
        assert_eq!(merged.max_length_characters, 40);
    }

    #[test]
    fn json_roundtrip() -> TestResult {
        let dir = TempDir::new()?;
        let path = dir.path().join(DescriptiveStats::FILENAME);

        let stats = stats(7, 100);
        stats.to_path(&path)?;

        assert_eq!(DescriptiveStats::from_path(&path)?, stats);
        Ok(())
    }
}
