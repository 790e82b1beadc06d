pub(crate) type DatasheetResult<T> = Result<T, DatasheetError>;

macro_rules! bail {
    ($($arg:tt)*) => {{
        return Err(DatasheetError::Other(format!($($arg)*)));
    }};
}

pub(crate) use bail;

#[derive(Debug, thiserror::Error)]
pub(crate) enum DatasheetError {
    #[error(transparent)]
    IO(#[from] std::io::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Polars(#[from] polars::error::PolarsError),

    /// A tagged region is missing, duplicated or malformed. This is
    /// always a hard failure; datasheet structure is a maintained
    /// invariant of the documentation source.
    #[error("tag ({0}) not found in datasheet")]
    TagNotFound(String),

    #[error("{0}")]
    Other(String),
}

impl DatasheetError {
    #[inline]
    pub(crate) fn other<T: ToString>(s: T) -> Self {
        Self::Other(s.to_string())
    }
}
