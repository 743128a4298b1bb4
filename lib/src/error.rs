use polars::error::PolarsError;
use std::io::Error as IoError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),

    #[error("IO error: {0}")]
    Io(#[from] IoError),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Expected column not found: {0}")]
    MissingColumn(String),

    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    #[error("No data to show: {0}")]
    Empty(String),

    #[error("Render error: {0}")]
    Render(String),
}

impl Error {
    pub(crate) fn render<E: std::fmt::Display>(err: E) -> Self {
        Error::Render(err.to_string())
    }
}
