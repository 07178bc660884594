//! Ошибки библиотеки

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StressError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("dataset is empty")]
    EmptyDataset,

    #[error("column `{0}` not found")]
    MissingColumn(String),

    #[error("model error: {0}")]
    Model(String),

    #[error("model not trained")]
    NotTrained,

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, StressError>;
