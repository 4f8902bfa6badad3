use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unmapped value {value:?} in field '{field}' at row {row}")]
    UnmappedValue {
        field: &'static str,
        row: usize,
        value: String,
    },
}

pub type Result<T> = std::result::Result<T, NormalizeError>;
