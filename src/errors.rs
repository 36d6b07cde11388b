use thiserror::Error;

/// Error type for the storage, configuration, and validation layers.
///
/// Period math, aggregation, health classification, and recurring generation
/// are total over well-formed records and never produce one of these.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("{0}")]
    InvalidBackup(String),
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, FlowError>;
