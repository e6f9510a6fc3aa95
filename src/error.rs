use thiserror::Error;

#[derive(Error, Debug)]
pub enum GazeError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown Key: '{0}' is not part of the keyboard layout")]
    UnknownKey(char),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Data Validation Error: {0}")]
    Validation(String),
}

pub type GtResult<T> = Result<T, GazeError>;
