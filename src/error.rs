use thiserror::Error;

#[derive(Error, Debug)]
pub enum RpsError {
    #[error("Invalid weights: {0}")]
    InvalidWeights(String),

    #[error("Invalid action: {0}")]
    InvalidAction(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type RpsResult<T> = Result<T, RpsError>;
