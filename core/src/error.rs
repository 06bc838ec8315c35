use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Input rejected before any model is called (missing `Text` column, nothing left after trimming).
    #[error("invalid input: {0}")]
    InputValidation(String),

    /// A model capability is missing, failed to load, or returned malformed output.
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("resource not found: {}", .0.display())]
    ResourceNotFound(PathBuf),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Bincode(#[from] bincode::Error),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;

impl AnalysisError {
    pub fn model(msg: impl Into<String>) -> Self {
        AnalysisError::ModelUnavailable(msg.into())
    }

    pub fn input(msg: impl Into<String>) -> Self {
        AnalysisError::InputValidation(msg.into())
    }

    pub fn from_io(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            AnalysisError::ResourceNotFound(path.into())
        } else {
            AnalysisError::Io(err)
        }
    }
}
