//! Error types for the scoring and matching core

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {
    /// The queried drink identity is not in the catalog
    #[error("drink not found: {0}")]
    NotFound(String),

    /// A required derived column or schema entry is missing or malformed
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A trained collaborator produced output the core cannot use
    #[error("prediction error: {0}")]
    Prediction(String),
}
