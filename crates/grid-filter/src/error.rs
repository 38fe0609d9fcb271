use model::error::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompileError {
    /// The request names something the compiler refuses to guess about:
    /// an unknown filter type or operator, a malformed compound key, an
    /// unparseable date or an unknown time zone.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The request or schema document is not valid JSON.
    #[error("Invalid request document: {0}")]
    Request(#[source] serde_json::Error),
}

impl CompileError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        CompileError::Configuration(msg.into())
    }
}

impl From<ModelError> for CompileError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::Json(e) => CompileError::Request(e),
            other => CompileError::Configuration(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for CompileError {
    fn from(err: serde_json::Error) -> Self {
        CompileError::Request(err)
    }
}
