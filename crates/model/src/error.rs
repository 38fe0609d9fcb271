use thiserror::Error;

/// Errors raised while decoding grid requests or schema documents.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The JSON document could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A filter declared a type outside `string|numeric|date|list|boolean`.
    #[error("Unknown filter type: {0}")]
    UnknownFilterType(String),

    /// A filter declared an operator the grid does not send.
    #[error("Unknown filter operator: {0}")]
    UnknownOperator(String),

    /// The comparand has a shape no filter accepts (e.g. a nested object).
    #[error("Invalid filter value for '{property}': {reason}")]
    InvalidValue { property: String, reason: String },

    #[error("Unknown SQL dialect: {0}")]
    UnknownDialect(String),
}
