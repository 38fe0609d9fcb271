use grid_filter::CompileError;
use model::error::ModelError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to read input file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to deserialize input as JSON: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(serde_json::Error),

    #[error("Invalid schema: {0}")]
    Schema(#[from] ModelError),

    #[error("Failed to compile grid request: {0}")]
    Compile(#[from] CompileError),

    #[error("Configuration error: {0}")]
    Config(String),
}
