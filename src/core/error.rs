//! Custom error types for csv-analyst
//!
//! Provides a unified error handling system across all modules.

use thiserror::Error;

/// Main error type for csv-analyst operations
#[derive(Error, Debug)]
pub enum AnalystError {
    /// Model provider connection or API errors
    #[error("Provider error: {0}")]
    Provider(String),

    /// Model not available on the provider
    #[error("Model '{0}' not available. For Ollama run: ollama pull {0}")]
    ModelNotFound(String),

    /// Dataset loading errors
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Query rejected or failed while executing
    #[error("Query error: {0}")]
    Query(String),

    /// Tool execution errors
    #[error("Tool execution error: {0}")]
    ToolExecution(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// CSV parsing errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// SQLite errors
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error for other cases
    #[error("{0}")]
    Other(String),
}

/// Convenience Result type for csv-analyst operations
pub type Result<T> = std::result::Result<T, AnalystError>;

impl AnalystError {
    /// Create a provider error
    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }

    /// Create a dataset error
    pub fn dataset(msg: impl Into<String>) -> Self {
        Self::Dataset(msg.into())
    }

    /// Create a query error
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Create a tool execution error
    pub fn tool(msg: impl Into<String>) -> Self {
        Self::ToolExecution(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether the error came from talking to the model provider
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::Provider(_) | Self::ModelNotFound(_) | Self::Http(_)
        )
    }
}
