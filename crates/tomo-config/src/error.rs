//! Configuration errors

use thiserror::Error;

/// Errors raised while reading or checking a configuration tree
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration handle has no root node
    #[error("{component}: configuration has no root node")]
    MissingRoot { component: String },

    #[error("Option \"{key}\" is not numerical: {value}")]
    NotNumeric { key: String, value: String },

    #[error("Option \"{key}\" is not a boolean: {value}")]
    NotBoolean { key: String, value: String },

    #[error("Node \"{key}\" does not hold text: {value}")]
    NotText { key: String, value: String },

    #[error("Node \"{key}\" does not hold a numerical list: {value}")]
    NotList { key: String, value: String },

    /// Entries of the configuration were never read by the component
    #[error("{component}: unused configuration entries: {}", .entries.join(", "))]
    Unconsumed {
        component: String,
        entries: Vec<String>,
    },

    #[error("Invalid configuration document: {0}")]
    InvalidDocument(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for configuration access
pub type Result<T> = std::result::Result<T, ConfigError>;
