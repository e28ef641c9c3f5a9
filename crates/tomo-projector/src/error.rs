//! Projector errors

use thiserror::Error;
use tomo_config::ConfigError;
use tomo_geometry::GeometryError;

/// Errors raised while configuring a projector
#[derive(Debug, Error)]
pub enum ProjectorError {
    /// The caller broke a precondition, such as passing a config without root
    #[error("{component}: {message}")]
    Precondition { component: String, message: String },

    /// A recognized key holds a value outside its domain
    #[error("Invalid value for \"{key}\": {message}")]
    InvalidValue { key: String, message: String },

    /// A geometry required for readiness is absent or not initialized
    #[error("{component}: {dependency} not initialized.")]
    MissingDependency {
        component: String,
        dependency: &'static str,
    },

    #[error("Projector configuration has no \"type\" attribute")]
    MissingType,

    #[error("Unknown projector type: {0}")]
    UnknownType(String),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Config(ConfigError),
}

impl From<ConfigError> for ProjectorError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::MissingRoot { component } => ProjectorError::Precondition {
                component,
                message: "configuration has no root node".to_string(),
            },
            ConfigError::NotNumeric { ref key, .. }
            | ConfigError::NotBoolean { ref key, .. }
            | ConfigError::NotText { ref key, .. }
            | ConfigError::NotList { ref key, .. } => ProjectorError::InvalidValue {
                key: key.clone(),
                message: err.to_string(),
            },
            other => ProjectorError::Config(other),
        }
    }
}

/// Result type for projector operations
pub type Result<T> = std::result::Result<T, ProjectorError>;
