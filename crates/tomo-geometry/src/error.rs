//! Error types for geometry construction

use thiserror::Error;
use tomo_config::ConfigError;

/// Geometry-specific errors
#[derive(Debug, Error)]
pub enum GeometryError {
    /// Projection geometry node without a `type` attribute
    #[error("{component}: missing \"type\" attribute")]
    MissingType { component: String },

    /// Unrecognised projection geometry type
    #[error(
        "Unknown projection geometry type \"{0}\". Admissible choices are \"parallel3d\", \"parallel3d_vec\", \"cone\", \"cone_vec\"."
    )]
    UnknownType(String),

    /// A required node is absent
    #[error("{component}: missing required node \"{field}\"")]
    MissingField { component: String, field: String },

    /// A node or option holds an unusable value
    #[error("{component}: invalid \"{field}\": {reason}")]
    InvalidField {
        component: String,
        field: String,
        reason: String,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl GeometryError {
    pub(crate) fn invalid(
        component: &str,
        field: &str,
        reason: impl Into<String>,
    ) -> GeometryError {
        GeometryError::InvalidField {
            component: component.to_string(),
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, GeometryError>;
