//! Error types for the viewer.
//!
//! Only data-shape problems are errors. Stale plot or group indices are
//! recoverable no-ops and degenerate numerics are substituted, so neither
//! ever shows up here.

use thiserror::Error;

/// Result type alias for viewer operations.
pub type Result<T> = std::result::Result<T, ViewerError>;

/// Errors raised when a plot or group cannot be created as requested.
#[derive(Debug, Error)]
pub enum ViewerError {
    /// A named field does not exist in the structured array.
    #[error("{role} field '{field}' not found in data. Available: {available:?}")]
    FieldNotFound {
        role: &'static str,
        field: String,
        available: Vec<String>,
    },

    /// A structured array needs at least an x and a y field.
    #[error("Structured array must have at least 2 fields. Found {found}")]
    TooFewFields { found: usize },

    /// Columns of a structured array have different lengths.
    #[error("Field '{field}' has {found} values, expected {expected}")]
    RaggedColumns {
        field: String,
        expected: usize,
        found: usize,
    },

    /// The same field name appears twice in a structured array.
    #[error("Duplicate field name '{0}'")]
    DuplicateField(String),

    /// Point and colour arrays differ in length.
    #[error("Point count ({points}) does not match color value count ({colors})")]
    LengthMismatch { points: usize, colors: usize },

    /// Both normalize and center were requested for the same plot.
    #[error("Cannot specify both normalize and center")]
    ConflictingTransform,

    /// A group member does not share the field set of the first member.
    #[error("All plots in a group must have the same fields (missing: {missing:?}, extra: {extra:?})")]
    FieldSetMismatch {
        missing: Vec<String>,
        extra: Vec<String>,
    },

    /// A property name is not one of the mutable plot properties.
    #[error("Unknown plot property '{0}'")]
    UnknownProperty(String),

    /// A property value could not be parsed or is out of range.
    #[error("Invalid value '{value}' for property '{name}'")]
    InvalidProperty { name: String, value: String },

    /// A colour string could not be parsed.
    #[error("Invalid color '{0}'")]
    InvalidColor(String),

    /// Transform parameters or settings could not be encoded or decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Settings file could not be read or written.
    #[error("Settings I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No configuration directory is available on this platform.
    #[error("Could not determine config directory")]
    NoConfigDir,
}

impl ViewerError {
    /// Create a FieldNotFound error.
    pub fn field_not_found(role: &'static str, field: impl Into<String>, available: &[String]) -> Self {
        Self::FieldNotFound {
            role,
            field: field.into(),
            available: available.to_vec(),
        }
    }

    /// Create an InvalidProperty error.
    pub fn invalid_property(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidProperty {
            name: name.into(),
            value: value.into(),
        }
    }
}
