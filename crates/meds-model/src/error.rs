//! Error types for schema definition and resolution.

use thiserror::Error;

/// Errors raised while building or resolving a schema.
///
/// These are deterministic functions of the schema and the requested extra
/// fields; none of them is transient.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SchemaError {
    /// An extra field collides with a mandatory field, or with an optional
    /// field at a different type.
    #[error("Custom field '{field}' conflicts with the schema: {reason}")]
    Conflict {
        /// The offending field name.
        field: String,
        /// Why the field cannot be accepted.
        reason: String,
    },

    /// The same field name was supplied more than once.
    #[error("Field '{field}' is specified more than once")]
    DuplicateField { field: String },

    /// A schema specification violates its own invariants.
    #[error("Invalid schema specification: {message}")]
    InvalidSpec { message: String },

    /// A column type name could not be parsed.
    #[error("Unknown column type: {name}")]
    UnknownType { name: String },

    /// A schema kind name could not be parsed.
    #[error("Unknown schema kind: {name}")]
    UnknownKind { name: String },

    /// A subject split value is not one of the recognized splits.
    #[error("Unknown subject split: {value}")]
    UnknownSplit { value: String },

    /// A dataset metadata field holds an invalid value.
    #[error("Invalid dataset metadata field '{field}': {message}")]
    Metadata { field: String, message: String },
}

impl SchemaError {
    /// Create a conflict error for `field`.
    pub fn conflict(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Conflict {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for schema operations.
pub type Result<T> = std::result::Result<T, SchemaError>;
