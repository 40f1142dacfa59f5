//! Unified error type for schema conversion.

use thiserror::Error;

use meds_model::SchemaError;

use crate::report::ConversionReport;

/// Errors returned by [`convert`](crate::convert).
///
/// None of these is transient: each is a deterministic function of the source
/// schema, the target schema, and the options, so retrying cannot help.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConvertError {
    /// Malformed options, detected before the source table is inspected.
    #[error("Invalid conversion options: {message}")]
    Config { message: String },

    /// Extra fields could not be resolved against the schema.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The source table does not conform; every detected issue is listed.
    #[error("{0}")]
    Report(ConversionReport),

    /// The tabular backend failed to read, cast, or assemble a column.
    #[error("Table backend error: {message}")]
    Backend { message: String },
}

impl From<polars::prelude::PolarsError> for ConvertError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::Backend {
            message: err.to_string(),
        }
    }
}

/// Result type for conversion operations.
pub type Result<T> = std::result::Result<T, ConvertError>;

impl ConvertError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn backend(message: impl std::fmt::Display) -> Self {
        Self::Backend {
            message: message.to_string(),
        }
    }

    pub fn is_report(&self) -> bool {
        matches!(self, Self::Report(_))
    }

    /// The aggregated report, if this is a validation failure.
    pub fn report(&self) -> Option<&ConversionReport> {
        match self {
            Self::Report(report) => Some(report),
            _ => None,
        }
    }

    /// Get a user-friendly suggestion for fixing this error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::Config { .. } => {
                Some("Give the cast policy one entry for each mandatory and optional column, with no other keys.")
            }
            Self::Schema(_) => {
                Some("Rename custom columns that reuse a schema field name or fix their type.")
            }
            Self::Report(_) => Some(
                "Fix the listed columns, or relax the options (casting, missing columns, extra columns, reordering).",
            ),
            Self::Backend { .. } => {
                Some("Check that the column values can be represented in the target type.")
            }
        }
    }
}
