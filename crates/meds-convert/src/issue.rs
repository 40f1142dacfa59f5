//! Conversion issue types.
//!
//! Each variant carries only the data its message needs.

use serde::Serialize;

use meds_model::ColumnType;

/// Kind of a [`ConversionIssue`], used to deduplicate per column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    MissingColumn,
    TypeMismatch,
    UnexpectedColumns,
    ColumnOrder,
}

impl IssueKind {
    pub fn label(&self) -> &'static str {
        match self {
            IssueKind::MissingColumn => "Missing column",
            IssueKind::TypeMismatch => "Type mismatch",
            IssueKind::UnexpectedColumns => "Unexpected columns",
            IssueKind::ColumnOrder => "Column order",
        }
    }
}

/// One reason a source table does not conform to its target schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConversionIssue {
    /// A mandatory column is absent and may not be synthesized.
    MissingColumn { column: String, expected: ColumnType },
    /// A column has the wrong type and may not be cast.
    TypeMismatch {
        column: String,
        expected: ColumnType,
        actual: ColumnType,
        optional: bool,
    },
    /// Columns outside the schema while extra columns are disallowed.
    UnexpectedColumns { columns: Vec<String> },
    /// Columns are out of canonical order while reordering is disallowed.
    ColumnOrder {
        expected: Vec<String>,
        actual: Vec<String>,
    },
}

impl ConversionIssue {
    pub fn kind(&self) -> IssueKind {
        match self {
            ConversionIssue::MissingColumn { .. } => IssueKind::MissingColumn,
            ConversionIssue::TypeMismatch { .. } => IssueKind::TypeMismatch,
            ConversionIssue::UnexpectedColumns { .. } => IssueKind::UnexpectedColumns,
            ConversionIssue::ColumnOrder { .. } => IssueKind::ColumnOrder,
        }
    }

    /// Columns this issue is about.
    pub fn columns(&self) -> Vec<&str> {
        match self {
            ConversionIssue::MissingColumn { column, .. }
            | ConversionIssue::TypeMismatch { column, .. } => vec![column.as_str()],
            ConversionIssue::UnexpectedColumns { columns } => {
                columns.iter().map(String::as_str).collect()
            }
            ConversionIssue::ColumnOrder { actual, .. } => actual.iter().map(String::as_str).collect(),
        }
    }

    /// Format message with issue-specific data.
    pub fn message(&self) -> String {
        match self {
            ConversionIssue::MissingColumn { column, expected } => {
                format!("Missing mandatory column '{column}' of type {expected}.")
            }
            ConversionIssue::TypeMismatch {
                column,
                expected,
                actual,
                optional: false,
            } => format!("Column '{column}' must be of type {expected}. Got {actual} instead."),
            ConversionIssue::TypeMismatch {
                column,
                expected,
                actual,
                optional: true,
            } => format!(
                "Optional column '{column}' must be of type {expected} if included. Got {actual} instead."
            ),
            ConversionIssue::UnexpectedColumns { columns } => {
                format!("Found unexpected columns: [{}]", columns.join(", "))
            }
            ConversionIssue::ColumnOrder { expected, actual } => format!(
                "Column order must be [{}]. Got [{}] instead.",
                expected.join(", "),
                actual.join(", ")
            ),
        }
    }
}

impl std::fmt::Display for ConversionIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}
