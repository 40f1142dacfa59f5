//! Schema reconciliation for MEDS tables.
//!
//! Given a source table and a [`TargetSchema`](meds_model::TargetSchema), the
//! [`SchemaReconciler`] validates the table, reports every conformance issue at
//! once, and otherwise produces a new table whose columns are exactly the
//! resolved schema: missing mandatory columns filled with nulls, mistyped
//! columns cast, columns reordered, extra columns kept or rejected.
//!
//! The engine only sees tables through [`SourceTable`]; polars `DataFrame`
//! implements it out of the box.
//!
//! ```no_run
//! use meds_convert::{ConvertOptions, convert};
//! use meds_model::data_schema;
//! use polars::prelude::*;
//!
//! # fn run(df: DataFrame) -> meds_convert::Result<()> {
//! let canonical: DataFrame = convert(&df, data_schema(), &ConvertOptions::default())?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod frame;
pub mod issue;
pub mod options;
pub mod reconcile;
pub mod report;
pub mod source;

pub use error::{ConvertError, Result};
pub use frame::{column_type_of, polars_dtype};
pub use issue::{ConversionIssue, IssueKind};
pub use options::{CastPolicy, ConvertOptions};
pub use reconcile::{ColumnAction, ConversionPlan, PlannedColumn, SchemaReconciler, convert};
pub use report::ConversionReport;
pub use source::SourceTable;
