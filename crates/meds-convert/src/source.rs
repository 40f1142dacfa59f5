//! Capability trait for tabular sources.

use meds_model::{ColumnType, FieldSpec};

use crate::error::Result;

/// A borrowed table of named, typed columns with a uniform row count.
///
/// The reconciler only talks to a source through this trait, so any tabular
/// backend can be converted by implementing it. Column handles are expected to
/// be cheap to take (shared or reference-counted buffers).
pub trait SourceTable {
    /// Handle to one column of this backend.
    type Column;
    /// Table type produced by [`SourceTable::assemble`].
    type Output;

    /// Ordered description of the source columns.
    fn fields(&self) -> Result<Vec<FieldSpec>>;

    /// Row count shared by every column.
    fn height(&self) -> usize;

    /// Take the column called `name`.
    fn column(&self, name: &str) -> Result<Self::Column>;

    /// Cast `column` to an interchange type.
    fn cast(&self, column: Self::Column, dtype: &ColumnType) -> Result<Self::Column>;

    /// Build an all-null column.
    fn null_column(&self, name: &str, dtype: &ColumnType, height: usize) -> Result<Self::Column>;

    /// Assemble columns, in the given order, into an output table.
    fn assemble(&self, columns: Vec<Self::Column>) -> Result<Self::Output>;
}
