//! Polars `DataFrame` adapter.

use polars::prelude::*;

use meds_model::{ColumnType, FieldSpec};

use crate::error::{ConvertError, Result};
use crate::source::SourceTable;

/// Map a polars dtype to its interchange type.
///
/// Dtypes without an interchange equivalent map to [`ColumnType::Opaque`]
/// carrying the polars name.
pub fn column_type_of(dtype: &DataType) -> ColumnType {
    match dtype {
        DataType::Int64 => ColumnType::Int64,
        DataType::Float32 => ColumnType::Float32,
        DataType::Float64 => ColumnType::Float64,
        DataType::String => ColumnType::Utf8,
        DataType::Boolean => ColumnType::Boolean,
        DataType::Datetime(TimeUnit::Microseconds, None) => ColumnType::Timestamp,
        DataType::List(inner) => ColumnType::list(column_type_of(inner)),
        DataType::Null => ColumnType::Null,
        other => ColumnType::Opaque(other.to_string()),
    }
}

/// Map an interchange type to the polars dtype it is stored as.
pub fn polars_dtype(dtype: &ColumnType) -> Result<DataType> {
    Ok(match dtype {
        ColumnType::Int64 => DataType::Int64,
        ColumnType::Float32 => DataType::Float32,
        ColumnType::Float64 => DataType::Float64,
        ColumnType::Utf8 => DataType::String,
        ColumnType::Boolean => DataType::Boolean,
        ColumnType::Timestamp => DataType::Datetime(TimeUnit::Microseconds, None),
        ColumnType::List(inner) => DataType::List(Box::new(polars_dtype(inner)?)),
        ColumnType::Null => DataType::Null,
        ColumnType::Opaque(name) => {
            return Err(ConvertError::backend(format!(
                "type '{name}' has no interchange equivalent and cannot be a conversion target"
            )));
        }
    })
}

impl SourceTable for DataFrame {
    type Column = Column;
    type Output = DataFrame;

    fn fields(&self) -> Result<Vec<FieldSpec>> {
        Ok(self
            .get_columns()
            .iter()
            .map(|column| FieldSpec::new(column.name().as_str(), column_type_of(column.dtype())))
            .collect())
    }

    fn height(&self) -> usize {
        DataFrame::height(self)
    }

    fn column(&self, name: &str) -> Result<Column> {
        Ok(DataFrame::column(self, name)?.clone())
    }

    fn cast(&self, column: Column, dtype: &ColumnType) -> Result<Column> {
        let target = polars_dtype(dtype)?;
        column.strict_cast(&target).map_err(|e| {
            ConvertError::backend(format!(
                "failed to cast column '{}' to {dtype}: {e}",
                column.name()
            ))
        })
    }

    fn null_column(&self, name: &str, dtype: &ColumnType, height: usize) -> Result<Column> {
        let target = polars_dtype(dtype)?;
        Ok(Column::full_null(name.into(), height, &target))
    }

    fn assemble(&self, columns: Vec<Column>) -> Result<DataFrame> {
        Ok(DataFrame::new(columns)?)
    }
}
