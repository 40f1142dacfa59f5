//! Named, typed field definitions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::column_type::ColumnType;

/// A column name paired with its required type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub dtype: ColumnType,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, dtype: ColumnType) -> Self {
        Self {
            name: name.into(),
            dtype,
        }
    }
}

impl fmt::Display for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.dtype)
    }
}

impl From<(String, ColumnType)> for FieldSpec {
    fn from((name, dtype): (String, ColumnType)) -> Self {
        Self { name, dtype }
    }
}

impl From<(&str, ColumnType)> for FieldSpec {
    fn from((name, dtype): (&str, ColumnType)) -> Self {
        Self::new(name, dtype)
    }
}

impl From<(&String, &ColumnType)> for FieldSpec {
    fn from((name, dtype): (&String, &ColumnType)) -> Self {
        Self::new(name.clone(), dtype.clone())
    }
}
