//! Backend-independent column types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// Semantic type of a column.
///
/// The interchange set is closed: every static schema is expressed with the
/// variants below except [`ColumnType::Opaque`], which only describes source
/// columns whose backend type has no interchange equivalent (for example a
/// 32-bit integer or a nanosecond datetime). Opaque columns can still be cast
/// into interchange types by a backend adapter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ColumnType {
    /// 64-bit signed integer.
    Int64,
    /// 32-bit IEEE float.
    Float32,
    /// 64-bit IEEE float.
    Float64,
    /// UTF-8 string.
    Utf8,
    /// Timestamp with microsecond precision and no time zone.
    Timestamp,
    /// Boolean.
    Boolean,
    /// Variable-length list of the inner type.
    List(Box<ColumnType>),
    /// Untyped column; compatible with every other type.
    Null,
    /// Source type outside the interchange set, named by the backend.
    Opaque(String),
}

impl ColumnType {
    /// Shorthand for a list type.
    pub fn list(inner: ColumnType) -> Self {
        ColumnType::List(Box::new(inner))
    }

    /// Returns true if this type belongs to the interchange set.
    pub fn is_interchange(&self) -> bool {
        match self {
            ColumnType::Opaque(_) => false,
            ColumnType::List(inner) => inner.is_interchange(),
            _ => true,
        }
    }

    /// Returns true if a column of this type satisfies `other` without casting.
    ///
    /// Types are compatible when identical, when either side is
    /// [`ColumnType::Null`], or when both are lists of compatible element types.
    /// Numeric widening is never implied.
    pub fn is_compatible_with(&self, other: &ColumnType) -> bool {
        match (self, other) {
            (ColumnType::Null, _) | (_, ColumnType::Null) => true,
            (ColumnType::List(left), ColumnType::List(right)) => left.is_compatible_with(right),
            (left, right) => left == right,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Int64 => f.write_str("int64"),
            ColumnType::Float32 => f.write_str("float32"),
            ColumnType::Float64 => f.write_str("float64"),
            ColumnType::Utf8 => f.write_str("string"),
            ColumnType::Timestamp => f.write_str("timestamp[us]"),
            ColumnType::Boolean => f.write_str("bool"),
            ColumnType::List(inner) => write!(f, "list<{inner}>"),
            ColumnType::Null => f.write_str("null"),
            ColumnType::Opaque(name) => f.write_str(name),
        }
    }
}

impl FromStr for ColumnType {
    type Err = SchemaError;

    /// Parse an interchange type name. Opaque names are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        if let Some(inner) = normalized
            .strip_prefix("list<")
            .and_then(|rest| rest.strip_suffix('>'))
        {
            return inner.parse().map(ColumnType::list);
        }
        match normalized.as_str() {
            "int64" | "i64" => Ok(ColumnType::Int64),
            "float32" | "f32" => Ok(ColumnType::Float32),
            "float64" | "f64" | "double" => Ok(ColumnType::Float64),
            "string" | "str" | "utf8" => Ok(ColumnType::Utf8),
            "timestamp[us]" | "timestamp" => Ok(ColumnType::Timestamp),
            "bool" | "boolean" => Ok(ColumnType::Boolean),
            "null" => Ok(ColumnType::Null),
            _ => Err(SchemaError::UnknownType {
                name: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for ColumnType {
    type Error = SchemaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ColumnType> for String {
    fn from(value: ColumnType) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names() {
        assert_eq!(ColumnType::Int64.to_string(), "int64");
        assert_eq!(ColumnType::Timestamp.to_string(), "timestamp[us]");
        assert_eq!(
            ColumnType::list(ColumnType::Utf8).to_string(),
            "list<string>"
        );
        assert_eq!(ColumnType::Opaque("i32".into()).to_string(), "i32");
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("Int64".parse::<ColumnType>().unwrap(), ColumnType::Int64);
        assert_eq!(" utf8 ".parse::<ColumnType>().unwrap(), ColumnType::Utf8);
        assert_eq!(
            "list<list<f32>>".parse::<ColumnType>().unwrap(),
            ColumnType::list(ColumnType::list(ColumnType::Float32))
        );
        assert!(matches!(
            "i32".parse::<ColumnType>(),
            Err(SchemaError::UnknownType { .. })
        ));
    }

    #[test]
    fn test_compatibility() {
        assert!(ColumnType::Int64.is_compatible_with(&ColumnType::Int64));
        assert!(ColumnType::Null.is_compatible_with(&ColumnType::Timestamp));
        assert!(ColumnType::Utf8.is_compatible_with(&ColumnType::Null));
        assert!(
            ColumnType::list(ColumnType::Null)
                .is_compatible_with(&ColumnType::list(ColumnType::Utf8))
        );
        // No implicit widening.
        assert!(!ColumnType::Float32.is_compatible_with(&ColumnType::Float64));
        assert!(!ColumnType::Opaque("i32".into()).is_compatible_with(&ColumnType::Int64));
    }

    #[test]
    fn test_serde_as_name() {
        let json = serde_json::to_string(&ColumnType::list(ColumnType::Utf8)).unwrap();
        assert_eq!(json, "\"list<string>\"");
        let parsed: ColumnType = serde_json::from_str("\"float32\"").unwrap();
        assert_eq!(parsed, ColumnType::Float32);
    }

    #[test]
    fn test_is_interchange() {
        assert!(ColumnType::list(ColumnType::Utf8).is_interchange());
        assert!(!ColumnType::list(ColumnType::Opaque("date".into())).is_interchange());
    }
}
