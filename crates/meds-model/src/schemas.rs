//! The static MEDS table schemas.
//!
//! Each schema is built once on first use and shared read-only afterwards.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::column_type::ColumnType;
use crate::constants::{
    BOOLEAN_VALUE_FIELD, CATEGORICAL_VALUE_FIELD, CODE_FIELD, CODE_TYPE, DESCRIPTION_FIELD,
    FLOAT_VALUE_FIELD, INTEGER_VALUE_FIELD, NUMERIC_VALUE_FIELD, NUMERIC_VALUE_TYPE,
    PARENT_CODES_FIELD, PREDICTION_TIME_FIELD, SPLIT_FIELD, SUBJECT_ID_FIELD, SUBJECT_ID_TYPE,
    TEXT_VALUE_FIELD, TIME_FIELD, TIME_TYPE,
};
use crate::error::SchemaError;
use crate::schema::{ResolvedSchema, SchemaSpec};

static DATA_SCHEMA: LazyLock<SchemaSpec> = LazyLock::new(|| {
    SchemaSpec::builtin(
        &[
            (SUBJECT_ID_FIELD, SUBJECT_ID_TYPE),
            (TIME_FIELD, TIME_TYPE),
            (CODE_FIELD, CODE_TYPE),
            (NUMERIC_VALUE_FIELD, NUMERIC_VALUE_TYPE),
        ],
        &[
            (CATEGORICAL_VALUE_FIELD, ColumnType::Utf8),
            (TEXT_VALUE_FIELD, ColumnType::Utf8),
        ],
    )
});

static LABEL_SCHEMA: LazyLock<SchemaSpec> = LazyLock::new(|| {
    SchemaSpec::builtin(
        &[
            (SUBJECT_ID_FIELD, SUBJECT_ID_TYPE),
            (PREDICTION_TIME_FIELD, ColumnType::Timestamp),
        ],
        &[
            (BOOLEAN_VALUE_FIELD, ColumnType::Boolean),
            (INTEGER_VALUE_FIELD, ColumnType::Int64),
            (FLOAT_VALUE_FIELD, ColumnType::Float64),
            (CATEGORICAL_VALUE_FIELD, ColumnType::Utf8),
        ],
    )
});

static LABEL_TABLE_SCHEMA: LazyLock<ResolvedSchema> = LazyLock::new(|| {
    ResolvedSchema::builtin(&[
        (SUBJECT_ID_FIELD, SUBJECT_ID_TYPE),
        (PREDICTION_TIME_FIELD, ColumnType::Timestamp),
        (BOOLEAN_VALUE_FIELD, ColumnType::Boolean),
        (INTEGER_VALUE_FIELD, ColumnType::Int64),
        (FLOAT_VALUE_FIELD, ColumnType::Float64),
        (CATEGORICAL_VALUE_FIELD, ColumnType::Utf8),
    ])
});

static SUBJECT_SPLIT_SCHEMA: LazyLock<SchemaSpec> = LazyLock::new(|| {
    SchemaSpec::builtin(
        &[
            (SUBJECT_ID_FIELD, SUBJECT_ID_TYPE),
            (SPLIT_FIELD, ColumnType::Utf8),
        ],
        &[],
    )
});

static CODE_METADATA_SCHEMA: LazyLock<SchemaSpec> = LazyLock::new(|| {
    SchemaSpec::builtin(
        &[
            (CODE_FIELD, CODE_TYPE),
            (DESCRIPTION_FIELD, ColumnType::Utf8),
            (PARENT_CODES_FIELD, ColumnType::list(ColumnType::Utf8)),
        ],
        &[],
    )
});

/// Event data: one row per measurement, with caller-defined extra columns.
pub fn data_schema() -> &'static SchemaSpec {
    &DATA_SCHEMA
}

/// Prediction labels. Consumers read whichever value column is non-null.
pub fn label_schema() -> &'static SchemaSpec {
    &LABEL_SCHEMA
}

/// The label schema as an exact six-column table layout.
pub fn label_table_schema() -> &'static ResolvedSchema {
    &LABEL_TABLE_SCHEMA
}

/// Subject-to-split assignments.
pub fn subject_split_schema() -> &'static SchemaSpec {
    &SUBJECT_SPLIT_SCHEMA
}

/// Per-code metadata. Must hold at least one row for every code in a dataset.
pub fn code_metadata_schema() -> &'static SchemaSpec {
    &CODE_METADATA_SCHEMA
}

/// The table schema kinds defined by MEDS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaKind {
    Data,
    Label,
    SubjectSplit,
    CodeMetadata,
}

impl SchemaKind {
    pub const ALL: [SchemaKind; 4] = [
        SchemaKind::Data,
        SchemaKind::Label,
        SchemaKind::SubjectSplit,
        SchemaKind::CodeMetadata,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaKind::Data => "data",
            SchemaKind::Label => "label",
            SchemaKind::SubjectSplit => "subject_split",
            SchemaKind::CodeMetadata => "code_metadata",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SchemaKind::Data => "Measurement events per subject",
            SchemaKind::Label => "Prediction labels at a prediction time",
            SchemaKind::SubjectSplit => "Train/tuning/held-out subject assignment",
            SchemaKind::CodeMetadata => "Descriptions and parent codes per code",
        }
    }

    pub fn spec(&self) -> &'static SchemaSpec {
        match self {
            SchemaKind::Data => data_schema(),
            SchemaKind::Label => label_schema(),
            SchemaKind::SubjectSplit => subject_split_schema(),
            SchemaKind::CodeMetadata => code_metadata_schema(),
        }
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaKind {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        match normalized.as_str() {
            "data" => Ok(SchemaKind::Data),
            "label" | "labels" => Ok(SchemaKind::Label),
            "subject_split" | "split" | "splits" => Ok(SchemaKind::SubjectSplit),
            "code_metadata" | "codes" => Ok(SchemaKind::CodeMetadata),
            _ => Err(SchemaError::UnknownKind {
                name: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldSpec;

    #[test]
    fn test_builtin_schemas_satisfy_invariants() {
        for kind in SchemaKind::ALL {
            let spec = kind.spec();
            assert!(
                SchemaSpec::new(spec.mandatory().to_vec(), spec.optional_fields()).is_ok(),
                "{kind} schema is invalid"
            );
        }
    }

    #[test]
    fn test_data_schema_fields() {
        let resolved = data_schema().resolve_empty();
        assert_eq!(
            resolved.names(),
            vec!["subject_id", "time", "code", "numeric_value"]
        );
        assert_eq!(
            data_schema().optional_type("text_value"),
            Some(&ColumnType::Utf8)
        );
    }

    #[test]
    fn test_label_table_schema_matches_label_spec() {
        let spec = label_schema();
        for field in label_table_schema() {
            let declared = spec
                .mandatory_type(&field.name)
                .or_else(|| spec.optional_type(&field.name));
            assert_eq!(declared, Some(&field.dtype), "{}", field.name);
        }
    }

    #[test]
    fn test_label_table_schema_order() {
        assert_eq!(
            label_table_schema().names(),
            vec![
                "subject_id",
                "prediction_time",
                "boolean_value",
                "integer_value",
                "float_value",
                "categorical_value",
            ]
        );
    }

    #[test]
    fn test_code_metadata_parent_codes_is_list() {
        assert_eq!(
            code_metadata_schema().mandatory_type("parent_codes"),
            Some(&ColumnType::list(ColumnType::Utf8))
        );
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!("subject-split".parse::<SchemaKind>().unwrap(), SchemaKind::SubjectSplit);
        assert_eq!("DATA".parse::<SchemaKind>().unwrap(), SchemaKind::Data);
        assert!("events".parse::<SchemaKind>().is_err());
        for kind in SchemaKind::ALL {
            assert_eq!(kind.as_str().parse::<SchemaKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_data_schema_custom_property() {
        let resolved = data_schema()
            .resolve([FieldSpec::new("unit", ColumnType::Utf8)])
            .unwrap();
        assert_eq!(resolved.len(), 5);
        assert_eq!(resolved.fields()[4].name, "unit");
    }
}
