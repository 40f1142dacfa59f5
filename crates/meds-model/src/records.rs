//! Typed records for MEDS labels, code metadata, and dataset metadata.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::{Result, SchemaError};

/// One prediction label.
///
/// Models predicting this label may use all data about the subject up to and
/// including `prediction_time`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub subject_id: i64,
    pub prediction_time: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boolean_value: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integer_value: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub float_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categorical_value: Option<String>,
}

/// The populated value of a [`Label`].
#[derive(Debug, Clone, PartialEq)]
pub enum LabelValue<'a> {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Categorical(&'a str),
}

impl Label {
    /// The first non-null value column, in schema order.
    pub fn value(&self) -> Option<LabelValue<'_>> {
        self.boolean_value
            .map(LabelValue::Boolean)
            .or_else(|| self.integer_value.map(LabelValue::Integer))
            .or_else(|| self.float_value.map(LabelValue::Float))
            .or_else(|| self.categorical_value.as_deref().map(LabelValue::Categorical))
    }
}

/// Metadata for one code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeMetadata {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Generalizations of `code`, preferably OMOP concepts as `VOCAB/CONCEPT`.
    #[serde(default)]
    pub parent_codes: Vec<String>,
}

impl CodeMetadata {
    pub fn parents(&self) -> impl Iterator<Item = ParentCode<'_>> {
        self.parent_codes.iter().map(|code| ParentCode::parse(code))
    }
}

/// A parent code split into its optional vocabulary and concept.
///
/// `"ICD9CM/487.0"` parses to vocabulary `ICD9CM`, concept `487.0`; a code with
/// no `/` has no vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentCode<'a> {
    pub vocabulary: Option<&'a str>,
    pub concept: &'a str,
}

impl<'a> ParentCode<'a> {
    pub fn parse(code: &'a str) -> Self {
        match code.split_once('/') {
            Some((vocabulary, concept)) if !vocabulary.is_empty() => Self {
                vocabulary: Some(vocabulary),
                concept,
            },
            _ => Self {
                vocabulary: None,
                concept: code,
            },
        }
    }
}

/// Dataset-level metadata document. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etl_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etl_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meds_version: Option<String>,
    /// ISO 8601 creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl DatasetMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dataset(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.dataset_name = Some(name.into());
        self.dataset_version = Some(version.into());
        self
    }

    pub fn with_etl(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.etl_name = Some(name.into());
        self.etl_version = Some(version.into());
        self
    }

    /// Stamp the current MEDS version.
    pub fn with_meds_version(mut self) -> Self {
        self.meds_version = Some(crate::constants::MEDS_VERSION.to_string());
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at.to_rfc3339());
        self
    }

    /// Parse a metadata document from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| SchemaError::Metadata {
            field: "document".to_string(),
            message: e.to_string(),
        })
    }

    /// Check field formats. Only `created_at` carries a format constraint.
    pub fn validate(&self) -> Result<()> {
        if let Some(created_at) = &self.created_at {
            if !is_iso8601(created_at) {
                return Err(SchemaError::Metadata {
                    field: "created_at".to_string(),
                    message: format!("'{created_at}' is not an ISO 8601 timestamp"),
                });
            }
        }
        Ok(())
    }
}

fn is_iso8601(value: &str) -> bool {
    let value = value.trim();
    DateTime::parse_from_rfc3339(value).is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        || NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

/// JSON Schema describing [`DatasetMetadata`].
pub fn dataset_metadata_json_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "dataset_name": {"type": "string"},
            "dataset_version": {"type": "string"},
            "etl_name": {"type": "string"},
            "etl_version": {"type": "string"},
            "meds_version": {"type": "string"},
            "created_at": {"type": "string"},
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_label_value_prefers_schema_order() {
        let label = Label {
            subject_id: 1,
            prediction_time: NaiveDate::from_ymd_opt(2020, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            boolean_value: None,
            integer_value: Some(3),
            float_value: Some(0.5),
            categorical_value: None,
        };
        assert_eq!(label.value(), Some(LabelValue::Integer(3)));
    }

    #[test]
    fn test_label_skips_null_values_when_serialized() {
        let label = Label {
            subject_id: 7,
            prediction_time: NaiveDate::from_ymd_opt(2021, 6, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            boolean_value: Some(true),
            integer_value: None,
            float_value: None,
            categorical_value: None,
        };
        let json = serde_json::to_value(&label).unwrap();
        assert_eq!(json["boolean_value"], json!(true));
        assert!(json.get("integer_value").is_none());
    }

    #[test]
    fn test_parent_code_parse() {
        assert_eq!(
            ParentCode::parse("ICD9CM/487.0"),
            ParentCode {
                vocabulary: Some("ICD9CM"),
                concept: "487.0"
            }
        );
        assert_eq!(ParentCode::parse("LOCAL").vocabulary, None);
        assert_eq!(ParentCode::parse("/x").concept, "/x");
    }

    #[test]
    fn test_code_metadata_parents() {
        let meta = CodeMetadata {
            code: "ICD10CM/J10".to_string(),
            description: Some("Influenza".to_string()),
            parent_codes: vec!["ICD9CM/487.0".to_string(), "FLU".to_string()],
        };
        let parents: Vec<_> = meta.parents().collect();
        assert_eq!(parents[0].vocabulary, Some("ICD9CM"));
        assert_eq!(parents[1].concept, "FLU");
    }

    #[test]
    fn test_dataset_metadata_roundtrip() {
        let created = Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap();
        let meta = DatasetMetadata::new()
            .with_dataset("MIMIC-IV", "2.2")
            .with_etl("meds_etl", "0.3")
            .with_meds_version()
            .with_created_at(created);
        assert!(meta.validate().is_ok());

        let text = serde_json::to_string(&meta).unwrap();
        let parsed = DatasetMetadata::from_json_str(&text).unwrap();
        assert_eq!(parsed, meta);
    }

    #[test]
    fn test_dataset_metadata_accepts_partial_documents() {
        let meta = DatasetMetadata::from_json_str(r#"{"dataset_name": "demo"}"#).unwrap();
        assert_eq!(meta.dataset_name.as_deref(), Some("demo"));
        assert!(meta.created_at.is_none());
    }

    #[test]
    fn test_dataset_metadata_rejects_bad_created_at() {
        let meta = DatasetMetadata {
            created_at: Some("last tuesday".to_string()),
            ..DatasetMetadata::default()
        };
        assert!(matches!(
            meta.validate(),
            Err(SchemaError::Metadata { ref field, .. }) if field == "created_at"
        ));
    }

    #[test]
    fn test_iso8601_forms() {
        assert!(is_iso8601("2024-05-01"));
        assert!(is_iso8601("2024-05-01T08:30:00"));
        assert!(is_iso8601("2024-05-01T08:30:00.123456"));
        assert!(is_iso8601("2024-05-01T08:30:00+00:00"));
        assert!(!is_iso8601("05/01/2024"));
    }

    #[test]
    fn test_json_schema_lists_all_fields() {
        let schema = dataset_metadata_json_schema();
        let properties = schema["properties"].as_object().unwrap();
        assert_eq!(properties.len(), 6);
        assert!(properties.contains_key("created_at"));
    }
}
