//! Field names, reserved codes, and split names shared across MEDS schemas.
//!
//! These literals are part of the public data contract and must not change
//! between releases.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::column_type::ColumnType;
use crate::error::SchemaError;

// Event data fields
pub const SUBJECT_ID_FIELD: &str = "subject_id";
pub const TIME_FIELD: &str = "time";
pub const CODE_FIELD: &str = "code";
pub const NUMERIC_VALUE_FIELD: &str = "numeric_value";
pub const CATEGORICAL_VALUE_FIELD: &str = "categorical_value";
pub const TEXT_VALUE_FIELD: &str = "text_value";

pub const SUBJECT_ID_TYPE: ColumnType = ColumnType::Int64;
/// Null for static facts that are not localized in time.
pub const TIME_TYPE: ColumnType = ColumnType::Timestamp;
pub const CODE_TYPE: ColumnType = ColumnType::Utf8;
pub const NUMERIC_VALUE_TYPE: ColumnType = ColumnType::Float32;

// Label fields
pub const PREDICTION_TIME_FIELD: &str = "prediction_time";
pub const BOOLEAN_VALUE_FIELD: &str = "boolean_value";
pub const INTEGER_VALUE_FIELD: &str = "integer_value";
pub const FLOAT_VALUE_FIELD: &str = "float_value";

// Subject split fields
pub const SPLIT_FIELD: &str = "split";

// Code metadata fields
pub const DESCRIPTION_FIELD: &str = "description";
pub const PARENT_CODES_FIELD: &str = "parent_codes";

/// Code of the birth event.
pub const BIRTH_CODE: &str = "MEDS_BIRTH";
/// Code of the death event.
pub const DEATH_CODE: &str = "MEDS_DEATH";

/// Subjects used for model training.
pub const TRAIN_SPLIT: &str = "train";
/// Subjects used for hyperparameter tuning (often called validation or dev).
pub const TUNING_SPLIT: &str = "tuning";
/// Subjects reserved for final evaluation (often called test).
pub const HELD_OUT_SPLIT: &str = "held_out";

/// Version of the MEDS format these schemas describe.
pub const MEDS_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Subject split assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Split {
    Train,
    Tuning,
    HeldOut,
}

impl Split {
    pub const ALL: [Split; 3] = [Split::Train, Split::Tuning, Split::HeldOut];

    pub fn as_str(&self) -> &'static str {
        match self {
            Split::Train => TRAIN_SPLIT,
            Split::Tuning => TUNING_SPLIT,
            Split::HeldOut => HELD_OUT_SPLIT,
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Split {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            TRAIN_SPLIT => Ok(Split::Train),
            TUNING_SPLIT => Ok(Split::Tuning),
            HELD_OUT_SPLIT => Ok(Split::HeldOut),
            other => Err(SchemaError::UnknownSplit {
                value: other.to_string(),
            }),
        }
    }
}
