//! MEDS data model: column types, schema specifications, and record types.
//!
//! This crate is the static description layer of the MEDS interchange format:
//!
//! - [`ColumnType`] / [`FieldSpec`]: backend-independent column typing
//! - [`SchemaSpec`]: mandatory + optional fields for one schema kind, with
//!   [`SchemaSpec::resolve`] to materialize a [`ResolvedSchema`]
//! - [`TargetSchema`]: what a conversion targets (customizable or fixed)
//! - [`schemas`]: the event data, label, subject split, and code metadata schemas
//! - [`records`]: typed label, code metadata, and dataset metadata records
//!
//! # Example
//!
//! ```
//! use meds_model::{ColumnType, FieldSpec, data_schema};
//!
//! let schema = data_schema()
//!     .resolve([FieldSpec::new("unit", ColumnType::Utf8)])
//!     .unwrap();
//! assert_eq!(
//!     schema.names(),
//!     ["subject_id", "time", "code", "numeric_value", "unit"]
//! );
//! ```

pub mod column_type;
pub mod constants;
pub mod error;
pub mod field;
pub mod records;
pub mod schema;
pub mod schemas;

pub use column_type::ColumnType;
pub use constants::{
    BIRTH_CODE, CODE_FIELD, DEATH_CODE, HELD_OUT_SPLIT, MEDS_VERSION, NUMERIC_VALUE_FIELD,
    SUBJECT_ID_FIELD, Split, TIME_FIELD, TRAIN_SPLIT, TUNING_SPLIT,
};
pub use error::{Result, SchemaError};
pub use field::FieldSpec;
pub use records::{
    CodeMetadata, DatasetMetadata, Label, LabelValue, ParentCode, dataset_metadata_json_schema,
};
pub use schema::{FieldUniverse, ResolvedSchema, SchemaSpec, TargetSchema};
pub use schemas::{
    SchemaKind, code_metadata_schema, data_schema, label_schema, label_table_schema,
    subject_split_schema,
};
