//! Schema specifications and their resolution into concrete column lists.
//!
//! A [`SchemaSpec`] describes one schema kind as an ordered list of mandatory
//! fields plus an unordered set of optional fields. Resolving it against the
//! extra fields present in a particular input yields a [`ResolvedSchema`]: the
//! exact ordered column list a conforming table must have.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::column_type::ColumnType;
use crate::error::{Result, SchemaError};
use crate::field::FieldSpec;

/// Immutable description of a target schema.
///
/// Invariants (checked by [`SchemaSpec::new`]):
/// - at least one mandatory field;
/// - mandatory names are unique;
/// - mandatory and optional names are disjoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaSpec {
    mandatory: Vec<FieldSpec>,
    optional: BTreeMap<String, ColumnType>,
}

impl SchemaSpec {
    /// Build a specification, validating its invariants.
    pub fn new<M, O>(mandatory: M, optional: O) -> Result<Self>
    where
        M: IntoIterator,
        M::Item: Into<FieldSpec>,
        O: IntoIterator,
        O::Item: Into<FieldSpec>,
    {
        let mandatory: Vec<FieldSpec> = mandatory.into_iter().map(Into::into).collect();
        if mandatory.is_empty() {
            return Err(SchemaError::InvalidSpec {
                message: "a schema needs at least one mandatory field".to_string(),
            });
        }

        let mut seen = BTreeSet::new();
        for field in &mandatory {
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    field: field.name.clone(),
                });
            }
        }

        let mut optional_fields = BTreeMap::new();
        for field in optional.into_iter().map(Into::into) {
            if seen.contains(field.name.as_str()) {
                return Err(SchemaError::InvalidSpec {
                    message: format!("'{}' is both mandatory and optional", field.name),
                });
            }
            if optional_fields.contains_key(&field.name) {
                return Err(SchemaError::DuplicateField { field: field.name });
            }
            optional_fields.insert(field.name, field.dtype);
        }

        Ok(Self {
            mandatory,
            optional: optional_fields,
        })
    }

    /// Build a specification from trusted static definitions.
    pub(crate) fn builtin(mandatory: &[(&str, ColumnType)], optional: &[(&str, ColumnType)]) -> Self {
        let spec = Self {
            mandatory: mandatory.iter().cloned().map(FieldSpec::from).collect(),
            optional: optional
                .iter()
                .map(|(name, dtype)| ((*name).to_string(), dtype.clone()))
                .collect(),
        };
        debug_assert!(
            Self::new(spec.mandatory.clone(), spec.optional_fields()).is_ok(),
            "builtin schema violates its invariants"
        );
        spec
    }

    /// Mandatory fields in declared order.
    pub fn mandatory(&self) -> &[FieldSpec] {
        &self.mandatory
    }

    /// Optional fields keyed by name.
    pub fn optional(&self) -> &BTreeMap<String, ColumnType> {
        &self.optional
    }

    /// Optional fields as a field list, ordered by name.
    pub fn optional_fields(&self) -> Vec<FieldSpec> {
        self.optional.iter().map(FieldSpec::from).collect()
    }

    pub fn mandatory_type(&self, name: &str) -> Option<&ColumnType> {
        self.mandatory
            .iter()
            .find(|field| field.name == name)
            .map(|field| &field.dtype)
    }

    pub fn optional_type(&self, name: &str) -> Option<&ColumnType> {
        self.optional.get(name)
    }

    pub fn is_mandatory(&self, name: &str) -> bool {
        self.mandatory.iter().any(|field| field.name == name)
    }

    pub fn is_optional(&self, name: &str) -> bool {
        self.optional.contains_key(name)
    }

    /// Resolve this specification against a caller's extra fields.
    ///
    /// The result is the mandatory fields in declared order followed by the
    /// extras in input order. An extra field may not share a name with a
    /// mandatory field, must carry the declared type if it names an optional
    /// field, and may not appear twice.
    pub fn resolve<I>(&self, extra_fields: I) -> Result<ResolvedSchema>
    where
        I: IntoIterator,
        I::Item: Into<FieldSpec>,
    {
        let mut fields = self.mandatory.clone();
        let mut seen = BTreeSet::new();

        for extra in extra_fields.into_iter().map(Into::into) {
            if self.is_mandatory(&extra.name) {
                return Err(SchemaError::conflict(
                    extra.name,
                    "a custom field cannot shadow a mandatory field",
                ));
            }
            if let Some(expected) = self.optional.get(&extra.name) {
                if *expected != extra.dtype {
                    return Err(SchemaError::conflict(
                        extra.name,
                        format!("optional field must be of type {expected}, got {}", extra.dtype),
                    ));
                }
            }
            if !seen.insert(extra.name.clone()) {
                return Err(SchemaError::DuplicateField { field: extra.name });
            }
            fields.push(extra);
        }

        Ok(ResolvedSchema { fields })
    }

    /// Resolve with no extra fields: the mandatory fields alone.
    pub fn resolve_empty(&self) -> ResolvedSchema {
        ResolvedSchema {
            fields: self.mandatory.clone(),
        }
    }
}

/// Concrete, ordered column list for one input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResolvedSchema {
    fields: Vec<FieldSpec>,
}

impl ResolvedSchema {
    /// Build a resolved schema from an explicit field list.
    pub fn new<I>(fields: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<FieldSpec>,
    {
        let fields: Vec<FieldSpec> = fields.into_iter().map(Into::into).collect();
        let mut seen = BTreeSet::new();
        for field in &fields {
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    field: field.name.clone(),
                });
            }
        }
        Ok(Self { fields })
    }

    /// Build a resolved schema from trusted static definitions.
    pub(crate) fn builtin(fields: &[(&str, ColumnType)]) -> Self {
        let schema = Self {
            fields: fields.iter().cloned().map(FieldSpec::from).collect(),
        };
        debug_assert!(
            Self::new(schema.fields.clone()).is_ok(),
            "builtin schema has duplicate fields"
        );
        schema
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn names(&self) -> Vec<&str> {
        self.fields.iter().map(|field| field.name.as_str()).collect()
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldSpec> {
        self.fields.iter()
    }

    /// Append extra fields, none of which may already be present.
    pub fn with_extras<I>(&self, extra_fields: I) -> Result<ResolvedSchema>
    where
        I: IntoIterator,
        I::Item: Into<FieldSpec>,
    {
        let mut fields = self.fields.clone();
        let mut seen = BTreeSet::new();
        for extra in extra_fields.into_iter().map(Into::into) {
            if self.contains(&extra.name) {
                return Err(SchemaError::conflict(
                    extra.name,
                    "a custom field cannot shadow a field of a fixed schema",
                ));
            }
            if !seen.insert(extra.name.clone()) {
                return Err(SchemaError::DuplicateField { field: extra.name });
            }
            fields.push(extra);
        }
        Ok(ResolvedSchema { fields })
    }
}

impl<'a> IntoIterator for &'a ResolvedSchema {
    type Item = &'a FieldSpec;
    type IntoIter = std::slice::Iter<'a, FieldSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

/// The schema a conversion targets.
///
/// A customizable schema accepts optional and extra fields. A fixed schema is
/// an exact column list: every field is mandatory and no other column is
/// accepted, whatever the conversion options say.
#[derive(Debug, Clone, Copy)]
pub enum TargetSchema<'a> {
    Customizable(&'a SchemaSpec),
    Fixed(&'a ResolvedSchema),
}

/// Mandatory and optional fields of a [`TargetSchema`].
#[derive(Debug, Clone, Copy)]
pub struct FieldUniverse<'a> {
    pub mandatory: &'a [FieldSpec],
    pub optional: Option<&'a BTreeMap<String, ColumnType>>,
}

impl<'a> FieldUniverse<'a> {
    pub fn is_mandatory(&self, name: &str) -> bool {
        self.mandatory.iter().any(|field| field.name == name)
    }

    pub fn optional_type(&self, name: &str) -> Option<&'a ColumnType> {
        self.optional.and_then(|optional| optional.get(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.is_mandatory(name) || self.optional_type(name).is_some()
    }

    /// Every known field name: mandatory in declared order, then optional by name.
    pub fn names(&self) -> Vec<&'a str> {
        let mut names: Vec<&'a str> = self.mandatory.iter().map(|f| f.name.as_str()).collect();
        if let Some(optional) = self.optional {
            names.extend(optional.keys().map(String::as_str));
        }
        names
    }
}

impl<'a> TargetSchema<'a> {
    /// Short human-readable label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            TargetSchema::Customizable(_) => "customizable",
            TargetSchema::Fixed(_) => "fixed",
        }
    }

    /// Whether columns outside the field universe may be passed through.
    pub fn accepts_extras(&self) -> bool {
        matches!(self, TargetSchema::Customizable(_))
    }

    /// The mandatory/optional field universe of this target.
    pub fn universe(&self) -> FieldUniverse<'a> {
        match *self {
            TargetSchema::Customizable(spec) => FieldUniverse {
                mandatory: spec.mandatory(),
                optional: Some(spec.optional()),
            },
            TargetSchema::Fixed(schema) => FieldUniverse {
                mandatory: schema.fields(),
                optional: None,
            },
        }
    }

    /// Resolve the target against the non-mandatory fields of an input.
    pub fn resolve<I>(&self, extra_fields: I) -> Result<ResolvedSchema>
    where
        I: IntoIterator,
        I::Item: Into<FieldSpec>,
    {
        match *self {
            TargetSchema::Customizable(spec) => spec.resolve(extra_fields),
            TargetSchema::Fixed(schema) => schema.with_extras(extra_fields),
        }
    }
}

impl<'a> From<&'a SchemaSpec> for TargetSchema<'a> {
    fn from(spec: &'a SchemaSpec) -> Self {
        TargetSchema::Customizable(spec)
    }
}

impl<'a> From<&'a ResolvedSchema> for TargetSchema<'a> {
    fn from(schema: &'a ResolvedSchema) -> Self {
        TargetSchema::Fixed(schema)
    }
}
