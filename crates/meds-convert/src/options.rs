//! Configuration options for schema conversion.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{ConvertError, Result};

/// Whether a present-but-mistyped column may be cast to its target type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CastPolicy {
    /// Same answer for every column.
    All(bool),
    /// Per-column answer. Must name every mandatory and optional column and nothing else.
    PerColumn(BTreeMap<String, bool>),
}

impl Default for CastPolicy {
    fn default() -> Self {
        CastPolicy::All(true)
    }
}

impl CastPolicy {
    pub fn allows(&self, column: &str) -> bool {
        match self {
            CastPolicy::All(allowed) => *allowed,
            CastPolicy::PerColumn(columns) => columns.get(column).copied().unwrap_or(false),
        }
    }

    /// Check that a per-column policy names exactly the columns in `fields`.
    pub fn validate<'n, I>(&self, fields: I) -> Result<()>
    where
        I: IntoIterator<Item = &'n str>,
    {
        let CastPolicy::PerColumn(columns) = self else {
            return Ok(());
        };
        let fields: BTreeSet<&str> = fields.into_iter().collect();
        let missing: Vec<&str> = fields
            .iter()
            .copied()
            .filter(|name| !columns.contains_key(*name))
            .collect();
        let unknown: Vec<&str> = columns
            .keys()
            .map(String::as_str)
            .filter(|name| !fields.contains(name))
            .collect();

        let mut problems = Vec::new();
        if !missing.is_empty() {
            problems.push(format!(
                "a per-column cast policy needs an entry for every column in the schema. Missing columns: {}",
                missing.join(", ")
            ));
        }
        if !unknown.is_empty() {
            problems.push(format!(
                "cast policy names columns outside the schema: {}",
                unknown.join(", ")
            ));
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConvertError::config(problems.join("; ")))
        }
    }
}

impl From<bool> for CastPolicy {
    fn from(allowed: bool) -> Self {
        CastPolicy::All(allowed)
    }
}

impl From<BTreeMap<String, bool>> for CastPolicy {
    fn from(columns: BTreeMap<String, bool>) -> Self {
        CastPolicy::PerColumn(columns)
    }
}

/// Options controlling how a source table is reconciled with its schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Which mistyped columns may be cast.
    pub cast_policy: CastPolicy,

    /// Synthesize absent mandatory columns as all-null instead of failing.
    pub add_missing_mandatory: bool,

    /// Pass through source columns that are neither mandatory nor optional.
    pub allow_extra_columns: bool,

    /// Reorder columns into canonical order instead of requiring it.
    pub reorder_columns: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            cast_policy: CastPolicy::default(),
            add_missing_mandatory: true,
            allow_extra_columns: true,
            reorder_columns: true,
        }
    }
}

impl ConvertOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept only tables that already conform exactly.
    pub fn strict() -> Self {
        Self {
            cast_policy: CastPolicy::All(false),
            add_missing_mandatory: false,
            allow_extra_columns: false,
            reorder_columns: false,
        }
    }

    /// Parse options from JSON. Absent keys keep their defaults.
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| ConvertError::config(e.to_string()))
    }

    pub fn with_cast_policy(mut self, policy: impl Into<CastPolicy>) -> Self {
        self.cast_policy = policy.into();
        self
    }

    pub fn with_add_missing_mandatory(mut self, enable: bool) -> Self {
        self.add_missing_mandatory = enable;
        self
    }

    pub fn with_allow_extra_columns(mut self, enable: bool) -> Self {
        self.allow_extra_columns = enable;
        self
    }

    pub fn with_reorder_columns(mut self, enable: bool) -> Self {
        self.reorder_columns = enable;
        self
    }
}
