//! Schema reconciliation engine.
//!
//! Conversion runs in two phases. [`SchemaReconciler::plan`] inspects only the
//! source field list: it checks the options, collects every conformance issue,
//! resolves the output schema and decides per output column whether to keep,
//! cast or synthesize it. [`SchemaReconciler::convert`] then executes the plan
//! against the source backend.

use serde::Serialize;
use tracing::debug;

use meds_model::{ColumnType, FieldSpec, ResolvedSchema, TargetSchema};

use crate::error::{ConvertError, Result};
use crate::issue::ConversionIssue;
use crate::options::ConvertOptions;
use crate::report::ConversionReport;
use crate::source::SourceTable;

/// How one output column is produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ColumnAction {
    /// Taken from the source unchanged.
    Keep,
    /// Taken from the source and cast from `from`.
    Cast { from: ColumnType },
    /// Absent from the source; filled with nulls.
    Synthesize,
}

/// One output column and how it is produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedColumn {
    pub field: FieldSpec,
    #[serde(flatten)]
    pub action: ColumnAction,
}

/// Validated conversion of one source against one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionPlan {
    pub schema: ResolvedSchema,
    pub columns: Vec<PlannedColumn>,
}

impl ConversionPlan {
    pub fn casts(&self) -> usize {
        self.count(|action| matches!(action, ColumnAction::Cast { .. }))
    }

    pub fn synthesized(&self) -> usize {
        self.count(|action| matches!(action, ColumnAction::Synthesize))
    }

    fn count(&self, predicate: impl Fn(&ColumnAction) -> bool) -> usize {
        self.columns
            .iter()
            .filter(|column| predicate(&column.action))
            .count()
    }
}

/// Validates tables against a target schema and converts them into it.
#[derive(Debug, Clone)]
pub struct SchemaReconciler<'a> {
    target: TargetSchema<'a>,
    options: ConvertOptions,
}

impl<'a> SchemaReconciler<'a> {
    pub fn new(target: impl Into<TargetSchema<'a>>, options: ConvertOptions) -> Self {
        Self {
            target: target.into(),
            options,
        }
    }

    pub fn target(&self) -> TargetSchema<'a> {
        self.target
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Check `source` against the target and decide how to build each output column.
    ///
    /// Every conformance issue is collected before failing, so a single
    /// [`ConvertError::Report`] lists all of them.
    pub fn plan<S: SourceTable + ?Sized>(&self, source: &S) -> Result<ConversionPlan> {
        let universe = self.target.universe();
        let options = &self.options;
        options.cast_policy.validate(universe.names())?;

        let source_fields = source.fields()?;
        debug!(
            target = self.target.label(),
            columns = source_fields.len(),
            "planning conversion"
        );

        let find = |name: &str| source_fields.iter().find(|field| field.name == name);
        let mut report = ConversionReport::new();
        let mut synthesized: Vec<&str> = Vec::new();

        for field in universe.mandatory {
            match find(&field.name) {
                Some(found) => {
                    if !found.dtype.is_compatible_with(&field.dtype)
                        && !options.cast_policy.allows(&field.name)
                    {
                        report.push(ConversionIssue::TypeMismatch {
                            column: field.name.clone(),
                            expected: field.dtype.clone(),
                            actual: found.dtype.clone(),
                            optional: false,
                        });
                    }
                }
                None if options.add_missing_mandatory => synthesized.push(&field.name),
                None => report.push(ConversionIssue::MissingColumn {
                    column: field.name.clone(),
                    expected: field.dtype.clone(),
                }),
            }
        }

        let mut extras: Vec<FieldSpec> = Vec::new();
        let mut unexpected: Vec<String> = Vec::new();
        for found in &source_fields {
            if universe.is_mandatory(&found.name) {
                continue;
            }
            match universe.optional_type(&found.name) {
                Some(expected) => {
                    if !found.dtype.is_compatible_with(expected)
                        && !options.cast_policy.allows(&found.name)
                    {
                        report.push(ConversionIssue::TypeMismatch {
                            column: found.name.clone(),
                            expected: expected.clone(),
                            actual: found.dtype.clone(),
                            optional: true,
                        });
                    }
                    extras.push(FieldSpec::new(found.name.clone(), expected.clone()));
                }
                None => {
                    unexpected.push(found.name.clone());
                    extras.push(found.clone());
                }
            }
        }
        let allow_extra_columns = options.allow_extra_columns && self.target.accepts_extras();
        if !unexpected.is_empty() && !allow_extra_columns {
            report.push(ConversionIssue::UnexpectedColumns {
                columns: unexpected,
            });
        }

        if !report.is_empty() {
            debug!(issues = report.len(), "source does not conform");
            return Err(ConvertError::Report(report));
        }

        let schema = self.target.resolve(extras)?;

        let actual: Vec<&str> = source_fields
            .iter()
            .map(|field| field.name.as_str())
            .chain(synthesized.iter().copied())
            .collect();
        let expected = schema.names();
        if actual != expected && !options.reorder_columns {
            let mut report = ConversionReport::new();
            report.push(ConversionIssue::ColumnOrder {
                expected: expected.iter().map(|name| name.to_string()).collect(),
                actual: actual.iter().map(|name| name.to_string()).collect(),
            });
            return Err(ConvertError::Report(report));
        }

        let columns = schema
            .iter()
            .map(|field| {
                let action = match find(&field.name) {
                    Some(found) if found.dtype == field.dtype => ColumnAction::Keep,
                    Some(found) => ColumnAction::Cast {
                        from: found.dtype.clone(),
                    },
                    None => ColumnAction::Synthesize,
                };
                PlannedColumn {
                    field: field.clone(),
                    action,
                }
            })
            .collect();

        Ok(ConversionPlan { schema, columns })
    }

    /// Convert `source` into the target schema.
    ///
    /// On success the output columns are exactly the resolved schema, in order.
    pub fn convert<S: SourceTable + ?Sized>(&self, source: &S) -> Result<S::Output> {
        let plan = self.plan(source)?;
        self.execute(source, &plan)
    }

    /// Build the output table described by `plan`.
    pub fn execute<S: SourceTable + ?Sized>(
        &self,
        source: &S,
        plan: &ConversionPlan,
    ) -> Result<S::Output> {
        let height = source.height();
        let mut columns = Vec::with_capacity(plan.columns.len());
        for planned in &plan.columns {
            let field = &planned.field;
            let column = match &planned.action {
                ColumnAction::Keep => source.column(&field.name)?,
                ColumnAction::Cast { from } => {
                    debug!(column = %field.name, from = %from, to = %field.dtype, "casting column");
                    source.cast(source.column(&field.name)?, &field.dtype)?
                }
                ColumnAction::Synthesize => {
                    debug!(column = %field.name, dtype = %field.dtype, "adding null column");
                    source.null_column(&field.name, &field.dtype, height)?
                }
            };
            columns.push(column);
        }
        debug!(
            columns = plan.columns.len(),
            casts = plan.casts(),
            synthesized = plan.synthesized(),
            rows = height,
            "conversion complete"
        );
        source.assemble(columns)
    }
}

/// Convert `source` into `target` with the given options.
pub fn convert<'a, S: SourceTable + ?Sized>(
    source: &S,
    target: impl Into<TargetSchema<'a>>,
    options: &ConvertOptions,
) -> Result<S::Output> {
    SchemaReconciler::new(target, options.clone()).convert(source)
}
