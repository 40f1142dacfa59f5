use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{debug, info, info_span};

use meds_convert::{ConversionPlan, ConversionReport, ConvertError, ConvertOptions, SchemaReconciler};
use meds_model::{
    DatasetMetadata, SchemaKind, TargetSchema, dataset_metadata_json_schema, label_table_schema,
};

use crate::cli::{ConvertArgs, MetadataArgs, SchemaArgs};
use crate::io::{read_table, write_table};
use crate::summary::{print_metadata, print_schema};

/// Outcome of one `convert` run.
#[derive(Debug)]
pub struct ConvertResult {
    pub input: PathBuf,
    pub kind: SchemaKind,
    pub fixed: bool,
    pub rows: usize,
    pub output: Option<PathBuf>,
    /// Set when the input conforms.
    pub plan: Option<ConversionPlan>,
    /// Set when the input does not conform.
    pub report: Option<ConversionReport>,
}

impl ConvertResult {
    pub fn has_errors(&self) -> bool {
        self.report.is_some()
    }
}

pub fn run_schema(args: &SchemaArgs) -> Result<()> {
    if args.json {
        let json = serde_json::to_string_pretty(args.kind.spec()).context("serialize schema")?;
        println!("{json}");
    } else {
        print_schema(args.kind);
    }
    Ok(())
}

pub fn run_convert(args: &ConvertArgs) -> Result<ConvertResult> {
    let span = info_span!("convert", input = %args.input.display(), kind = %args.kind);
    let _guard = span.enter();

    let options = build_options(args)?;
    debug!(?options, "conversion options");
    let target = target_schema(args.kind, args.fixed)?;
    let df = read_table(&args.input)?;

    let mut result = ConvertResult {
        input: args.input.clone(),
        kind: args.kind,
        fixed: args.fixed,
        rows: df.height(),
        output: None,
        plan: None,
        report: None,
    };

    let reconciler = SchemaReconciler::new(target, options);
    let plan = match reconciler.plan(&df) {
        Ok(plan) => plan,
        Err(ConvertError::Report(report)) => {
            info!(issues = report.len(), "input does not conform");
            result.report = Some(report);
            return Ok(result);
        }
        Err(error) => return Err(error).context("plan conversion"),
    };
    info!(
        columns = plan.columns.len(),
        casts = plan.casts(),
        synthesized = plan.synthesized(),
        "input conforms"
    );

    if !args.dry_run {
        let mut converted = reconciler
            .execute(&df, &plan)
            .context("convert table")?;
        if let Some(path) = &args.output {
            write_table(&mut converted, path)?;
            result.output = Some(path.clone());
        }
    }
    result.plan = Some(plan);
    Ok(result)
}

pub fn run_metadata(args: &MetadataArgs) -> Result<()> {
    if args.json_schema {
        let json = serde_json::to_string_pretty(&dataset_metadata_json_schema())
            .context("serialize json schema")?;
        println!("{json}");
        return Ok(());
    }
    let Some(path) = &args.file else {
        bail!("a metadata file is required");
    };
    let metadata = load_metadata(path)?;
    print_metadata(path, &metadata);
    Ok(())
}

/// Read and validate a dataset metadata document.
pub fn load_metadata(path: &Path) -> Result<DatasetMetadata> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let metadata = DatasetMetadata::from_json_str(&text)
        .with_context(|| format!("parse {}", path.display()))?;
    metadata
        .validate()
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(metadata)
}

/// Options file (or defaults), then `--strict`, then the individual flags.
pub fn build_options(args: &ConvertArgs) -> Result<ConvertOptions> {
    let mut options = match &args.options {
        Some(path) => {
            let text =
                fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
            ConvertOptions::from_json_str(&text)
                .with_context(|| format!("parse {}", path.display()))?
        }
        None => ConvertOptions::default(),
    };
    if args.strict {
        options = ConvertOptions::strict();
    }
    if args.no_cast {
        options = options.with_cast_policy(false);
    }
    if args.no_add_missing {
        options = options.with_add_missing_mandatory(false);
    }
    if args.no_extra_columns {
        options = options.with_allow_extra_columns(false);
    }
    if args.no_reorder {
        options = options.with_reorder_columns(false);
    }
    Ok(options)
}

fn target_schema(kind: SchemaKind, fixed: bool) -> Result<TargetSchema<'static>> {
    match (kind, fixed) {
        (_, false) => Ok(TargetSchema::Customizable(kind.spec())),
        (SchemaKind::Label, true) => Ok(TargetSchema::Fixed(label_table_schema())),
        (other, true) => bail!("--fixed is only available for the label schema, not {other}"),
    }
}
