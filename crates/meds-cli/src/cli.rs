//! CLI argument definitions for the MEDS tools.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use meds_model::SchemaKind;

#[derive(Parser)]
#[command(
    name = "meds",
    version,
    about = "MEDS schema tools - Inspect schemas and convert tables into them",
    long_about = "Inspect the MEDS interchange schemas and convert tabular data into them.\n\n\
                  Reads CSV or Parquet input, validates it against a schema, and writes\n\
                  a conforming table with columns cast, synthesized and reordered."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the mandatory and optional fields of a schema.
    Schema(SchemaArgs),

    /// Validate a table against a schema and convert it.
    Convert(ConvertArgs),

    /// Validate a dataset metadata JSON document.
    Metadata(MetadataArgs),
}

#[derive(Parser)]
pub struct SchemaArgs {
    /// Schema to show (data, label, subject_split, code_metadata).
    #[arg(value_name = "KIND")]
    pub kind: SchemaKind,

    /// Print the schema as JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser)]
pub struct ConvertArgs {
    /// CSV or Parquet file to convert.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Target schema.
    #[arg(long = "kind", value_name = "KIND", default_value = "data")]
    pub kind: SchemaKind,

    /// Target the fixed six-column label table instead of the customizable label schema.
    /// Extra columns are always rejected.
    #[arg(long = "fixed")]
    pub fixed: bool,

    /// Where to write the converted table (.parquet or .csv).
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// JSON file with conversion options. Flags below override it.
    #[arg(long = "options", value_name = "FILE")]
    pub options: Option<PathBuf>,

    /// Accept only tables that already conform exactly.
    #[arg(long = "strict")]
    pub strict: bool,

    /// Never cast mistyped columns.
    #[arg(long = "no-cast")]
    pub no_cast: bool,

    /// Fail on missing mandatory columns instead of adding null columns.
    #[arg(long = "no-add-missing")]
    pub no_add_missing: bool,

    /// Fail on columns outside the schema instead of passing them through.
    #[arg(long = "no-extra-columns")]
    pub no_extra_columns: bool,

    /// Require canonical column order instead of reordering.
    #[arg(long = "no-reorder")]
    pub no_reorder: bool,

    /// Validate and plan without converting or writing output.
    #[arg(long = "dry-run", conflicts_with = "output")]
    pub dry_run: bool,

    /// Format of the printed result.
    #[arg(long = "report-format", value_enum, default_value = "text")]
    pub report_format: ReportFormatArg,
}

#[derive(Parser)]
pub struct MetadataArgs {
    /// Dataset metadata JSON file.
    #[arg(value_name = "FILE", required_unless_present = "json_schema")]
    pub file: Option<PathBuf>,

    /// Print the JSON Schema for dataset metadata instead of validating.
    #[arg(long = "json-schema")]
    pub json_schema: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormatArg {
    Text,
    Json,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
