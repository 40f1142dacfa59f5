use std::path::Path;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use serde_json::{Value, json};

use meds_convert::{ColumnAction, ConversionIssue, ConversionPlan, ConversionReport};
use meds_model::{DatasetMetadata, SchemaKind};

use crate::commands::ConvertResult;

pub fn print_schema(kind: SchemaKind) {
    let spec = kind.spec();
    println!("Schema: {kind} ({})", kind.description());
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Type"),
        header_cell("Requirement"),
    ]);
    apply_table_style(&mut table);
    for field in spec.mandatory() {
        table.add_row(vec![
            Cell::new(&field.name).add_attribute(Attribute::Bold),
            Cell::new(&field.dtype),
            Cell::new("mandatory").fg(Color::Green),
        ]);
    }
    for field in spec.optional_fields() {
        table.add_row(vec![
            Cell::new(&field.name),
            Cell::new(&field.dtype),
            dim_cell("optional"),
        ]);
    }
    println!("{table}");
}

pub fn print_convert_result(result: &ConvertResult) {
    println!("Input: {}", result.input.display());
    println!("Schema: {}{}", result.kind, if result.fixed { " (fixed)" } else { "" });
    println!("Rows: {}", result.rows);
    if let Some(path) = &result.output {
        println!("Output: {}", path.display());
    }
    if let Some(plan) = &result.plan {
        print_plan_table(plan);
    }
    if let Some(report) = &result.report {
        print_issue_table(report);
    }
}

/// JSON document describing a convert run.
pub fn convert_result_json(result: &ConvertResult) -> Value {
    json!({
        "input": result.input.display().to_string(),
        "schema": result.kind.as_str(),
        "fixed": result.fixed,
        "rows": result.rows,
        "output": result.output.as_ref().map(|path| path.display().to_string()),
        "status": if result.has_errors() { "failed" } else { "ok" },
        "columns": result.plan.as_ref().map(|plan| &plan.columns),
        "issues": result.report.as_ref().map(|report| &report.issues),
    })
}

fn print_plan_table(plan: &ConversionPlan) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Column"),
        header_cell("Type"),
        header_cell("Action"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Center);
    for (index, column) in plan.columns.iter().enumerate() {
        table.add_row(vec![
            dim_cell(index + 1),
            Cell::new(&column.field.name),
            Cell::new(&column.field.dtype),
            action_cell(&column.action),
        ]);
    }
    println!("{table}");
    println!(
        "{} columns, {} cast, {} added",
        plan.columns.len(),
        plan.casts(),
        plan.synthesized()
    );
}

fn print_issue_table(report: &ConversionReport) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Issue"),
        header_cell("Columns"),
        header_cell("Message"),
    ]);
    apply_summary_table_style(&mut table);
    for issue in report {
        table.add_row(vec![
            Cell::new(issue.kind().label()).fg(Color::Red),
            Cell::new(issue_columns(issue)),
            Cell::new(issue.message()),
        ]);
    }
    println!();
    println!("Issues:");
    println!("{table}");
}

pub fn print_metadata(path: &Path, metadata: &DatasetMetadata) {
    println!("Metadata: {}", path.display());
    let mut table = Table::new();
    table.set_header(vec![header_cell("Field"), header_cell("Value")]);
    apply_table_style(&mut table);
    let rows = [
        ("dataset_name", &metadata.dataset_name),
        ("dataset_version", &metadata.dataset_version),
        ("etl_name", &metadata.etl_name),
        ("etl_version", &metadata.etl_version),
        ("meds_version", &metadata.meds_version),
        ("created_at", &metadata.created_at),
    ];
    for (field, value) in rows {
        let value_cell = match value {
            Some(value) => Cell::new(value),
            None => dim_cell("-"),
        };
        table.add_row(vec![Cell::new(field), value_cell]);
    }
    println!("{table}");
}

fn issue_columns(issue: &ConversionIssue) -> String {
    match issue {
        ConversionIssue::ColumnOrder { .. } => "-".to_string(),
        other => other.columns().join(", "),
    }
}

fn action_cell(action: &ColumnAction) -> Cell {
    match action {
        ColumnAction::Keep => dim_cell("keep"),
        ColumnAction::Cast { from } => Cell::new(format!("cast from {from}")).fg(Color::Yellow),
        ColumnAction::Synthesize => Cell::new("added (null)").fg(Color::Cyan),
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use super::*;
    use meds_model::ColumnType;
    use std::path::PathBuf;

    #[test]
    fn test_failed_result_json() {
        let mut report = ConversionReport::new();
        report.push(ConversionIssue::MissingColumn {
            column: "code".to_string(),
            expected: ColumnType::Utf8,
        });
        let result = ConvertResult {
            input: PathBuf::from("events.csv"),
            kind: SchemaKind::Data,
            fixed: false,
            rows: 2,
            output: None,
            plan: None,
            report: Some(report),
        };
        insta::assert_json_snapshot!(convert_result_json(&result), @r#"
        {
          "columns": null,
          "fixed": false,
          "input": "events.csv",
          "issues": [
            {
              "column": "code",
              "expected": "string",
              "kind": "missing_column"
            }
          ],
          "output": null,
          "rows": 2,
          "schema": "data",
          "status": "failed"
        }
        "#);
    }
}
