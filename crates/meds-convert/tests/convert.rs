//! Integration tests for converting polars tables into MEDS schemas.

use std::collections::BTreeMap;

use meds_convert::{
    CastPolicy, ColumnAction, ConversionIssue, ConvertError, ConvertOptions, IssueKind,
    SchemaReconciler, convert,
};
use meds_model::{ColumnType, ResolvedSchema, SchemaError, data_schema, label_table_schema};
use polars::prelude::*;
use proptest::prelude::*;

fn subject_ids() -> Column {
    Column::new("subject_id".into(), vec![1i64, 1, 2])
}

fn times() -> Column {
    Column::new("time".into(), vec![0i64, 1_000_000, 2_000_000])
        .cast(&DataType::Datetime(TimeUnit::Microseconds, None))
        .unwrap()
}

fn codes() -> Column {
    Column::new("code".into(), vec!["MEDS_BIRTH", "LAB//A", "MEDS_DEATH"])
}

fn numeric_values() -> Column {
    Column::new("numeric_value".into(), vec![None, Some(1.5f32), None])
}

fn canonical_frame() -> DataFrame {
    DataFrame::new(vec![subject_ids(), times(), codes(), numeric_values()]).unwrap()
}

fn names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect()
}

#[test]
fn test_missing_numeric_value_is_null_filled() {
    let df = DataFrame::new(vec![subject_ids(), times(), codes()]).unwrap();
    let out = convert(&df, data_schema(), &ConvertOptions::default()).unwrap();

    assert_eq!(names(&out), ["subject_id", "time", "code", "numeric_value"]);
    let numeric = out.column("numeric_value").unwrap();
    assert_eq!(numeric.dtype(), &DataType::Float32);
    assert_eq!(numeric.null_count(), 3);
}

#[test]
fn test_missing_numeric_value_without_synthesis_fails() {
    let df = DataFrame::new(vec![subject_ids(), times(), codes()]).unwrap();
    let options = ConvertOptions::default().with_add_missing_mandatory(false);
    let err = convert(&df, data_schema(), &options).unwrap_err();

    let report = err.report().unwrap();
    assert_eq!(
        report.issues,
        vec![ConversionIssue::MissingColumn {
            column: "numeric_value".to_string(),
            expected: ColumnType::Float32,
        }]
    );
}

#[test]
fn test_extra_column_rejected_or_passed_through() {
    let mut df = canonical_frame();
    df.with_column(Column::new("unexpected_col".into(), vec!["a", "b", "c"]))
        .unwrap();

    let strict = ConvertOptions::default().with_allow_extra_columns(false);
    let err = convert(&df, data_schema(), &strict).unwrap_err();
    let report = err.report().unwrap();
    assert_eq!(report.count(IssueKind::UnexpectedColumns), 1);
    assert!(report.mentions("unexpected_col"));

    let out = convert(&df, data_schema(), &ConvertOptions::default()).unwrap();
    assert_eq!(
        names(&out),
        ["subject_id", "time", "code", "numeric_value", "unexpected_col"]
    );
    assert_eq!(out.column("unexpected_col").unwrap().dtype(), &DataType::String);
}

#[test]
fn test_column_order_enforced_or_fixed() {
    let df = DataFrame::new(vec![codes(), subject_ids(), times(), numeric_values()]).unwrap();

    let no_reorder = ConvertOptions::default().with_reorder_columns(false);
    let err = convert(&df, data_schema(), &no_reorder).unwrap_err();
    let report = err.report().unwrap();
    assert_eq!(report.len(), 1);
    assert_eq!(report.issues[0].kind(), IssueKind::ColumnOrder);

    let out = convert(&df, data_schema(), &ConvertOptions::default()).unwrap();
    assert_eq!(names(&out), ["subject_id", "time", "code", "numeric_value"]);
    assert!(out.equals_missing(&canonical_frame()));
}

#[test]
fn test_order_report_message() {
    let df = DataFrame::new(vec![codes(), subject_ids(), times(), numeric_values()]).unwrap();
    let options = ConvertOptions::default().with_reorder_columns(false);
    let err = convert(&df, data_schema(), &options).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"Column order must be [subject_id, time, code, numeric_value]. Got [code, subject_id, time, numeric_value] instead.");
}

#[test]
fn test_all_issues_reported_together() {
    let df = DataFrame::new(vec![
        subject_ids(),
        times(),
        codes(),
        Column::new("text_value".into(), vec![1i64, 2, 3]),
        Column::new("site".into(), vec!["x", "y", "z"]),
    ])
    .unwrap();
    let options = ConvertOptions::default()
        .with_add_missing_mandatory(false)
        .with_cast_policy(false)
        .with_allow_extra_columns(false);

    let err = convert(&df, data_schema(), &options).unwrap_err();
    let report = err.report().unwrap();
    assert_eq!(report.len(), 3);

    let again = convert(&df, data_schema(), &options).unwrap_err();
    assert_eq!(again.report(), Some(report));
    insta::assert_snapshot!(report.to_string(), @r"
    Missing mandatory column 'numeric_value' of type float32.
    Optional column 'text_value' must be of type string if included. Got int64 instead.
    Found unexpected columns: [site]
    ");
}

#[test]
fn test_mistyped_columns_are_cast_when_permitted() {
    let df = DataFrame::new(vec![
        Column::new("subject_id".into(), vec![1i32, 1, 2]),
        times(),
        codes(),
        Column::new("numeric_value".into(), vec![None, Some(1.5f64), None]),
    ])
    .unwrap();

    let out = convert(&df, data_schema(), &ConvertOptions::default()).unwrap();
    assert_eq!(out.column("subject_id").unwrap().dtype(), &DataType::Int64);
    assert_eq!(out.column("numeric_value").unwrap().dtype(), &DataType::Float32);
    assert!(out.equals_missing(&canonical_frame()));
}

#[test]
fn test_per_column_cast_policy() {
    let df = DataFrame::new(vec![
        Column::new("subject_id".into(), vec![1i32, 1, 2]),
        times(),
        codes(),
        Column::new("numeric_value".into(), vec![None, Some(1.5f64), None]),
    ])
    .unwrap();
    let policy: BTreeMap<String, bool> = [
        ("subject_id", true),
        ("time", true),
        ("code", true),
        ("numeric_value", false),
        ("categorical_value", true),
        ("text_value", true),
    ]
    .into_iter()
    .map(|(name, allowed)| (name.to_string(), allowed))
    .collect();
    let options = ConvertOptions::default().with_cast_policy(CastPolicy::PerColumn(policy));

    let err = convert(&df, data_schema(), &options).unwrap_err();
    let report = err.report().unwrap();
    assert_eq!(report.len(), 1);
    assert!(report.mentions("numeric_value"));
}

#[test]
fn test_incomplete_cast_policy_is_config_error() {
    let policy = BTreeMap::from([("subject_id".to_string(), true)]);
    let options = ConvertOptions::default().with_cast_policy(policy);
    let err = convert(&canonical_frame(), data_schema(), &options).unwrap_err();
    assert!(matches!(err, ConvertError::Config { .. }));
    assert!(err.to_string().contains("categorical_value"));
}

#[test]
fn test_conversion_is_idempotent() {
    let once = convert(&canonical_frame(), data_schema(), &ConvertOptions::default()).unwrap();
    let twice = convert(&once, data_schema(), &ConvertOptions::strict()).unwrap();
    assert!(once.equals_missing(&twice));
    assert!(once.equals_missing(&canonical_frame()));
}

#[test]
fn test_fixed_schema_treats_every_field_as_mandatory() {
    let df = DataFrame::new(vec![
        Column::new("subject_id".into(), vec![1i64, 2]),
        Column::new("prediction_time".into(), vec![0i64, 1])
            .cast(&DataType::Datetime(TimeUnit::Microseconds, None))
            .unwrap(),
        Column::new("boolean_value".into(), vec![true, false]),
    ])
    .unwrap();

    let out = convert(&df, label_table_schema(), &ConvertOptions::default()).unwrap();
    assert_eq!(
        names(&out),
        [
            "subject_id",
            "prediction_time",
            "boolean_value",
            "integer_value",
            "float_value",
            "categorical_value",
        ]
    );
    assert_eq!(out.column("float_value").unwrap().dtype(), &DataType::Float64);

    let options = ConvertOptions::default().with_add_missing_mandatory(false);
    let err = convert(&df, label_table_schema(), &options).unwrap_err();
    assert_eq!(err.report().unwrap().count(IssueKind::MissingColumn), 3);
}

#[test]
fn test_fixed_schema_rejects_extra_columns_under_default_options() {
    let df = DataFrame::new(vec![
        Column::new("subject_id".into(), vec![1i64, 2]),
        Column::new("prediction_time".into(), vec![0i64, 1])
            .cast(&DataType::Datetime(TimeUnit::Microseconds, None))
            .unwrap(),
        Column::new("note".into(), vec!["a", "b"]),
    ])
    .unwrap();

    let err = convert(&df, label_table_schema(), &ConvertOptions::default()).unwrap_err();
    let report = err.report().unwrap();
    assert_eq!(
        report.issues,
        vec![ConversionIssue::UnexpectedColumns {
            columns: vec!["note".to_string()],
        }]
    );
}

#[test]
fn test_custom_fixed_schema() {
    let schema = ResolvedSchema::new([("a", ColumnType::Int64), ("b", ColumnType::Utf8)]).unwrap();
    let df = DataFrame::new(vec![
        Column::new("b".into(), vec!["x"]),
        Column::new("a".into(), vec![1i64]),
    ])
    .unwrap();
    let out = convert(&df, &schema, &ConvertOptions::default()).unwrap();
    assert_eq!(names(&out), ["a", "b"]);
}

#[test]
fn test_plan_describes_each_column() {
    let df = DataFrame::new(vec![
        Column::new("subject_id".into(), vec![1i32]),
        Column::new("code".into(), vec!["A"]),
        Column::new("time".into(), vec![0i64])
            .cast(&DataType::Datetime(TimeUnit::Microseconds, None))
            .unwrap(),
    ])
    .unwrap();
    let plan = SchemaReconciler::new(data_schema(), ConvertOptions::default())
        .plan(&df)
        .unwrap();

    let actions: Vec<(&str, &ColumnAction)> = plan
        .columns
        .iter()
        .map(|c| (c.field.name.as_str(), &c.action))
        .collect();
    assert_eq!(
        actions,
        vec![
            ("subject_id", &ColumnAction::Cast { from: ColumnType::Opaque("i32".to_string()) }),
            ("time", &ColumnAction::Keep),
            ("code", &ColumnAction::Keep),
            ("numeric_value", &ColumnAction::Synthesize),
        ]
    );
}

#[test]
fn test_uncastable_values_surface_as_backend_error() {
    let df = DataFrame::new(vec![
        Column::new("subject_id".into(), vec!["one", "two"]),
        Column::new("time".into(), vec![0i64, 1])
            .cast(&DataType::Datetime(TimeUnit::Microseconds, None))
            .unwrap(),
        Column::new("code".into(), vec!["A", "B"]),
    ])
    .unwrap();
    let err = convert(&df, data_schema(), &ConvertOptions::default()).unwrap_err();
    assert!(matches!(err, ConvertError::Backend { .. }));
}

#[test]
fn test_reused_optional_name_never_conflicts() {
    let df = DataFrame::new(vec![
        subject_ids(),
        times(),
        codes(),
        numeric_values(),
        Column::new("categorical_value".into(), vec![1i64, 2, 3]),
    ])
    .unwrap();
    let out = convert(&df, data_schema(), &ConvertOptions::default()).unwrap();
    assert_eq!(
        out.column("categorical_value").unwrap().dtype(),
        &DataType::String
    );
    assert!(!matches!(
        convert(&df, data_schema(), &ConvertOptions::default()),
        Err(ConvertError::Schema(SchemaError::Conflict { .. }))
    ));
}

proptest! {
    #[test]
    fn repeated_failures_report_identical_issues(
        order in Just(vec![0usize, 1, 2, 3, 4]).prop_shuffle()
    ) {
        let columns = [
            subject_ids(),
            times(),
            codes(),
            Column::new("text_value".into(), vec![1i64, 2, 3]),
            Column::new("site".into(), vec!["x", "y", "z"]),
        ];
        let shuffled: Vec<Column> = order.iter().map(|&i| columns[i].clone()).collect();
        let df = DataFrame::new(shuffled).unwrap();
        let options = ConvertOptions::default()
            .with_add_missing_mandatory(false)
            .with_cast_policy(false)
            .with_allow_extra_columns(false);

        let first = convert(&df, data_schema(), &options).unwrap_err();
        let second = convert(&df, data_schema(), &options).unwrap_err();
        prop_assert_eq!(first.report(), second.report());
        prop_assert_eq!(first.report().map(|report| report.len()), Some(3));
    }

    #[test]
    fn any_column_permutation_converts_to_canonical(
        order in Just(vec![0usize, 1, 2, 3]).prop_shuffle()
    ) {
        let columns = [subject_ids(), times(), codes(), numeric_values()];
        let shuffled: Vec<Column> = order.iter().map(|&i| columns[i].clone()).collect();
        let df = DataFrame::new(shuffled).unwrap();

        let first = convert(&df, data_schema(), &ConvertOptions::default()).unwrap();
        let second = convert(&df, data_schema(), &ConvertOptions::default()).unwrap();
        prop_assert!(first.equals_missing(&second));
        prop_assert!(first.equals_missing(&canonical_frame()));

        let strict = convert(&df, data_schema(), &ConvertOptions::default().with_reorder_columns(false));
        prop_assert_eq!(strict.is_ok(), order == vec![0, 1, 2, 3]);
    }
}
