//! Tests for transform module

use super::*;
use crate::config::{ChoicePolicy, FieldMapping};
use crate::error::Error;
use crate::types::FieldType;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn mapping(source: &str, from: FieldType, target: &str, to: FieldType) -> FieldMapping {
    FieldMapping {
        source: source.to_string(),
        source_type: from,
        target: target.to_string(),
        target_type: to,
    }
}

fn keys(record: &Value) -> Vec<&str> {
    record
        .as_object()
        .map(|obj| obj.keys().map(String::as_str).collect())
        .unwrap_or_default()
}

// ============================================================================
// Schema Mapper Tests
// ============================================================================

#[test]
fn test_mapper_output_shape() {
    let mapper = SchemaMapper::new(vec![
        mapping("video_id", FieldType::String, "video_id", FieldType::String),
        mapping("views", FieldType::Long, "view_count", FieldType::Long),
    ])
    .unwrap();

    let records = vec![json!({"video_id": "abc", "views": 7, "ignored": "x"})];
    let mapped = mapper.apply(records).unwrap();

    assert_eq!(mapped.len(), 1);
    assert_eq!(keys(&mapped[0]), vec!["video_id", "view_count"]);
    assert_eq!(mapped[0]["view_count"], json!(7));
}

#[test]
fn test_mapper_missing_source_is_null() {
    let mapper = SchemaMapper::new(vec![mapping(
        "description",
        FieldType::String,
        "description",
        FieldType::String,
    )])
    .unwrap();

    let mapped = mapper.apply(vec![json!({})]).unwrap();
    assert_eq!(mapped[0]["description"], json!(null));
}

#[test]
fn test_mapper_rejects_duplicate_targets() {
    let result = SchemaMapper::new(vec![
        mapping("a", FieldType::String, "out", FieldType::String),
        mapping("b", FieldType::String, "out", FieldType::String),
    ]);

    assert!(matches!(result, Err(Error::Mapping { .. })));
}

#[test]
fn test_mapper_rejects_empty_mappings() {
    assert!(SchemaMapper::new(Vec::new()).is_err());
}

#[test]
fn test_mapper_rejects_non_object_record() {
    let mapper = SchemaMapper::new(vec![mapping(
        "a",
        FieldType::String,
        "a",
        FieldType::String,
    )])
    .unwrap();

    assert!(mapper.apply(vec![json!([1, 2])]).is_err());
}

// ============================================================================
// Coercion Tests
// ============================================================================

#[test]
fn test_coerce_string_to_long() {
    let mapper = SchemaMapper::new(vec![mapping(
        "views",
        FieldType::Long,
        "views",
        FieldType::Long,
    )])
    .unwrap();

    let mapped = mapper
        .apply(vec![json!({"views": "748374"}), json!({"views": " 12 "})])
        .unwrap();

    assert_eq!(mapped[0]["views"], json!(748_374));
    assert_eq!(mapped[1]["views"], json!(12));
}

#[test]
fn test_coerce_whole_double_to_long() {
    let mapper = SchemaMapper::new(vec![mapping(
        "count",
        FieldType::Long,
        "count",
        FieldType::Long,
    )])
    .unwrap();

    let mapped = mapper
        .apply(vec![json!({"count": 4.0}), json!({"count": 4.5})])
        .unwrap();

    assert_eq!(mapped[0]["count"], json!(4));
    // fractional values cannot become longs; the observed value survives
    assert_eq!(mapped[1]["count"], json!(4.5));
}

#[test]
fn test_coerce_keeps_unparseable_scalar() {
    let mapper = SchemaMapper::new(vec![mapping(
        "views",
        FieldType::Long,
        "views",
        FieldType::Long,
    )])
    .unwrap();

    let mapped = mapper.apply(vec![json!({"views": "abc"})]).unwrap();
    assert_eq!(mapped[0]["views"], json!("abc"));
}

#[test]
fn test_coerce_boolean_forms() {
    let mapper = SchemaMapper::new(vec![mapping(
        "flag",
        FieldType::Boolean,
        "flag",
        FieldType::Boolean,
    )])
    .unwrap();

    let mapped = mapper
        .apply(vec![
            json!({"flag": true}),
            json!({"flag": "False"}),
            json!({"flag": "yes"}),
            json!({"flag": 1}),
            json!({"flag": 0}),
            json!({"flag": "maybe"}),
        ])
        .unwrap();

    assert_eq!(mapped[0]["flag"], json!(true));
    assert_eq!(mapped[1]["flag"], json!(false));
    assert_eq!(mapped[2]["flag"], json!(true));
    assert_eq!(mapped[3]["flag"], json!(true));
    assert_eq!(mapped[4]["flag"], json!(false));
    assert_eq!(mapped[5]["flag"], json!("maybe"));
}

#[test]
fn test_coerce_to_string() {
    let mapper = SchemaMapper::new(vec![mapping(
        "tags",
        FieldType::String,
        "tags",
        FieldType::String,
    )])
    .unwrap();

    let mapped = mapper
        .apply(vec![
            json!({"tags": 42}),
            json!({"tags": true}),
            json!({"tags": ["a", "b"]}),
        ])
        .unwrap();

    assert_eq!(mapped[0]["tags"], json!("42"));
    assert_eq!(mapped[1]["tags"], json!("true"));
    assert_eq!(mapped[2]["tags"], json!("[\"a\",\"b\"]"));
}

#[test]
fn test_coerce_long_to_double() {
    let mapper = SchemaMapper::new(vec![mapping(
        "score",
        FieldType::Double,
        "score",
        FieldType::Double,
    )])
    .unwrap();

    let mapped = mapper
        .apply(vec![json!({"score": 3}), json!({"score": "2.5"})])
        .unwrap();

    assert_eq!(mapped[0]["score"], json!(3.0));
    assert_eq!(mapped[1]["score"], json!(2.5));
}

#[test]
fn test_coerce_null_passes_through() {
    let mapper = SchemaMapper::new(vec![mapping(
        "views",
        FieldType::Long,
        "views",
        FieldType::Long,
    )])
    .unwrap();

    let mapped = mapper.apply(vec![json!({"views": null})]).unwrap();
    assert_eq!(mapped[0]["views"], json!(null));
}

#[test]
fn test_coerce_container_to_long_becomes_text() {
    let mapper = SchemaMapper::new(vec![mapping(
        "views",
        FieldType::Long,
        "views",
        FieldType::Long,
    )])
    .unwrap();

    let mapped = mapper.apply(vec![json!({"views": {"n": 1}})]).unwrap();
    assert_eq!(mapped[0]["views"], json!("{\"n\":1}"));
}

// ============================================================================
// Choice Resolver Tests
// ============================================================================

fn mixed_records() -> Vec<Value> {
    vec![
        json!({"category_id": 24, "title": "a"}),
        json!({"category_id": "unknown", "title": "b"}),
        json!({"category_id": null, "title": "c"}),
    ]
}

#[test]
fn test_make_struct_wraps_ambiguous_field() {
    let resolver = ChoiceResolver::new(ChoicePolicy::MakeStruct);
    let (records, report) = resolver.apply(mixed_records()).unwrap();

    assert_eq!(records[0]["category_id"], json!({"long": 24}));
    assert_eq!(records[1]["category_id"], json!({"string": "unknown"}));
    assert_eq!(records[2]["category_id"], json!(null));

    // the unambiguous field is untouched
    assert_eq!(records[0]["title"], json!("a"));

    let observed = report.observed("category_id").unwrap();
    assert_eq!(
        observed.iter().copied().collect::<Vec<_>>(),
        vec![FieldType::Long, FieldType::String]
    );
    assert!(report.observed("title").is_none());
}

#[test]
fn test_single_type_field_is_not_a_choice() {
    let resolver = ChoiceResolver::new(ChoicePolicy::MakeStruct);
    let records = vec![json!({"views": 1}), json!({"views": null}), json!({"views": 2})];

    let (records, report) = resolver.apply(records).unwrap();

    assert!(report.is_empty());
    assert_eq!(records[0]["views"], json!(1));
    assert_eq!(records[1]["views"], json!(null));
}

#[test]
fn test_cast_projects_to_target_type() {
    let resolver = ChoiceResolver::new(ChoicePolicy::Cast {
        to: FieldType::Long,
    });
    let (records, report) = resolver.apply(mixed_records()).unwrap();

    assert!(report.is_empty());
    assert_eq!(records[0]["category_id"], json!(24));
    assert_eq!(records[1]["category_id"], json!(null));
    assert_eq!(records[2]["category_id"], json!(null));
}

#[test]
fn test_strict_fails_on_ambiguity() {
    let resolver = ChoiceResolver::new(ChoicePolicy::Strict);
    let err = resolver.apply(mixed_records()).unwrap_err();

    match err {
        Error::UnresolvedChoice { field, observed } => {
            assert_eq!(field, "category_id");
            assert_eq!(observed, "long, string");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_strict_passes_clean_records() {
    let resolver = ChoiceResolver::new(ChoicePolicy::Strict);
    let records = vec![json!({"views": 1}), json!({"views": 2})];

    let (records, report) = resolver.apply(records).unwrap();
    assert!(report.is_empty());
    assert_eq!(records.len(), 2);
}

#[test]
fn test_choice_report_describe() {
    let resolver = ChoiceResolver::new(ChoicePolicy::MakeStruct);
    let records = vec![
        json!({"a": true, "b": 1.5}),
        json!({"a": "t", "b": 2}),
    ];

    let (_, report) = resolver.apply(records).unwrap();
    assert_eq!(
        report.describe(),
        vec!["a(boolean, string)".to_string(), "b(double, long)".to_string()]
    );
}

// ============================================================================
// Null Column Tests
// ============================================================================

#[test]
fn test_drop_all_null_column() {
    let records = vec![
        json!({"video_id": "a", "description": null}),
        json!({"video_id": "b", "description": null}),
    ];

    let (records, dropped) = drop_null_fields(records);

    assert_eq!(dropped, vec!["description".to_string()]);
    assert_eq!(keys(&records[0]), vec!["video_id"]);
    assert_eq!(keys(&records[1]), vec!["video_id"]);
}

#[test]
fn test_keep_partially_null_column() {
    let records = vec![
        json!({"video_id": "a", "description": null}),
        json!({"video_id": "b", "description": "words"}),
    ];

    let (records, dropped) = drop_null_fields(records);

    assert!(dropped.is_empty());
    assert_eq!(records[0]["description"], json!(null));
    assert_eq!(records[1]["description"], json!("words"));
}

#[test]
fn test_drop_reports_sorted_names() {
    let records = vec![json!({"zeta": null, "alpha": null, "mid": 1})];

    let (_, dropped) = drop_null_fields(records);
    assert_eq!(dropped, vec!["alpha".to_string(), "zeta".to_string()]);
}

#[test]
fn test_drop_on_empty_input() {
    let (records, dropped) = drop_null_fields(Vec::new());
    assert!(records.is_empty());
    assert!(dropped.is_empty());
}

#[test]
fn test_column_absent_in_some_records() {
    // absent counts as null for the column decision
    let records = vec![json!({"a": 1, "b": null}), json!({"a": 2})];

    let (records, dropped) = drop_null_fields(records);
    assert_eq!(dropped, vec!["b".to_string()]);
    assert_eq!(keys(&records[0]), vec!["a"]);
}
