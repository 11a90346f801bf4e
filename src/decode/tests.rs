//! Tests for decoder module

use super::*;
use pretty_assertions::assert_eq;
use serde_json::json;

// ============================================================================
// CSV Decoder Tests
// ============================================================================

#[test]
fn test_csv_typed_values() {
    let decoder = CsvDecoder::new();
    let body = "video_id,views,ratings_disabled,description\nabc123,748374,False,\n";
    let records = decoder.decode(body).unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["video_id"], json!("abc123"));
    assert_eq!(records[0]["views"], json!(748_374));
    assert_eq!(records[0]["ratings_disabled"], json!(false));
    assert_eq!(records[0]["description"], json!(null));
}

#[test]
fn test_csv_quoted_delimiter() {
    let decoder = CsvDecoder::new();
    let body = "title,views\n\"one, two\",5\n";
    let records = decoder.decode(body).unwrap();

    assert_eq!(records[0]["title"], json!("one, two"));
    assert_eq!(records[0]["views"], json!(5));
}

#[test]
fn test_csv_quoted_newline() {
    let decoder = CsvDecoder::new();
    let body = "title,description\nclip,\"line one\nline two\"\nnext,plain\n";
    let records = decoder.decode(body).unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["description"], json!("line one\nline two"));
    assert_eq!(records[1]["title"], json!("next"));
}

#[test]
fn test_csv_escaped_quote() {
    let decoder = CsvDecoder::new();
    let body = "tags\n\"say \"\"hi\"\"\"\n";
    let records = decoder.decode(body).unwrap();

    assert_eq!(records[0]["tags"], json!("say \"hi\""));
}

#[test]
fn test_csv_crlf_rows() {
    let decoder = CsvDecoder::new();
    let body = "a,b\r\n1,2\r\n3,4\r\n";
    let records = decoder.decode(body).unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[1]["a"], json!(3));
}

#[test]
fn test_csv_blank_lines_skipped() {
    let decoder = CsvDecoder::new();
    let body = "a,b\n1,2\n\n\n3,4\n";
    let records = decoder.decode(body).unwrap();

    assert_eq!(records.len(), 2);
}

#[test]
fn test_csv_short_row_fills_null() {
    let decoder = CsvDecoder::new();
    let body = "a,b,c\n1,2\n";
    let records = decoder.decode(body).unwrap();

    assert_eq!(records[0]["b"], json!(2));
    assert_eq!(records[0]["c"], json!(null));
}

#[test]
fn test_csv_headerless_columns() {
    let decoder = CsvDecoder::with_options(',', false);
    let body = "1,x\n2,y\n";
    let records = decoder.decode(body).unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["column_0"], json!(1));
    assert_eq!(records[1]["column_1"], json!("y"));
}

#[test]
fn test_csv_custom_delimiter() {
    let decoder = CsvDecoder::with_options('\t', true);
    let body = "a\tb\n1\ttwo\n";
    let records = decoder.decode(body).unwrap();

    assert_eq!(records[0]["a"], json!(1));
    assert_eq!(records[0]["b"], json!("two"));
}

#[test]
fn test_csv_unterminated_quote_errors() {
    let decoder = CsvDecoder::new();
    let err = decoder.decode("a\n\"open\n").unwrap_err();
    assert!(err.to_string().contains("unterminated"));
}

#[test]
fn test_csv_empty_body() {
    let decoder = CsvDecoder::new();
    assert!(decoder.decode("").unwrap().is_empty());
}

// ============================================================================
// JSON Decoder Tests
// ============================================================================

#[test]
fn test_json_array() {
    let decoder = JsonDecoder;
    let records = decoder.decode(r#"[{"a": 1}, {"a": 2}]"#).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1]["a"], json!(2));
}

#[test]
fn test_json_single_object() {
    let decoder = JsonDecoder;
    let records = decoder.decode(r#"{"a": 1}"#).unwrap();
    assert_eq!(records.len(), 1);
}

#[test]
fn test_json_scalar_errors() {
    let decoder = JsonDecoder;
    assert!(decoder.decode("42").is_err());
}

// ============================================================================
// JSONL Decoder Tests
// ============================================================================

#[test]
fn test_jsonl_lines() {
    let decoder = JsonlDecoder;
    let records = decoder.decode("{\"a\": 1}\n\n{\"a\": 2}\n").unwrap();
    assert_eq!(records.len(), 2);
}

#[test]
fn test_jsonl_bad_line_reports_position() {
    let decoder = JsonlDecoder;
    let err = decoder.decode("{\"a\": 1}\nnot json\n").unwrap_err();
    assert!(err.to_string().contains("line 2"));
}

// ============================================================================
// Format Dispatch Tests
// ============================================================================

#[test]
fn test_decoder_for_csv() {
    let format = crate::types::DataFormat::Csv {
        delimiter: ',',
        header: true,
    };
    let decoder = decoder_for(&format);
    let records = decoder.decode("a\n1\n").unwrap();
    assert_eq!(records[0]["a"], json!(1));
}

#[test]
fn test_decoder_for_jsonl() {
    let decoder = decoder_for(&crate::types::DataFormat::Jsonl);
    let records = decoder.decode("{\"a\": true}\n").unwrap();
    assert_eq!(records[0]["a"], json!(true));
}
