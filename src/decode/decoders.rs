//! Decoder implementations

use crate::decode::types::RecordDecoder;
use crate::error::{Error, Result};
use serde_json::{Map, Value};

// ============================================================================
// JSON Decoder
// ============================================================================

/// JSON decoder for whole-document files
///
/// A file is either a top-level array of records or a single record object.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecoder;

impl RecordDecoder for JsonDecoder {
    fn decode(&self, body: &str) -> Result<Vec<Value>> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| Error::decode("json", e.to_string()))?;

        match value {
            Value::Array(items) => Ok(items),
            Value::Object(_) => Ok(vec![value]),
            other => Err(Error::decode(
                "json",
                format!("expected array or object, got {other}"),
            )),
        }
    }
}

// ============================================================================
// JSONL Decoder
// ============================================================================

/// JSON Lines decoder (one record per line)
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonlDecoder;

impl RecordDecoder for JsonlDecoder {
    fn decode(&self, body: &str) -> Result<Vec<Value>> {
        let mut records = Vec::new();

        for (line_no, line) in body.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let value: Value = serde_json::from_str(line).map_err(|e| {
                Error::decode("jsonl", format!("line {}: {e}", line_no + 1))
            })?;
            records.push(value);
        }

        Ok(records)
    }
}

// ============================================================================
// CSV Decoder
// ============================================================================

/// CSV decoder with quote-aware parsing
///
/// Handles quoted fields, doubled-quote escapes, and delimiters or
/// newlines embedded inside quoted fields.
#[derive(Debug, Clone, Copy)]
pub struct CsvDecoder {
    /// Field delimiter
    delimiter: char,
    /// Whether the first row is a header
    has_header: bool,
}

impl Default for CsvDecoder {
    fn default() -> Self {
        Self {
            delimiter: ',',
            has_header: true,
        }
    }
}

impl CsvDecoder {
    /// Create a new CSV decoder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a CSV decoder with custom settings
    pub fn with_options(delimiter: char, has_header: bool) -> Self {
        Self {
            delimiter,
            has_header,
        }
    }
}

impl RecordDecoder for CsvDecoder {
    fn decode(&self, body: &str) -> Result<Vec<Value>> {
        let mut rows = parse_csv_rows(body, self.delimiter)?.into_iter().peekable();
        let mut records = Vec::new();

        // Get headers
        let headers: Vec<String> = if self.has_header {
            match rows.next() {
                Some(header_row) => header_row,
                None => return Ok(records),
            }
        } else {
            // Generate numeric column names from the first row's width
            match rows.peek() {
                Some(first_row) => (0..first_row.len()).map(|i| format!("column_{i}")).collect(),
                None => return Ok(records),
            }
        };

        // Parse data rows
        for fields in rows {
            let mut obj = Map::new();

            for (i, header) in headers.iter().enumerate() {
                let value = fields.get(i).cloned().unwrap_or_default();
                // Try to parse as number or boolean
                let json_value = parse_csv_value(&value);
                obj.insert(header.clone(), json_value);
            }

            records.push(Value::Object(obj));
        }

        Ok(records)
    }
}

/// Split a CSV body into rows of fields
///
/// A single pass over the input: quotes toggle quoting, a doubled quote
/// inside a quoted field is a literal quote, and row breaks only count
/// outside quotes.
fn parse_csv_rows(body: &str, delimiter: char) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '"' {
            if in_quotes {
                // Check for escaped quote
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                in_quotes = true;
            }
        } else if c == delimiter && !in_quotes {
            fields.push(current.trim().to_string());
            current = String::new();
        } else if c == '\n' && !in_quotes {
            end_row(&mut rows, &mut fields, &mut current);
        } else if c == '\r' && !in_quotes {
            // Swallow the \n of a \r\n pair
            if chars.peek() == Some(&'\n') {
                chars.next();
            }
            end_row(&mut rows, &mut fields, &mut current);
        } else {
            current.push(c);
        }
    }

    if in_quotes {
        return Err(Error::decode("csv", "unterminated quoted field"));
    }

    end_row(&mut rows, &mut fields, &mut current);
    Ok(rows)
}

/// Finish the current row, skipping blank lines
fn end_row(rows: &mut Vec<Vec<String>>, fields: &mut Vec<String>, current: &mut String) {
    let last = current.trim().to_string();
    current.clear();

    if fields.is_empty() && last.is_empty() {
        return;
    }

    let mut row = std::mem::take(fields);
    row.push(last);
    rows.push(row);
}

/// Parse a CSV value into a JSON value
fn parse_csv_value(value: &str) -> Value {
    // Try integer
    if let Ok(n) = value.parse::<i64>() {
        return Value::Number(n.into());
    }

    // Try float
    if let Ok(n) = value.parse::<f64>() {
        if let Some(num) = serde_json::Number::from_f64(n) {
            return Value::Number(num);
        }
    }

    // Try boolean
    match value.to_lowercase().as_str() {
        "true" | "yes" => return Value::Bool(true),
        "false" | "no" => return Value::Bool(false),
        _ => {}
    }

    // Null/empty
    if value.is_empty() || value.eq_ignore_ascii_case("null") || value.eq_ignore_ascii_case("none")
    {
        return Value::Null;
    }

    // String
    Value::String(value.to_string())
}
