// ── Dynamic table shaping ──
//
// Converts a JSON array of objects with a data-dependent schema into one
// frame. The first object's key order is the column order; each column's
// type comes from its first non-null value.

use serde::Deserialize;
use serde_json::Value;

use super::ordered::OrderedRecord;
use crate::error::CoreError;
use crate::model::{Field, FieldType, FieldValues, Frame};

/// One element of the response array.
///
/// Only the first row has to be an object; later rows that are not
/// objects contribute null cells.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Row {
    Record(OrderedRecord),
    Other(Value),
}

impl Row {
    fn get_non_null(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Record(record) => record.get_non_null(key),
            Self::Other(_) => None,
        }
    }
}

/// Shape a raw response body into a table frame.
pub fn shape_table(frame_name: &str, body: &[u8]) -> Result<Frame, CoreError> {
    let rows = decode_rows(body)?;
    let columns = match rows.first() {
        None => return Err(CoreError::shaping("empty array")),
        Some(Row::Record(first)) => first.keys(),
        Some(Row::Other(value)) => {
            return Err(CoreError::shaping(format!(
                "failed to parse rows: expected a JSON object, found {value}"
            )));
        }
    };

    let fields = columns
        .iter()
        .map(|key| build_column(key, &rows))
        .collect();

    Frame::with_fields(frame_name, fields)
}

fn decode_rows(body: &[u8]) -> Result<Vec<Row>, CoreError> {
    serde_json::from_slice::<Vec<Row>>(body).map_err(|e| {
        if e.is_data() {
            CoreError::shaping("expected array")
        } else {
            CoreError::shaping(format!("failed to parse response: {e}"))
        }
    })
}

/// Type of the first non-null value in `key`; all-null columns are strings.
fn infer_type(key: &str, rows: &[Row]) -> FieldType {
    match rows.iter().find_map(|r| r.get_non_null(key)) {
        Some(Value::Number(_)) => FieldType::Number,
        Some(Value::Bool(_)) => FieldType::Boolean,
        _ => FieldType::String,
    }
}

fn build_column(key: &str, rows: &[Row]) -> Field {
    let cells = rows.iter().map(|r| r.get_non_null(key));
    let values = match infer_type(key, rows) {
        FieldType::Number => FieldValues::Number(cells.map(|v| v.and_then(as_number)).collect()),
        FieldType::Boolean => FieldValues::Boolean(cells.map(|v| v.and_then(as_bool)).collect()),
        FieldType::String | FieldType::Time => {
            FieldValues::String(cells.map(|v| v.map(as_text).unwrap_or_default()).collect())
        }
    };
    Field::new(key, values)
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
