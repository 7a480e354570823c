// ── DCI history shaping ──

use chrono::{DateTime, Utc};
use nxquery_api::models::DciHistory;

use crate::error::CoreError;
use crate::model::{Field, FieldValues, Frame};

/// Shape a DCI history into a `time`/`value` frame named after the DCI.
///
/// Any sample with an unparseable timestamp or value fails the whole frame.
pub fn shape_dci_history(body: &[u8]) -> Result<Frame, CoreError> {
    let history: DciHistory = serde_json::from_slice(body)
        .map_err(|e| CoreError::shaping(format!("failed to parse response: {e}")))?;

    let mut times = Vec::with_capacity(history.values.len());
    let mut values = Vec::with_capacity(history.values.len());
    for sample in &history.values {
        let time = DateTime::parse_from_rfc3339(&sample.timestamp).map_err(|e| {
            CoreError::shaping(format!(
                "failed to parse timestamp '{}': {e}",
                sample.timestamp
            ))
        })?;
        let value: f64 = sample.value.parse().map_err(|e| {
            CoreError::shaping(format!("failed to parse value '{}': {e}", sample.value))
        })?;
        times.push(Some(time.with_timezone(&Utc)));
        values.push(Some(value));
    }

    let mut value_field = Field::new("value", FieldValues::Number(values));
    if !history.unit_name.is_empty() {
        value_field = value_field.with_unit(history.unit_name);
    }

    Frame::with_fields(
        history.description,
        vec![Field::new("time", FieldValues::Time(times)), value_field],
    )
}
