// ── Alarm shaping ──

use nxquery_api::models::AlarmRecord;

use super::colors::{alarm_state_mappings, severity_mappings};
use crate::error::CoreError;
use crate::model::{Field, FieldValues, Frame};

pub const ALARMS_FRAME: &str = "alarms";

/// Shape the alarm endpoint response into a nine-column frame.
///
/// Severity and state columns carry their color mappings in the column
/// config; the cells stay plain names.
pub fn shape_alarms(body: &[u8]) -> Result<Frame, CoreError> {
    let alarms: Vec<AlarmRecord> = serde_json::from_slice(body)
        .map_err(|e| CoreError::shaping(format!("failed to parse response: {e}")))?;

    let mut id = Vec::with_capacity(alarms.len());
    let mut severity = Vec::with_capacity(alarms.len());
    let mut state = Vec::with_capacity(alarms.len());
    let mut source = Vec::with_capacity(alarms.len());
    let mut message = Vec::with_capacity(alarms.len());
    let mut count = Vec::with_capacity(alarms.len());
    let mut ack_by = Vec::with_capacity(alarms.len());
    let mut created = Vec::with_capacity(alarms.len());
    let mut last_change = Vec::with_capacity(alarms.len());

    for alarm in alarms {
        id.push(Some(f64::from(alarm.id)));
        severity.push(alarm.severity);
        state.push(alarm.state);
        source.push(alarm.source);
        message.push(alarm.message);
        count.push(Some(f64::from(alarm.count)));
        ack_by.push(alarm.ack_by.unwrap_or_default());
        created.push(Some(alarm.created));
        last_change.push(Some(alarm.last_change));
    }

    Frame::with_fields(
        ALARMS_FRAME,
        vec![
            Field::new("Id", FieldValues::Number(id)),
            Field::new("Severity", FieldValues::String(severity))
                .with_mappings(severity_mappings()),
            Field::new("State", FieldValues::String(state)).with_mappings(alarm_state_mappings()),
            Field::new("Source", FieldValues::String(source)),
            Field::new("Message", FieldValues::String(message)),
            Field::new("Count", FieldValues::Number(count)),
            Field::new("Ack/Resolve by", FieldValues::String(ack_by)),
            Field::new("Created", FieldValues::Time(created)),
            Field::new("Last Change", FieldValues::Time(last_change)),
        ],
    )
}
