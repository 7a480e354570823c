// ── Object status shaping ──

use nxquery_api::models::ObjectStatusRecord;

use super::colors::status_color;
use crate::error::CoreError;
use crate::model::{Field, FieldColor, FieldValues, Frame};

/// Shape the object-status response into one frame per object.
///
/// Each frame holds a single `name` column colored by the object's status.
/// Status codes outside the palette are rejected.
pub fn shape_object_status(body: &[u8]) -> Result<Vec<Frame>, CoreError> {
    let objects: Vec<ObjectStatusRecord> = serde_json::from_slice(body)
        .map_err(|e| CoreError::shaping(format!("failed to parse response: {e}")))?;

    objects
        .into_iter()
        .map(|object| {
            let color = status_color(object.status).ok_or_else(|| {
                CoreError::shaping(format!(
                    "object '{}' has unknown status code {}",
                    object.name, object.status
                ))
            })?;
            Frame::with_fields(
                object.name.clone(),
                vec![
                    Field::new("name", FieldValues::String(vec![object.name]))
                        .with_color(FieldColor::fixed(color.color)),
                ],
            )
        })
        .collect()
}
