// ── Display color tables ──
//
// Fixed product-level colors for NetXMS severities, object status codes
// and alarm states. Never derived from remote data.

use crate::model::ValueMapping;

/// Name and color of one severity / status level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusColor {
    pub name: &'static str,
    pub color: &'static str,
}

/// Object status palette, indexed by status code (0 = Normal .. 8 = Testing).
///
/// Alarm severities use the same names and colors.
pub const STATUS_PALETTE: [StatusColor; 9] = [
    StatusColor { name: "Normal", color: "rgb(0, 192, 0)" },
    StatusColor { name: "Warning", color: "rgb(0, 255, 255)" },
    StatusColor { name: "Minor", color: "rgb(231, 226, 0)" },
    StatusColor { name: "Major", color: "rgb(255, 128, 0)" },
    StatusColor { name: "Critical", color: "rgb(160, 0, 0)" },
    StatusColor { name: "Unknown", color: "rgb(0, 0, 128)" },
    StatusColor { name: "Unmanaged", color: "rgb(192, 192, 192)" },
    StatusColor { name: "Disabled", color: "rgb(128, 64, 0)" },
    StatusColor { name: "Testing", color: "rgb(255, 128, 255)" },
];

/// Alarm state colors.
pub const ALARM_STATE_COLORS: [(&str, &str); 3] = [
    ("Outstanding", "yellow"),
    ("Acknowledged", "greenyellow"),
    ("Resolved", "green"),
];

/// Palette entry for a status code; `None` outside `0..=8`.
pub fn status_color(code: i64) -> Option<&'static StatusColor> {
    usize::try_from(code)
        .ok()
        .and_then(|idx| STATUS_PALETTE.get(idx))
}

/// Value mappings for the alarm severity column.
pub fn severity_mappings() -> Vec<ValueMapping> {
    STATUS_PALETTE
        .iter()
        .map(|entry| ValueMapping {
            value: entry.name.to_owned(),
            text: entry.name.to_owned(),
            color: entry.color.to_owned(),
        })
        .collect()
}

/// Value mappings for the alarm state column.
pub fn alarm_state_mappings() -> Vec<ValueMapping> {
    ALARM_STATE_COLORS
        .iter()
        .map(|(state, color)| ValueMapping {
            value: (*state).to_owned(),
            text: (*state).to_owned(),
            color: (*color).to_owned(),
        })
        .collect()
}
