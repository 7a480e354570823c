// ── Response shaping ──
//
// Everything that turns remote JSON into frames.

pub mod alarms;
pub mod colors;
pub mod ordered;
pub mod status;
pub mod table;
pub mod timeseries;

pub use alarms::shape_alarms;
pub use colors::{STATUS_PALETTE, StatusColor, status_color};
pub use ordered::OrderedRecord;
pub use status::shape_object_status;
pub use table::shape_table;
pub use timeseries::shape_dci_history;
