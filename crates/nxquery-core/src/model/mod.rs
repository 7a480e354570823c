// ── Data model ──
//
// Per-request types only: queries in, frames and per-query results out.
// Nothing here outlives a single request.

pub mod frame;
pub mod query;
pub mod response;

pub use frame::{Field, FieldColor, FieldConfig, FieldType, FieldValues, Frame, ValueMapping};
pub use query::{DataQuery, QueryDataRequest, QueryField, QueryModel, QueryType, TimeRange};
pub use response::{DataResponse, QueryDataResponse, QueryError, ResponseStatus};
