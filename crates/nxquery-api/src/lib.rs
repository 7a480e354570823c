// nxquery-api: Async Rust client for the NetXMS WebAPI

pub mod client;
pub mod endpoints;
pub mod error;
pub mod models;
pub mod transport;

pub use client::{NetXmsClient, RawResponse, join_url};
pub use endpoints::ObjectFilter;
pub use error::{Error, StatusKind};
pub use transport::{REQUEST_TIMEOUT, TlsMode, TransportConfig};
