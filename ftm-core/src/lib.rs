//! Area-of-interest capture, request construction and backend types for
//! snow coverage analysis.

pub mod bbox;
pub mod error;
pub mod geojson;
pub mod geometry;
pub mod record;
pub mod request;

#[cfg(feature = "api")]
pub mod client;
