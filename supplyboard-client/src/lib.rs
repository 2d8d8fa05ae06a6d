//! SupplyBoard Client - HTTP client for the upstream commerce API
//!
//! Fetches orders, products, customers, stock and lookup tables, and bundles
//! them into a [`DataSnapshot`] for the aggregation pipeline.

pub mod config;
pub mod error;
pub mod http;
pub mod snapshot;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;
pub use snapshot::{DataSnapshot, SnapshotSource, StaticSource};
