//! Aggregation pipeline
//!
//! filter -> bucket -> reduce over an upstream snapshot:
//!
//! - [`filter`] - order and line-item predicates (date range, warehouse, supplier)
//! - [`bucket`] - time and categorical bucket keys
//! - [`reduce`] - metrics and per-bucket accumulators
//! - [`pipeline`] - the parametrized [`Aggregation`]
//! - [`catalog`] - id lookups over a snapshot
//! - [`money`] - decimal accumulation helpers

pub mod bucket;
pub mod catalog;
pub mod filter;
pub mod money;
pub mod pipeline;
pub mod reduce;

pub use bucket::{BucketKey, Granularity};
pub use catalog::Catalog;
pub use filter::{DateRange, OrderFilter};
pub use pipeline::{Aggregation, Buckets};
pub use reduce::{Accumulator, Metric};
