//! Data models
//!
//! Read-only mirrors of the upstream commerce API entities. Every type
//! deserializes leniently (see [`de`]) because the upstream JSON mixes
//! numbers and numeric strings freely.

pub mod catalog;
pub mod customer;
pub mod de;
pub mod ids;
pub mod order;
pub mod product;
pub mod stock;
pub mod timestamp;

// Re-exports
pub use catalog::*;
pub use customer::*;
pub use ids::*;
pub use order::*;
pub use product::*;
pub use stock::*;
pub use timestamp::Timestamp;
