//! Normalized inventory: the vehicle schema, snapshot loading, and the
//! ingestion seam that maps raw feed payloads onto the schema.

pub mod adapter;
pub mod snapshot;
pub mod vehicle;

pub use adapter::{AdapterError, AdapterRegistry, GenericAdapter, SourceAdapter};
pub use snapshot::InventorySnapshot;
pub use vehicle::{FieldValue, Vehicle};
