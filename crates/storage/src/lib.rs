//! PostGIS-backed feature store.
//!
//! Persists validated GeoJSON features into a spatially indexed table
//! and serves the read-only query paths (count, filter by geometry
//! type). Writes are strict and transactional; reads are deliberately
//! lenient and degrade to empty results on failure.

mod features;

pub use features::{FeatureRecord, FeatureStore, StoreConfig, StoredFeature};
