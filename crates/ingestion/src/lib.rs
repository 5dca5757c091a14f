//! GeoJSON validation and ingestion library.
//!
//! Drives the pipeline from raw JSON input to persisted features:
//!
//! - structural validation of the FeatureCollection envelope (fail-fast)
//! - per-feature structural and topological validation (skip-on-failure)
//! - extraction of name, canonical geometry and properties
//! - sequential persistence with per-feature failure isolation
//!
//! The same validity rules back both the `ingest-api` service and the
//! `geojson-check` CLI.

pub mod extract;
pub mod pipeline;
pub mod validate;

// Re-exports
pub use pipeline::{FeatureSink, IngestSummary, IngestionPipeline};
