//! Shared types for the GeoJSON ingestion services.
//!
//! Holds the typed GeoJSON entity model (geometry, feature, collection)
//! and the error taxonomy used across the validation pipeline, the
//! feature store and the HTTP surface.

pub mod error;
pub mod feature;
pub mod geometry;

pub use error::{GeoError, GeoResult};
pub use feature::{Feature, FeatureCollection};
pub use geometry::{Geometry, GeometryDefect, Position, GEOMETRY_TYPES};
