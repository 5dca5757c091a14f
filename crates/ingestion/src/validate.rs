//! Structural and geometric validation of raw GeoJSON input.
//!
//! The collection envelope is validated fail-fast: a defect there means
//! nothing is ingested. Individual features are validated one at a time
//! and a defective feature is skipped without failing the batch.

use geo::algorithm::Validation;
use serde_json::Value;

use geo_common::{Feature, GeoError, GeoResult, GEOMETRY_TYPES};

/// Validate the FeatureCollection envelope of a raw JSON value and
/// return the raw features it carries.
///
/// Checks, in order: the value is an object, `type` equals
/// "FeatureCollection", and `features` is an array.
pub fn validate_collection(raw: &Value) -> GeoResult<&[Value]> {
    let object = raw
        .as_object()
        .ok_or_else(|| GeoError::InvalidGeoJson("GeoJSON payload must be an object".into()))?;

    match object.get("type") {
        None => return Err(GeoError::InvalidGeoJson("missing 'type' field".into())),
        Some(kind) if kind != "FeatureCollection" => {
            return Err(GeoError::InvalidGeoJson(
                "only FeatureCollection is supported".into(),
            ))
        }
        Some(_) => {}
    }

    let features = object.get("features").ok_or_else(|| {
        GeoError::InvalidGeoJson("FeatureCollection must have a 'features' array".into())
    })?;

    features
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| GeoError::InvalidGeoJson("'features' must be an array".into()))
}

/// Validate one raw feature at the given 1-based position.
///
/// Structural checks run first (shape of the feature and geometry
/// objects, supported geometry type, properties object), then the
/// decoded geometry goes through the topological validity test. The
/// returned error carries the feature index and a human-readable
/// description of the defect.
pub fn validate_feature(raw: &Value, index: usize) -> GeoResult<Feature> {
    let invalid = |message: String| GeoError::FeatureInvalid { index, message };

    let object = raw
        .as_object()
        .ok_or_else(|| invalid("feature must be an object".into()))?;

    match object.get("type") {
        None => return Err(invalid("missing 'type' field".into())),
        Some(kind) if kind != "Feature" => {
            return Err(invalid("feature type must be 'Feature'".into()))
        }
        Some(_) => {}
    }

    let geometry = object
        .get("geometry")
        .ok_or_else(|| invalid("missing 'geometry' field".into()))?
        .as_object()
        .ok_or_else(|| invalid("'geometry' must be an object".into()))?;

    let geometry_type = geometry
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| invalid("geometry is missing a 'type' field".into()))?;

    if geometry.get("coordinates").is_none() {
        return Err(invalid("geometry is missing a 'coordinates' field".into()));
    }

    if !GEOMETRY_TYPES.contains(&geometry_type) {
        return Err(invalid(format!(
            "unsupported geometry type: {}",
            geometry_type
        )));
    }

    if let Some(properties) = object.get("properties") {
        if !properties.is_object() {
            return Err(invalid("'properties' must be an object".into()));
        }
    }

    let feature: Feature = serde_json::from_value(raw.clone())
        .map_err(|e| invalid(format!("invalid geometry: {}", e)))?;

    let geo_geometry = feature
        .geometry
        .to_geo()
        .map_err(|defect| invalid(format!("invalid geometry: {}", defect)))?;

    geo_geometry
        .check_validation()
        .map_err(|problem| invalid(format!("invalid geometry: {}", problem)))?;

    Ok(feature)
}
