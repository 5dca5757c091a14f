//! Extraction of storage records from validated features.
//!
//! Pure transformation: input that passed validation cannot fail here.

use serde_json::{Map, Value};

use geo_common::Feature;
use storage::FeatureRecord;

/// Fallback display name when no naming property is present.
const UNKNOWN_NAME: &str = "Unknown";

/// Derive the persistable record for a validated feature.
///
/// The display name resolves by priority `properties.name`,
/// `properties.NAME`, `properties.id`, then "Unknown". The canonical
/// geometry is the serialized form of the typed geometry; the archival
/// copy keeps the same structure.
pub fn extract(feature: &Feature) -> FeatureRecord {
    let properties = feature
        .properties
        .clone()
        .unwrap_or_else(Map::new);

    let geometry = serde_json::to_value(&feature.geometry).unwrap_or(Value::Null);

    FeatureRecord {
        name: derive_name(&properties),
        geometry_type: feature.geometry.type_name().to_string(),
        raw_geometry: geometry.clone(),
        geometry,
        properties: Value::Object(properties),
    }
}

fn derive_name(properties: &Map<String, Value>) -> String {
    ["name", "NAME", "id"]
        .iter()
        .filter_map(|key| properties.get(*key))
        .find_map(display_value)
        .unwrap_or_else(|| UNKNOWN_NAME.to_string())
}

/// Render a property value as a display name. Strings are taken as-is,
/// other scalars via their JSON rendering; null counts as absent.
fn display_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
