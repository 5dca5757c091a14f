//! Typed GeoJSON feature and collection models.
//!
//! These are transient: decoded from validated input, consumed by the
//! extractor, and discarded once the request completes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::geometry::Geometry;

/// A single GeoJSON feature with a required geometry and open properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type", default = "feature_tag")]
    pub kind: String,

    pub geometry: Geometry,

    /// Open key/value mapping; absent means no properties.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Map<String, Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
}

impl Feature {
    /// Look up a property value, if any properties were supplied.
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.as_ref().and_then(|props| props.get(key))
    }
}

fn feature_tag() -> String {
    "Feature".to_string()
}

/// An ordered set of features plus the GeoJSON type tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type", default = "collection_tag")]
    pub kind: String,

    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: collection_tag(),
            features,
        }
    }
}

fn collection_tag() -> String {
    "FeatureCollection".to_string()
}
