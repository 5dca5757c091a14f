//! Ingestion orchestrator.
//!
//! Validates the collection envelope fail-fast, then walks the features
//! in order: validate, extract, persist. A defective or unpersistable
//! feature is recorded in the summary and never aborts the batch.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use geo_common::GeoResult;
use storage::{FeatureRecord, FeatureStore};

use crate::{extract, validate};

/// Destination for extracted feature records.
///
/// The store implements this directly; tests substitute an in-memory
/// fake so the orchestrator runs without a database.
#[async_trait]
pub trait FeatureSink: Send + Sync {
    /// Persist one record, returning the store-assigned id.
    async fn write_feature(&self, record: &FeatureRecord) -> GeoResult<i64>;
}

#[async_trait]
impl FeatureSink for FeatureStore {
    async fn write_feature(&self, record: &FeatureRecord) -> GeoResult<i64> {
        self.insert_feature(record).await
    }
}

#[async_trait]
impl<S: FeatureSink + ?Sized> FeatureSink for Arc<S> {
    async fn write_feature(&self, record: &FeatureRecord) -> GeoResult<i64> {
        (**self).write_feature(record).await
    }
}

/// Outcome of ingesting one collection.
///
/// Always produced when the envelope is valid, even if every feature
/// failed; only structural or decoding defects fail the request itself.
#[derive(Debug, Clone)]
pub struct IngestSummary {
    /// Size of the original features array, failed ones included.
    pub total_features: usize,
    /// Features that were validated and persisted.
    pub processed_features: usize,
    /// Index-tagged error strings, in input order.
    pub errors: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

impl IngestSummary {
    pub fn fully_processed(&self) -> bool {
        self.errors.is_empty() && self.processed_features == self.total_features
    }
}

/// Drives validation, extraction and persistence for one collection.
pub struct IngestionPipeline<S> {
    sink: S,
}

impl<S: FeatureSink> IngestionPipeline<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    /// Ingest a raw FeatureCollection value.
    ///
    /// Features are persisted sequentially: each insert completes
    /// before the next feature is attempted.
    pub async fn ingest(&self, raw: &Value) -> GeoResult<IngestSummary> {
        let features = validate::validate_collection(raw)?;
        let total_features = features.len();

        let mut processed_features = 0;
        let mut errors = Vec::new();

        for (position, raw_feature) in features.iter().enumerate() {
            let index = position + 1;

            let feature = match validate::validate_feature(raw_feature, index) {
                Ok(feature) => feature,
                Err(e) => {
                    warn!(index, error = %e, "feature failed validation, skipping");
                    errors.push(e.to_string());
                    continue;
                }
            };

            let record = extract::extract(&feature);
            match self.sink.write_feature(&record).await {
                Ok(id) => {
                    debug!(index, id, name = %record.name, "feature persisted");
                    processed_features += 1;
                }
                Err(e) => {
                    warn!(index, error = %e, "feature persistence failed, skipping");
                    errors.push(format!("failed to persist feature {}: {}", index, e));
                }
            }
        }

        Ok(IngestSummary {
            total_features,
            processed_features,
            errors,
            timestamp: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_common::GeoError;
    use serde_json::json;
    use std::sync::Mutex;

    /// In-memory sink recording every write; optionally fails on
    /// selected geometry types.
    #[derive(Default)]
    struct MemorySink {
        records: Mutex<Vec<FeatureRecord>>,
        fail_types: Vec<&'static str>,
    }

    #[async_trait]
    impl FeatureSink for MemorySink {
        async fn write_feature(&self, record: &FeatureRecord) -> GeoResult<i64> {
            if self.fail_types.contains(&record.geometry_type.as_str()) {
                return Err(GeoError::Database("insert failed: connection reset".into()));
            }
            let mut records = self.records.lock().unwrap();
            records.push(record.clone());
            Ok(records.len() as i64)
        }
    }

    fn point_feature(name: &str, x: f64, y: f64) -> Value {
        json!({
            "type": "Feature",
            "geometry": {"type": "Point", "coordinates": [x, y]},
            "properties": {"name": name}
        })
    }

    fn collection(features: Vec<Value>) -> Value {
        json!({"type": "FeatureCollection", "features": features})
    }

    #[tokio::test]
    async fn test_all_valid_features_are_processed() {
        let pipeline = IngestionPipeline::new(MemorySink::default());
        let raw = collection(vec![
            point_feature("a", 0.0, 0.0),
            point_feature("b", 1.0, 1.0),
        ]);

        let summary = pipeline.ingest(&raw).await.unwrap();
        assert_eq!(summary.total_features, 2);
        assert_eq!(summary.processed_features, 2);
        assert!(summary.errors.is_empty());
        assert!(summary.fully_processed());
    }

    #[tokio::test]
    async fn test_structural_failure_persists_nothing() {
        let sink = Arc::new(MemorySink::default());
        let pipeline = IngestionPipeline::new(sink.clone());

        let err = pipeline
            .ingest(&json!({"type": "FeatureCollection"}))
            .await
            .unwrap_err();
        assert!(err.is_request_fatal());
        assert!(sink.records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_features_are_skipped_not_fatal() {
        let sink = Arc::new(MemorySink::default());
        let pipeline = IngestionPipeline::new(sink.clone());

        let raw = collection(vec![
            point_feature("ok-1", 0.0, 0.0),
            json!({"type": "Feature", "geometry": {"type": "Circle", "coordinates": [0.0, 0.0]}}),
            json!({"type": "Feature"}),
            point_feature("ok-2", 1.0, 1.0),
        ]);

        let summary = pipeline.ingest(&raw).await.unwrap();
        assert_eq!(summary.total_features, 4);
        assert_eq!(summary.processed_features, 2);
        assert_eq!(summary.errors.len(), 2);
        assert!(summary.errors[0].contains("feature 2"));
        assert!(summary.errors[0].contains("Circle"));
        assert!(summary.errors[1].contains("feature 3"));

        let names: Vec<String> = sink
            .records
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.name.clone())
            .collect();
        assert_eq!(names, vec!["ok-1", "ok-2"]);
    }

    #[tokio::test]
    async fn test_persistence_failure_is_isolated() {
        let sink = Arc::new(MemorySink {
            records: Mutex::new(Vec::new()),
            fail_types: vec!["LineString"],
        });
        let pipeline = IngestionPipeline::new(sink.clone());

        let raw = collection(vec![
            point_feature("first", 0.0, 0.0),
            json!({
                "type": "Feature",
                "geometry": {"type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]]}
            }),
            point_feature("last", 2.0, 2.0),
        ]);

        let summary = pipeline.ingest(&raw).await.unwrap();
        assert_eq!(summary.total_features, 3);
        assert_eq!(summary.processed_features, 2);
        assert_eq!(summary.errors.len(), 1);
        assert!(summary.errors[0].contains("failed to persist feature 2"));
        assert!(summary.errors[0].contains("connection reset"));
    }

    #[tokio::test]
    async fn test_ingesting_twice_appends_new_records() {
        let sink = Arc::new(MemorySink::default());
        let pipeline = IngestionPipeline::new(sink.clone());
        let raw = collection(vec![point_feature("dup", 3.0, 4.0)]);

        pipeline.ingest(&raw).await.unwrap();
        pipeline.ingest(&raw).await.unwrap();

        let records = sink.records.lock().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, records[1].name);
    }

    #[tokio::test]
    async fn test_empty_collection_is_a_valid_no_op() {
        let pipeline = IngestionPipeline::new(MemorySink::default());
        let summary = pipeline.ingest(&collection(vec![])).await.unwrap();
        assert_eq!(summary.total_features, 0);
        assert_eq!(summary.processed_features, 0);
        assert!(summary.fully_processed());
    }
}
