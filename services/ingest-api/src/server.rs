//! HTTP surface for the ingestion service.
//!
//! Routes:
//! - `POST /ingest` - Ingest a FeatureCollection (upload or JSON body)
//! - `GET /healthz` - Liveness check
//! - `GET /features/count` - Total persisted features
//! - `GET /features` - Recent features filtered by geometry type

use axum::{
    body::Bytes,
    extract::{Extension, FromRequest, Multipart, Query, Request},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use geo_common::GeoError;
use ingestion::{IngestSummary, IngestionPipeline};
use storage::{FeatureStore, StoredFeature};

/// Request bodies above this size are rejected outright.
const MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

/// Shared state for the HTTP server.
pub struct AppState {
    pub store: Arc<FeatureStore>,
}

/// Response body for /ingest.
#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub success: bool,
    pub message: String,
    pub total_features: usize,
    pub processed_features: usize,
    pub errors: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

impl From<IngestSummary> for IngestResponse {
    fn from(summary: IngestSummary) -> Self {
        Self {
            success: true,
            message: format!(
                "Successfully processed {} features",
                summary.processed_features
            ),
            total_features: summary.total_features,
            processed_features: summary.processed_features,
            errors: summary.errors,
            timestamp: summary.timestamp,
        }
    }
}

/// Body returned for request-level failures.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

/// Response for /features/count.
#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: i64,
}

/// Query parameters for /features.
#[derive(Debug, Deserialize)]
pub struct FeatureQuery {
    pub geometry_type: String,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

/// Response for /features.
#[derive(Debug, Serialize)]
pub struct FeatureQueryResponse {
    pub features: Vec<StoredFeature>,
    pub total_count: usize,
    pub geometry_type: String,
    pub limit: i64,
}

/// POST /ingest - Validate and persist a FeatureCollection
async fn ingest_handler(
    Extension(state): Extension<Arc<AppState>>,
    request: Request,
) -> Response {
    let payload = match read_payload(request).await {
        Ok(payload) => payload,
        Err(e) => return error_response(e),
    };

    let raw: serde_json::Value = match serde_json::from_slice(&payload) {
        Ok(raw) => raw,
        Err(e) => {
            return error_response(GeoError::Decode(format!(
                "request body is not valid JSON: {}",
                e
            )))
        }
    };

    let pipeline = IngestionPipeline::new(state.store.clone());
    match pipeline.ingest(&raw).await {
        Ok(summary) => {
            info!(
                total = summary.total_features,
                processed = summary.processed_features,
                failed = summary.errors.len(),
                "Ingest request completed"
            );
            (StatusCode::OK, Json(IngestResponse::from(summary))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Ingest request failed");
            error_response(e)
        }
    }
}

/// Read the FeatureCollection bytes from either a multipart file upload
/// or the raw request body.
async fn read_payload(request: Request) -> Result<Bytes, GeoError> {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
        .to_string();

    if content_type.starts_with("multipart/form-data") {
        let mut multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| GeoError::Decode(format!("invalid multipart upload: {}", e)))?;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| GeoError::Decode(format!("invalid multipart upload: {}", e)))?
        {
            if field.file_name().is_some() || field.name() == Some("file") {
                return field
                    .bytes()
                    .await
                    .map_err(|e| GeoError::Decode(format!("failed to read upload: {}", e)));
            }
        }

        Err(GeoError::Decode("multipart upload contained no file".into()))
    } else {
        axum::body::to_bytes(request.into_body(), MAX_BODY_BYTES)
            .await
            .map_err(|e| GeoError::Decode(format!("failed to read request body: {}", e)))
    }
}

fn error_response(err: GeoError) -> Response {
    let status = StatusCode::from_u16(err.http_status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = ErrorResponse {
        success: false,
        message: err.to_string(),
    };
    (status, Json(body)).into_response()
}

/// GET /healthz - Liveness only, no store check
async fn healthz_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "geojson-ingestion".to_string(),
    })
}

/// GET /features/count - Total persisted features
async fn count_handler(Extension(state): Extension<Arc<AppState>>) -> impl IntoResponse {
    Json(CountResponse {
        count: state.store.feature_count().await,
    })
}

/// GET /features - Recent features of one geometry type
async fn features_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<FeatureQuery>,
) -> impl IntoResponse {
    let features = state
        .store
        .features_by_type(&query.geometry_type, query.limit)
        .await;

    Json(FeatureQueryResponse {
        total_count: features.len(),
        features,
        geometry_type: query.geometry_type,
        limit: query.limit,
    })
}

/// Build the HTTP router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ingest", post(ingest_handler))
        .route("/healthz", get(healthz_handler))
        .route("/features/count", get(count_handler))
        .route("/features", get(features_handler))
        .layer(TraceLayer::new_for_http())
        .layer(Extension(state))
}

/// Start the HTTP server and disconnect the store on shutdown.
pub async fn start_server(state: Arc<AppState>, port: u16) -> anyhow::Result<()> {
    let store = state.store.clone();
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(port = port, "Starting ingestion HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_healthz_handler() {
        let response = healthz_handler().await;
        let Json(body) = response;
        assert_eq!(body.status, "healthy");
        assert_eq!(body.service, "geojson-ingestion");
    }

    #[test]
    fn test_ingest_response_from_summary() {
        let summary = IngestSummary {
            total_features: 3,
            processed_features: 2,
            errors: vec!["feature 2: unsupported geometry type: Circle".into()],
            timestamp: Utc::now(),
        };

        let response = IngestResponse::from(summary);
        assert!(response.success);
        assert_eq!(response.message, "Successfully processed 2 features");
        assert_eq!(response.total_features, 3);
        assert_eq!(response.errors.len(), 1);
    }
}
