//! HTTP API.
//!
//! Nodes POST the fixed-shape telemetry object, readers GET the retained
//! records.

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{debug, info};

use crate::store::TelemetryStore;

/// The payload shape the daemon publishes.
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryPayload {
    pub temperature: f64,
    pub humidity: f64,
    pub motion: String,
}

/// Checks payload invariants beyond JSON well-formedness.
pub fn validate(payload: &TelemetryPayload) -> Result<(), String> {
    if !payload.temperature.is_finite() {
        return Err("temperature must be a finite number".to_string());
    }
    if !payload.humidity.is_finite() {
        return Err("humidity must be a finite number".to_string());
    }
    match payload.motion.as_str() {
        "detected" | "not detected" => Ok(()),
        other => Err(format!(
            "motion must be \"detected\" or \"not detected\", got {other:?}"
        )),
    }
}

/// Creates the router with all routes.
pub fn create_router(store: Arc<TelemetryStore>) -> Router {
    Router::new()
        .route("/api/sensors", get(sensors_list).post(sensors_create))
        .route("/api/sensors/latest", get(sensors_latest))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(store)
}

/// POST /api/sensors - store one telemetry reading
async fn sensors_create(
    State(store): State<Arc<TelemetryStore>>,
    Json(payload): Json<TelemetryPayload>,
) -> Response {
    if let Err(message) = validate(&payload) {
        debug!(%message, "rejected telemetry payload");
        return (StatusCode::BAD_REQUEST, Json(json!({ "message": message }))).into_response();
    }

    let record = store.insert(payload.temperature, payload.humidity, payload.motion);
    info!(
        id = record.id,
        temperature = record.temperature,
        humidity = record.humidity,
        motion = %record.motion,
        "telemetry stored"
    );
    (StatusCode::CREATED, Json(record)).into_response()
}

/// GET /api/sensors - all retained readings, oldest first
async fn sensors_list(State(store): State<Arc<TelemetryStore>>) -> Response {
    Json(store.all()).into_response()
}

/// GET /api/sensors/latest - most recent reading
async fn sensors_latest(State(store): State<Arc<TelemetryStore>>) -> Response {
    match store.latest() {
        Some(record) => Json(record).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "no readings received yet" })),
        )
            .into_response(),
    }
}

/// GET /health - liveness probe
async fn health() -> Response {
    Json(json!({ "status": "ok" })).into_response()
}
