/// HTTP API поверх обученного пайплайна

use std::sync::Arc;

use axum::{
    extract::State,
    http::{Method, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::pipeline::StressPipeline;
use crate::preprocessing::FeatureSchema;
use crate::types::{AlignedFeatures, EvaluationReport, PredictionOutput, RawExample};

/// После обучения пайплайн неизменяем, блокировки не нужны
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<StressPipeline>,
}

pub fn router(pipeline: Arc<StressPipeline>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/schema", get(schema))
        .route("/api/report", get(report))
        .route("/api/align", post(align))
        .route("/api/predict", post(predict))
        .layer(cors)
        .with_state(AppState { pipeline })
}

async fn root(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Growing Stress ML API",
        "version": env!("CARGO_PKG_VERSION"),
        "model": state.pipeline.model_name(),
    }))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn schema(State(state): State<AppState>) -> Json<FeatureSchema> {
    Json(state.pipeline.schema().clone())
}

async fn report(State(state): State<AppState>) -> Json<EvaluationReport> {
    Json(state.pipeline.report().clone())
}

async fn align(
    State(state): State<AppState>,
    Json(example): Json<RawExample>,
) -> Json<AlignedFeatures> {
    Json(state.pipeline.align(&example))
}

async fn predict(
    State(state): State<AppState>,
    Json(example): Json<RawExample>,
) -> Result<Json<PredictionOutput>, (StatusCode, String)> {
    tracing::info!("Predict request: {} fields", example.len());

    state.pipeline.predict(&example).map(Json).map_err(|e| {
        tracing::warn!("Prediction failed: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Prediction error: {}", e),
        )
    })
}
