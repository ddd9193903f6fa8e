//! HTTP routes and handlers

use crate::server::error::AppError;
use crate::state::AppState;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::debug;
use vartha_core::{Category, ClassificationResult};

/// Body of `POST /classify`
#[derive(Debug, Serialize, Deserialize)]
pub struct ClassifyRequest {
    pub text: String,
}

/// Successful classification
#[derive(Debug, Serialize, Deserialize)]
pub struct ClassifyResponse {
    pub category_english: String,
    pub category_telugu: String,
    pub confidence: f32,
    pub all_probabilities: BTreeMap<String, f32>,
}

impl From<ClassificationResult> for ClassifyResponse {
    fn from(result: ClassificationResult) -> Self {
        Self {
            category_english: result.display.english,
            category_telugu: result.display.telugu,
            confidence: result.confidence,
            all_probabilities: result.all_probabilities,
        }
    }
}

pub async fn root(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "message": "Telugu Text Classification API",
        "status": "active",
        "models_loaded": state.models_loaded(),
    }))
}

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "models_loaded": state.models_loaded(),
    }))
}

/// Category table for client-side rendering; independent of load state
pub async fn categories() -> Json<Value> {
    Json(json!({ "categories": Category::table() }))
}

pub async fn classify(
    State(state): State<AppState>,
    Json(request): Json<ClassifyRequest>,
) -> Result<Json<ClassifyResponse>, AppError> {
    metrics::counter!("vartha_requests_total").increment(1);
    let start = Instant::now();

    // Vectorizing and model forward passes are CPU-bound
    let pipeline = state.pipeline.clone();
    let result = tokio::task::spawn_blocking(move || pipeline.classify(&request.text)).await??;

    let elapsed = start.elapsed();
    metrics::histogram!("vartha_classify_latency_us").record(elapsed.as_micros() as f64);
    metrics::counter!("vartha_classifications_total", "path" => result.source.as_str())
        .increment(1);

    debug!(
        "Classified as {} ({:.3}) via {} in {:?}",
        result.category,
        result.confidence,
        result.source.as_str(),
        elapsed
    );

    Ok(Json(result.into()))
}

/// Prometheus text exposition
pub async fn metrics(State(state): State<AppState>) -> String {
    state
        .metrics
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default()
}
