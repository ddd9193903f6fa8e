use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use vartha_classifiers::{InferencePipeline, ModelRegistry};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Inference over the read-only model registry
    pub pipeline: InferencePipeline,

    /// Prometheus renderer, absent when no recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(registry: ModelRegistry, metrics: Option<PrometheusHandle>) -> vartha_core::Result<Self> {
        Ok(Self {
            pipeline: InferencePipeline::new(Arc::new(registry))?,
            metrics,
        })
    }

    /// Whether the vectorizer and label encoder are loaded
    pub fn models_loaded(&self) -> bool {
        self.pipeline.is_ready()
    }
}
