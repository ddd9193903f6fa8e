//! Vartha Server
//!
//! Classifies Telugu news text into one of five categories. Model artifacts
//! are loaded once at startup; requests then run against the read-only
//! registry in parallel.

use anyhow::Result;
use clap::Parser;
use metrics_exporter_prometheus::PrometheusHandle;
use std::net::SocketAddr;
use tracing::{info, warn};
use vartha_classifiers::ModelRegistry;
use vartha_server::{build_app, run_server, AppState, Cli, ServiceConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    info!("Starting Vartha classification service");

    let config = ServiceConfig::load(&cli)?;
    info!("Configuration loaded successfully");
    info!("Models directory: {}", config.artifacts.models_dir.display());
    info!("Ensemble members: {}", config.artifacts.classifiers.len());
    info!("CORS origins: {:?}", config.cors_origins);

    let metrics_handle = init_metrics()?;

    // Artifact loading reads and parses files; keep it off the async workers
    info!("Loading model artifacts...");
    let artifacts = config.artifacts.clone();
    let registry = tokio::task::spawn_blocking(move || ModelRegistry::load(&artifacts)).await?;

    if registry.is_ready() {
        info!("Models loaded ({}): {:?}", registry.status(), registry.model_names());
    } else {
        warn!("Vectorizer or label encoder missing, /classify will return 503");
    }

    let state = AppState::new(registry, Some(metrics_handle))?;
    let app = build_app(state, &config.cors_origins);

    let addr: SocketAddr = format!("{}:{}", config.listen, config.port).parse()?;
    run_server(app, addr).await
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("vartha=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("vartha=info,tower_http=warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Install the Prometheus recorder and describe the service metrics
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "vartha_requests_total",
        "Total number of classification requests received"
    );
    metrics::describe_counter!(
        "vartha_classifications_total",
        "Successful classifications by path (ensemble or fallback)"
    );
    metrics::describe_counter!(
        "vartha_model_skips_total",
        "Ensemble members skipped for failing or returning a malformed vector"
    );
    metrics::describe_counter!("vartha_errors_total", "Unexpected errors by kind");
    metrics::describe_histogram!(
        "vartha_classify_latency_us",
        metrics::Unit::Microseconds,
        "End-to-end classification latency in microseconds"
    );

    info!("Metrics exporter initialized");
    Ok(handle)
}
