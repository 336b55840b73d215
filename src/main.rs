use axum::routing::get;
use axum_prometheus::PrometheusMetricLayer;
use clap::Parser;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use feedback_sentiment::AppState;
use feedback_sentiment::api;
use feedback_sentiment::config::ApiConfig;
use feedback_sentiment::distilbert_engine::{DistilBertConfig, DistilBertEngine};
use feedback_sentiment::telemetry::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ApiConfig::parse();
    init_tracing(config.logging.log_format);
    tracing::info!("Starting sentiment API with config: {:?}", config);

    // Load failures end the process before anything is bound.
    tracing::info!("Loading DistilBERT model...");
    let engine = DistilBertEngine::new(DistilBertConfig::from(&config.model)).await?;
    tracing::info!("Model loaded successfully");

    let mut app = api::router(AppState::new(Arc::new(engine)));

    if config.metrics {
        let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();
        app = app
            .route("/metrics", get(|| async move { metric_handle.render() }))
            .layer(prometheus_layer);
        tracing::info!("Serving Prometheus metrics on /metrics");
    }

    let app = app.layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(&config.server_address()).await?;
    tracing::info!("Server running on http://{}", config.server_address());

    axum::serve(listener, app).await?;
    Ok(())
}
