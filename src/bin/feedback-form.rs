use clap::Parser;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use feedback_sentiment::AppState;
use feedback_sentiment::config::FormConfig;
use feedback_sentiment::distilbert_engine::{DistilBertConfig, DistilBertEngine};
use feedback_sentiment::form;
use feedback_sentiment::telemetry::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = FormConfig::parse();
    init_tracing(config.logging.log_format);
    tracing::info!("Starting feedback form with config: {:?}", config);

    tracing::info!("Loading DistilBERT model...");
    let engine = DistilBertEngine::new(DistilBertConfig::from(&config.model)).await?;
    tracing::info!("Model loaded successfully");

    let app = form::router(AppState::new(Arc::new(engine))).layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(&config.server_address()).await?;
    tracing::info!("Form running on http://{}", config.server_address());

    axum::serve(listener, app).await?;
    Ok(())
}
