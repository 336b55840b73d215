//! Sentiment classification of customer feedback with a pretrained
//! DistilBERT SST-2 model, served as a JSON API and as an HTML form.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod distilbert_engine;
pub mod engine;
pub mod error;
pub mod form;
pub mod telemetry;
pub mod types;

use engine::Engine;

/// Router state: the engine loaded at startup, shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<dyn Engine + Send + Sync>,
}

impl AppState {
    pub fn new(engine: Arc<dyn Engine + Send + Sync>) -> Self {
        Self { engine }
    }
}
