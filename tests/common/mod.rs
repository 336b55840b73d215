use anyhow::Result;
use async_trait::async_trait;
use axum::body::Body;
use feedback_sentiment::AppState;
use feedback_sentiment::engine::Engine;
use feedback_sentiment::types::{SentimentLabel, SentimentResult};
use std::sync::Arc;

/// Text that makes [`KeywordEngine`] fail, standing in for a model error.
pub const FAILING_TEXT: &str = "<<inference failure>>";

/// Deterministic stand-in for the model: negative when the text mentions
/// "terrible", positive otherwise.
pub struct KeywordEngine;

#[async_trait]
impl Engine for KeywordEngine {
    async fn classify(&self, text: &str) -> Result<SentimentResult> {
        if text == FAILING_TEXT {
            anyhow::bail!("forward pass failed");
        }
        if text.to_lowercase().contains("terrible") {
            Ok(SentimentResult {
                label: SentimentLabel::Negative,
                score: 0.9876,
            })
        } else {
            Ok(SentimentResult {
                label: SentimentLabel::Positive,
                score: 0.9991,
            })
        }
    }
}

pub fn test_state() -> AppState {
    AppState::new(Arc::new(KeywordEngine))
}

pub async fn body_bytes(body: Body) -> Vec<u8> {
    axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body")
        .to_vec()
}
