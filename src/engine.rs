use crate::types::SentimentResult;
use anyhow::Result;
use async_trait::async_trait;

/// Text in, one sentiment out. Shared by the JSON API and the form.
#[async_trait]
pub trait Engine {
    async fn classify(&self, text: &str) -> Result<SentimentResult>;
}
