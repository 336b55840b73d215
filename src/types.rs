use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackRequest {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub feedback: String,
    pub sentiment: SentimentLabel,
    pub score: f32,
}

impl AnalyzeResponse {
    pub fn new(feedback: String, result: SentimentResult) -> Self {
        Self {
            feedback,
            sentiment: result.label,
            score: result.score,
        }
    }
}

/// The two classes the SST-2 head predicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SentimentLabel {
    Positive,
    Negative,
}

impl SentimentLabel {
    /// Upper-case wire form, as found in the model's `id2label` table.
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "POSITIVE",
            SentimentLabel::Negative => "NEGATIVE",
        }
    }

    /// Display form used by the form front-end: `Positive` / `Negative`.
    pub fn capitalized(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Negative => "Negative",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SentimentLabel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "POSITIVE" => Ok(SentimentLabel::Positive),
            "NEGATIVE" => Ok(SentimentLabel::Negative),
            other => anyhow::bail!("unknown sentiment label {other:?}"),
        }
    }
}

/// One classification: the dominant label and its probability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentResult {
    pub label: SentimentLabel,
    pub score: f32,
}
