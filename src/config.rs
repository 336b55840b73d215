use clap::{Args, Parser, ValueEnum};
use std::path::PathBuf;

use crate::distilbert_engine::DistilBertConfig;

/// JSON sentiment API: `POST /analyze`.
#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct ApiConfig {
    /// Server host to bind to
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Server port to bind to
    #[arg(long, env = "PORT", default_value = "8000")]
    pub port: u16,

    /// Serve Prometheus metrics on /metrics
    #[arg(long, env = "METRICS")]
    pub metrics: bool,

    #[command(flatten)]
    pub model: ModelArgs,

    #[command(flatten)]
    pub logging: LogArgs,
}

/// Interactive feedback form.
#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct FormConfig {
    /// Server host to bind to
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Server port to bind to
    #[arg(long, env = "PORT", default_value = "7860")]
    pub port: u16,

    #[command(flatten)]
    pub model: ModelArgs,

    #[command(flatten)]
    pub logging: LogArgs,
}

#[derive(Debug, Clone, Args)]
pub struct ModelArgs {
    /// Model ID from Hugging Face Hub
    #[arg(
        long,
        env = "MODEL_ID",
        default_value = "distilbert-base-uncased-finetuned-sst-2-english"
    )]
    pub model_id: String,

    /// Local path to model directory, takes precedence over --model-id
    #[arg(long, env = "MODEL_PATH")]
    pub model_path: Option<PathBuf>,

    /// Model revision/branch on Hugging Face
    #[arg(long, env = "MODEL_REVISION", default_value = "main")]
    pub model_revision: String,

    /// Hub repository to take tokenizer.json from when the model repo has none
    #[arg(long, env = "TOKENIZER_ID", default_value = "distilbert-base-uncased")]
    pub tokenizer_id: String,

    /// Use PyTorch weights instead of safetensors
    #[arg(long, env = "USE_PTH")]
    pub use_pth: bool,

    /// Run on CPU instead of GPU
    #[arg(long, env = "CPU_ONLY")]
    pub cpu_only: bool,

    /// Maximum sequence length allowed
    #[arg(long, env = "MAX_SEQUENCE_LENGTH", default_value = "512")]
    pub max_sequence_length: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Args)]
pub struct LogArgs {
    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value = "text")]
    pub log_format: LogFormat,
}

impl From<&ModelArgs> for DistilBertConfig {
    fn from(args: &ModelArgs) -> Self {
        Self {
            model_id: args.model_id.clone(),
            model_path: args.model_path.clone(),
            revision: args.model_revision.clone(),
            tokenizer_id: args.tokenizer_id.clone(),
            use_pth: args.use_pth,
            cpu: args.cpu_only,
            max_sequence_length: args.max_sequence_length,
        }
    }
}

impl ApiConfig {
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl FormConfig {
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
