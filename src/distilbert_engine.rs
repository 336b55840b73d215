use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use candle_core::utils::{cuda_is_available, metal_is_available};
use candle_core::{DType, Device, IndexOp, Tensor};
use candle_nn::ops::softmax;
use candle_nn::{Linear, Module, VarBuilder, linear};
use candle_transformers::models::distilbert::{Config as DistilBertModelConfig, DistilBertModel};
use hf_hub::{Repo, RepoType, api::tokio::Api};
use metrics::histogram;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokenizers::{Tokenizer, TruncationParams};

use crate::engine::Engine;
use crate::types::{SentimentLabel, SentimentResult};

/// DistilBERT encoder with the SST-2 sequence-classification head.
///
/// Loaded once; `classify` calls share the weights without locking.
pub struct DistilBertEngine {
    classifier: Arc<SequenceClassifier>,
}

struct SequenceClassifier {
    model: DistilBertModel,
    pre_classifier: Linear,
    classifier: Linear,
    tokenizer: Tokenizer,
    device: Device,
    // Indexed by class id.
    labels: Vec<SentimentLabel>,
}

#[derive(Debug, Clone)]
pub struct DistilBertConfig {
    pub model_id: String,
    pub model_path: Option<PathBuf>,
    pub revision: String,
    pub tokenizer_id: String,
    pub use_pth: bool,
    pub cpu: bool,
    pub max_sequence_length: usize,
}

impl Default for DistilBertConfig {
    fn default() -> Self {
        Self {
            model_id: "distilbert-base-uncased-finetuned-sst-2-english".to_string(),
            model_path: None,
            revision: "main".to_string(),
            tokenizer_id: "distilbert-base-uncased".to_string(),
            use_pth: false,
            cpu: false,
            max_sequence_length: 512,
        }
    }
}

/// The parts of `config.json` the classification head needs.
#[derive(Debug, Deserialize)]
struct HeadConfig {
    dim: usize,
    #[serde(default)]
    id2label: HashMap<String, String>,
}

struct ModelFiles {
    config: PathBuf,
    tokenizer: PathBuf,
    weights: PathBuf,
}

impl DistilBertEngine {
    fn device(cpu: bool) -> Result<Device> {
        if cpu {
            Ok(Device::Cpu)
        } else if metal_is_available() {
            tracing::info!("Using metal acceleration");
            Ok(Device::new_metal(0)?)
        } else if cuda_is_available() {
            tracing::info!("Using CUDA GPU acceleration");
            Ok(Device::new_cuda(0)?)
        } else {
            tracing::info!(
                "CUDA not available, running on CPU. To run on GPU, build with `--features cuda`"
            );
            Ok(Device::Cpu)
        }
    }

    #[tracing::instrument(skip(config), fields(model_id = %config.model_id, cpu = config.cpu))]
    pub async fn new(config: DistilBertConfig) -> Result<Self> {
        let device = Self::device(config.cpu)?;
        let files = Self::fetch_files(&config).await?;

        let model_config = std::fs::read_to_string(&files.config)
            .with_context(|| format!("Failed to read {}", files.config.display()))?;
        let tokenizer = Tokenizer::from_file(&files.tokenizer)
            .map_err(|e| anyhow::anyhow!("Tokenizer error: {e}"))?;

        let vb = if config.use_pth {
            VarBuilder::from_pth(&files.weights, DType::F32, &device)?
        } else {
            unsafe { VarBuilder::from_mmaped_safetensors(&[files.weights], DType::F32, &device)? }
        };

        let classifier = SequenceClassifier::load(
            vb,
            &model_config,
            tokenizer,
            config.max_sequence_length,
            device,
        )?;

        Ok(Self {
            classifier: Arc::new(classifier),
        })
    }

    // Get files from either the HuggingFace API, or from a specified local directory
    async fn fetch_files(config: &DistilBertConfig) -> Result<ModelFiles> {
        let weights_name = if config.use_pth {
            "pytorch_model.bin"
        } else {
            "model.safetensors"
        };

        match &config.model_path {
            Some(base_path) => {
                if !base_path.is_dir() {
                    bail!("Model path {} is not a directory.", base_path.display());
                }

                let tokenizer = base_path.join("tokenizer.json");
                let tokenizer = if tokenizer.is_file() {
                    tokenizer
                } else {
                    Self::fallback_tokenizer(&Api::new()?, config).await?
                };
                Ok(ModelFiles {
                    config: base_path.join("config.json"),
                    tokenizer,
                    weights: base_path.join(weights_name),
                })
            }
            None => {
                let api = Api::new()?;
                let repo = api.repo(Repo::with_revision(
                    config.model_id.clone(),
                    RepoType::Model,
                    config.revision.clone(),
                ));
                let config_file = repo.get("config.json").await?;
                let tokenizer = match repo.get("tokenizer.json").await {
                    Ok(tokenizer) => tokenizer,
                    Err(err) => {
                        tracing::debug!(error = %err, "No tokenizer.json in model repo");
                        Self::fallback_tokenizer(&api, config).await?
                    }
                };
                let weights = repo.get(weights_name).await?;
                Ok(ModelFiles {
                    config: config_file,
                    tokenizer,
                    weights,
                })
            }
        }
    }

    async fn fallback_tokenizer(api: &Api, config: &DistilBertConfig) -> Result<PathBuf> {
        tracing::info!(tokenizer_id = %config.tokenizer_id, "Fetching tokenizer.json");
        api.model(config.tokenizer_id.clone())
            .get("tokenizer.json")
            .await
            .with_context(|| format!("No tokenizer.json in {}", config.tokenizer_id))
    }
}

impl SequenceClassifier {
    /// Builds the encoder and head from `config.json` contents and weights
    /// laid out as `distilbert.*`, `pre_classifier.*`, `classifier.*`.
    fn load(
        vb: VarBuilder,
        model_config: &str,
        mut tokenizer: Tokenizer,
        max_sequence_length: usize,
        device: Device,
    ) -> Result<Self> {
        let head_config: HeadConfig = serde_json::from_str(model_config)?;
        let model_config: DistilBertModelConfig = serde_json::from_str(model_config)?;
        let labels = label_table(&head_config.id2label)?;
        tracing::debug!(?labels, dim = head_config.dim, "Parsed model configuration");

        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: max_sequence_length,
                ..Default::default()
            }))
            .map_err(|e| anyhow::anyhow!("Tokenizer truncation error: {e}"))?;

        let model = DistilBertModel::load(vb.pp("distilbert"), &model_config)?;
        let pre_classifier = linear(head_config.dim, head_config.dim, vb.pp("pre_classifier"))?;
        let classifier = linear(head_config.dim, labels.len(), vb.pp("classifier"))?;

        Ok(Self {
            model,
            pre_classifier,
            classifier,
            tokenizer,
            device,
            labels,
        })
    }

    fn classify(&self, text: &str) -> Result<SentimentResult> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| anyhow::anyhow!("Tokenization error: {e}"))?;

        let input_ids = Tensor::new(encoding.get_ids(), &self.device)?.unsqueeze(0)?;
        let mask = padding_mask(encoding.get_attention_mask(), &self.device)?;

        let hidden = self.model.forward(&input_ids, &mask)?;
        let pooled = hidden.i((.., 0))?;
        let pooled = self.pre_classifier.forward(&pooled)?.relu()?;
        let logits = self.classifier.forward(&pooled)?;
        let probs = softmax(&logits, 1)?.squeeze(0)?.to_vec1::<f32>()?;

        pick(&probs, &self.labels)
    }
}

#[async_trait]
impl Engine for DistilBertEngine {
    #[tracing::instrument(skip(self, text), fields(text_len = text.len()))]
    async fn classify(&self, text: &str) -> Result<SentimentResult> {
        let classifier = Arc::clone(&self.classifier);
        let text = text.to_owned();
        let started = Instant::now();

        let result = tokio::task::spawn_blocking(move || classifier.classify(&text)).await??;

        histogram!("sentiment_inference_seconds").record(started.elapsed().as_secs_f64());
        tracing::debug!(label = %result.label, score = result.score, "Text classified");
        Ok(result)
    }
}

/// Attention mask in the encoder's convention: non-zero marks positions that
/// are excluded from attention. Shaped to broadcast over heads and queries.
fn padding_mask(attention_mask: &[u32], device: &Device) -> Result<Tensor> {
    let masked: Vec<u8> = attention_mask.iter().map(|&m| u8::from(m == 0)).collect();
    let len = masked.len();
    Ok(Tensor::from_vec(masked, (1, 1, 1, len), device)?)
}

/// Turns the `id2label` table into a class-indexed label list. The head must
/// cover exactly the two sentiment classes, ids `0..2`.
fn label_table(id2label: &HashMap<String, String>) -> Result<Vec<SentimentLabel>> {
    if id2label.len() != 2 {
        bail!(
            "Expected a two-class id2label table, found {} entries",
            id2label.len()
        );
    }

    let mut labels = vec![None; id2label.len()];
    for (id, name) in id2label {
        let id: usize = id
            .parse()
            .with_context(|| format!("Invalid class id {id:?} in id2label"))?;
        let slot = labels
            .get_mut(id)
            .with_context(|| format!("Class id {id} out of range in id2label"))?;
        *slot = Some(name.parse::<SentimentLabel>()?);
    }

    let labels: Vec<SentimentLabel> = labels.into_iter().flatten().collect();
    if labels.len() != 2 || labels[0] == labels[1] {
        bail!("id2label must name both POSITIVE and NEGATIVE, got {labels:?}");
    }
    Ok(labels)
}

/// Selects the most probable class.
fn pick(probs: &[f32], labels: &[SentimentLabel]) -> Result<SentimentResult> {
    if probs.len() != labels.len() {
        bail!(
            "Model returned {} class scores for {} labels",
            probs.len(),
            labels.len()
        );
    }

    let (index, &score) = probs
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .context("Model returned no class scores")?;

    Ok(SentimentResult {
        label: labels[index],
        score,
    })
}
