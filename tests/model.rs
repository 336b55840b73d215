//! End-to-end checks against the real SST-2 checkpoint. These download the
//! weights from the Hugging Face Hub, so they only run with `--ignored`.

use anyhow::Result;
use feedback_sentiment::distilbert_engine::{DistilBertConfig, DistilBertEngine};
use feedback_sentiment::engine::Engine;
use feedback_sentiment::types::SentimentLabel;

async fn load_engine() -> Result<DistilBertEngine> {
    DistilBertEngine::new(DistilBertConfig {
        cpu: true,
        ..Default::default()
    })
    .await
}

#[tokio::test]
#[ignore = "downloads model weights from the Hugging Face Hub"]
async fn sentiment_examples() -> Result<()> {
    let engine = load_engine().await?;

    let res = engine.classify("I love this product!").await?;
    assert_eq!(res.label, SentimentLabel::Positive);
    assert!(res.score > 0.9, "score was {}", res.score);

    let res = engine.classify("This is terrible.").await?;
    assert_eq!(res.label, SentimentLabel::Negative);
    assert!(res.score > 0.9, "score was {}", res.score);
    Ok(())
}

#[tokio::test]
#[ignore = "downloads model weights from the Hugging Face Hub"]
async fn sentiment_is_deterministic() -> Result<()> {
    let engine = load_engine().await?;

    let texts = [
        "Great service, highly recommend!",
        "The staff was rude and unhelpful.",
        "Just an ordinary day.",
        "",
    ];
    for text in texts {
        let first = engine.classify(text).await?;
        let second = engine.classify(text).await?;
        assert_eq!(first, second);
        assert!((0.0..=1.0).contains(&first.score));
    }
    Ok(())
}

#[tokio::test]
#[ignore = "downloads model weights from the Hugging Face Hub"]
async fn long_input_is_truncated() -> Result<()> {
    let engine = load_engine().await?;

    let text = "This product is wonderful. ".repeat(400);
    let res = engine.classify(&text).await?;
    assert_eq!(res.label, SentimentLabel::Positive);
    Ok(())
}
