//! Sentiment classifier boundary and the TEI-backed implementation.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SentimentError;
use crate::types::{Classification, SentimentLabel};

/// Maps one piece of text to a sentiment label.
///
/// Implementations are loaded once per process and shared read-only, so
/// they must tolerate concurrent calls.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<Classification, SentimentError>;
}

/// Truncate `text` to at most `max_chars` characters on a char boundary.
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Client for a Text Embeddings Inference server hosting a
/// sequence-classification model (e.g. `distilbert-base-uncased-finetuned-sst-2-english`).
pub struct TeiClassifier {
    client: reqwest::Client,
    url: String,
}

#[derive(Serialize)]
struct PredictRequest<'a> {
    inputs: &'a str,
    truncate: bool,
}

#[derive(Debug, Deserialize)]
struct Prediction {
    label: String,
    score: f32,
}

impl TeiClassifier {
    /// Create a new `TeiClassifier` against `{tei_url}/predict`.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(tei_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, SentimentError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            url: format!("{}/predict", tei_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl Classifier for TeiClassifier {
    /// Classify one text and return the highest-scoring prediction.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::Classifier`] if the request fails, the server
    /// answers with a non-2xx status, or the label is not a known sentiment.
    async fn classify(&self, text: &str) -> Result<Classification, SentimentError> {
        let request = PredictRequest {
            inputs: text,
            truncate: true,
        };
        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| SentimentError::Classifier(format!("TEI request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SentimentError::Classifier(format!(
                "TEI returned status {status}: {}",
                body.trim()
            )));
        }

        let predictions: Vec<Prediction> = response
            .json()
            .await
            .map_err(|e| SentimentError::Classifier(format!("TEI response parse error: {e}")))?;

        let best = predictions
            .into_iter()
            .max_by(|a, b| a.score.total_cmp(&b.score))
            .ok_or_else(|| SentimentError::Classifier("TEI returned no predictions".to_string()))?;

        let label = SentimentLabel::from_model_label(&best.label).ok_or_else(|| {
            SentimentError::Classifier(format!("unexpected classifier label '{}'", best.label))
        })?;

        Ok(Classification {
            label,
            score: best.score,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::truncate_chars;

    #[test]
    fn truncate_leaves_short_text_untouched() {
        assert_eq!(truncate_chars("short", 10), "short");
    }

    #[test]
    fn truncate_cuts_at_char_count() {
        assert_eq!(truncate_chars("abcdef", 3), "abc");
    }

    #[test]
    fn truncate_respects_multibyte_boundaries() {
        assert_eq!(truncate_chars("héllo wörld", 2), "hé");
        assert_eq!(truncate_chars("😀😀😀", 1), "😀");
    }

    #[test]
    fn truncate_exact_length_is_identity() {
        assert_eq!(truncate_chars("abc", 3), "abc");
    }
}
