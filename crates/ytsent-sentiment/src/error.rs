use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SentimentError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid video link \"{link}\": {reason}")]
    InvalidLink { link: String, reason: String },

    #[error("YouTube API error {status} ({reason}): {message}")]
    YouTube {
        status: u16,
        reason: String,
        message: String,
    },

    #[error("comment source error: {0}")]
    Source(String),

    #[error("classifier error: {0}")]
    Classifier(String),

    #[error("{operation} timed out after {}s", after.as_secs())]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    #[error("missing credential: {0}")]
    MissingCredential(&'static str),
}

impl SentimentError {
    /// `true` when the failure came from an expired deadline rather than the
    /// collaborator itself.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, SentimentError::Timeout { .. })
    }
}
