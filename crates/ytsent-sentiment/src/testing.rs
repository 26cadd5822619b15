//! In-memory collaborators for tests.
//! Only compiled when running tests or with the `testing` feature.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};

use crate::classifier::Classifier;
use crate::error::SentimentError;
use crate::sources::{CommentOrder, CommentSource};
use crate::types::{Classification, Comment, SentimentLabel};

/// Comment source that yields a fixed list, optionally failing partway.
pub struct StaticCommentSource {
    comments: Vec<String>,
    fail_after: Option<(usize, String)>,
    calls: AtomicUsize,
}

impl StaticCommentSource {
    pub fn new<I, S>(comments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            comments: comments.into_iter().map(Into::into).collect(),
            fail_after: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Yield an error with `message` once `count` comments have been produced.
    #[must_use]
    pub fn failing_after(mut self, count: usize, message: &str) -> Self {
        self.fail_after = Some((count, message.to_string()));
        self
    }

    /// Number of times a feed was opened.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CommentSource for StaticCommentSource {
    fn comments<'a>(
        &'a self,
        _link: &'a str,
        _order: CommentOrder,
    ) -> BoxStream<'a, Result<Comment, SentimentError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut items: Vec<Result<Comment, SentimentError>> = Vec::new();
        for (idx, text) in self.comments.iter().enumerate() {
            if let Some((count, message)) = &self.fail_after {
                if idx == *count {
                    items.push(Err(SentimentError::Source(message.clone())));
                    return stream::iter(items).boxed();
                }
            }
            items.push(Ok(Comment::new(text.clone())));
        }
        if let Some((count, message)) = &self.fail_after {
            if *count >= self.comments.len() {
                items.push(Err(SentimentError::Source(message.clone())));
            }
        }
        stream::iter(items).boxed()
    }
}

/// Comment source whose feed never yields.
pub struct PendingCommentSource;

impl CommentSource for PendingCommentSource {
    fn comments<'a>(
        &'a self,
        _link: &'a str,
        _order: CommentOrder,
    ) -> BoxStream<'a, Result<Comment, SentimentError>> {
        stream::pending().boxed()
    }
}

/// Classifier driven by an exact-text lookup table.
///
/// Unknown text is labelled with the configured default. Texts registered
/// with [`KeywordClassifier::fail_on`] produce an error instead.
pub struct KeywordClassifier {
    labels: HashMap<String, SentimentLabel>,
    failures: HashMap<String, String>,
    default: SentimentLabel,
    seen: Mutex<Vec<String>>,
}

impl KeywordClassifier {
    pub fn new(default: SentimentLabel) -> Self {
        Self {
            labels: HashMap::new(),
            failures: HashMap::new(),
            default,
            seen: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn label(mut self, text: &str, label: SentimentLabel) -> Self {
        self.labels.insert(text.to_string(), label);
        self
    }

    #[must_use]
    pub fn fail_on(mut self, text: &str, message: &str) -> Self {
        self.failures.insert(text.to_string(), message.to_string());
        self
    }

    /// Every text passed to `classify`, in call order.
    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Classifier for KeywordClassifier {
    async fn classify(&self, text: &str) -> Result<Classification, SentimentError> {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(text.to_string());
        }
        if let Some(message) = self.failures.get(text) {
            return Err(SentimentError::Classifier(message.clone()));
        }
        let label = self.labels.get(text).copied().unwrap_or(self.default);
        Ok(Classification { label, score: 0.99 })
    }
}

/// Classifier that never answers.
pub struct PendingClassifier;

#[async_trait]
impl Classifier for PendingClassifier {
    async fn classify(&self, _text: &str) -> Result<Classification, SentimentError> {
        futures::future::pending().await
    }
}
