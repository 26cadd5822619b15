//! Majority-vote sentiment aggregation over newline-separated comments.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt, TryStreamExt};
use regex::Regex;
use ytsent_core::PreamblePolicy;

use crate::classifier::{truncate_chars, Classifier};
use crate::error::SentimentError;
use crate::types::{SentimentLabel, SentimentVerdict, BATCH_HEADER_PREFIX, BATCH_HEADER_SUFFIX};

pub const DEFAULT_CLASSIFY_CONCURRENCY: usize = 4;
pub const DEFAULT_MAX_INPUT_CHARS: usize = 2000;
pub const DEFAULT_CLASSIFY_TIMEOUT: Duration = Duration::from_secs(10);

/// Decides which non-blank lines reach the classifier.
#[derive(Debug, Clone)]
pub enum LineFilter {
    /// Classify every non-blank line, including retrieval headers.
    KeepAll,
    /// Drop lines that match any of the given preamble patterns.
    SkipPreamble(Vec<Regex>),
}

impl LineFilter {
    /// Filter that drops the header line written by comment retrieval.
    ///
    /// # Panics
    ///
    /// Only if the escaped header constants stop forming a valid regex.
    #[must_use]
    pub fn skip_retrieval_header() -> Self {
        let pattern = format!(
            r"^{}\d+{}$",
            regex::escape(BATCH_HEADER_PREFIX),
            regex::escape(BATCH_HEADER_SUFFIX)
        );
        LineFilter::SkipPreamble(vec![Regex::new(&pattern).expect("valid header regex")])
    }

    #[must_use]
    pub fn from_policy(policy: PreamblePolicy) -> Self {
        match policy {
            PreamblePolicy::Skip => Self::skip_retrieval_header(),
            PreamblePolicy::Keep => LineFilter::KeepAll,
        }
    }

    fn admits(&self, line: &str) -> bool {
        match self {
            LineFilter::KeepAll => true,
            LineFilter::SkipPreamble(patterns) => {
                let trimmed = line.trim();
                !patterns.iter().any(|re| re.is_match(trimmed))
            }
        }
    }
}

impl Default for LineFilter {
    fn default() -> Self {
        Self::skip_retrieval_header()
    }
}

/// Classifies each comment line and tallies a [`SentimentVerdict`].
pub struct Aggregator {
    classifier: Arc<dyn Classifier>,
    filter: LineFilter,
    max_input_chars: usize,
    concurrency: usize,
    timeout: Duration,
}

impl Aggregator {
    #[must_use]
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self {
            classifier,
            filter: LineFilter::default(),
            max_input_chars: DEFAULT_MAX_INPUT_CHARS,
            concurrency: DEFAULT_CLASSIFY_CONCURRENCY,
            timeout: DEFAULT_CLASSIFY_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_line_filter(mut self, filter: LineFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Longest input, in characters, handed to the classifier. Longer lines
    /// are truncated rather than rejected.
    #[must_use]
    pub fn with_max_input_chars(mut self, max_input_chars: usize) -> Self {
        self.max_input_chars = max_input_chars.max(1);
        self
    }

    /// Maximum number of classifications in flight at once.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Deadline applied to each individual classification.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Lines of `comments` that will be classified, in input order.
    #[must_use]
    pub fn classifiable_lines<'t>(&self, comments: &'t str) -> Vec<&'t str> {
        comments
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .filter(|line| !line.trim().is_empty())
            .filter(|line| self.filter.admits(line))
            .collect()
    }

    /// Classify every admitted line of `comments` and tally the labels.
    ///
    /// Blank lines never reach the classifier. A failure on any line aborts
    /// the whole batch; no partial tally is returned.
    ///
    /// # Errors
    ///
    /// Returns the first classifier [`SentimentError`], or
    /// [`SentimentError::Timeout`] when a single classification overruns.
    pub async fn aggregate(&self, comments: &str) -> Result<SentimentVerdict, SentimentError> {
        let lines = self.classifiable_lines(comments);
        let line_count = lines.len();

        let pending: Vec<_> = lines
            .into_iter()
            .map(|line| {
                classify_line(
                    Arc::clone(&self.classifier),
                    truncate_chars(line, self.max_input_chars).to_owned(),
                    self.timeout,
                )
            })
            .collect();

        let labels: Vec<SentimentLabel> = stream::iter(pending)
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        let verdict = SentimentVerdict::from_labels(labels);
        tracing::info!(
            lines = line_count,
            positive = verdict.positive_count,
            negative = verdict.negative_count,
            overall = %verdict.overall(),
            "aggregated comment sentiment"
        );
        Ok(verdict)
    }
}

/// One classification under its own deadline. Owns its inputs so the
/// returned future is `Send + 'static`.
async fn classify_line(
    classifier: Arc<dyn Classifier>,
    input: String,
    timeout: Duration,
) -> Result<SentimentLabel, SentimentError> {
    let classification = tokio::time::timeout(timeout, classifier.classify(&input))
        .await
        .map_err(|_| SentimentError::Timeout {
            operation: "sentiment classification",
            after: timeout,
        })?
        .inspect_err(|e| tracing::warn!(error = %e, "classification failed"))?;
    Ok(classification.label)
}

#[cfg(test)]
#[path = "aggregation_test.rs"]
mod tests;
