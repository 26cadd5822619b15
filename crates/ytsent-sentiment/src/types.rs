use std::fmt;

/// Header line prepended to every rendered [`CommentBatch`].
pub(crate) const BATCH_HEADER_PREFIX: &str = "These are the top ";
pub(crate) const BATCH_HEADER_SUFFIX: &str = " comments from the video:";

/// A single comment collected from a video, as returned by the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub text: String,
}

impl Comment {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Ordered comments for one video, truncated to the requested maximum.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentBatch {
    comments: Vec<Comment>,
}

impl CommentBatch {
    #[must_use]
    pub fn new(comments: Vec<Comment>) -> Self {
        Self { comments }
    }

    #[must_use]
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.comments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    /// Render the batch as the text handed to the aggregation tool:
    /// a count header followed by one comment per line.
    #[must_use]
    pub fn render(&self) -> String {
        let body = self
            .comments
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "{BATCH_HEADER_PREFIX}{}{BATCH_HEADER_SUFFIX}\n{body}",
            self.comments.len()
        )
    }
}

/// Label emitted by a classifier. There is no neutral label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentLabel {
    Positive,
    Negative,
}

impl SentimentLabel {
    /// Parse a classifier label, accepting the common spellings used by
    /// sentiment checkpoints (`POSITIVE`, `pos`, `LABEL_1`, ...).
    #[must_use]
    pub fn from_model_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_uppercase().as_str() {
            "POSITIVE" | "POS" | "LABEL_1" => Some(SentimentLabel::Positive),
            "NEGATIVE" | "NEG" | "LABEL_0" => Some(SentimentLabel::Negative),
            _ => None,
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SentimentLabel::Positive => write!(f, "POSITIVE"),
            SentimentLabel::Negative => write!(f, "NEGATIVE"),
        }
    }
}

/// Classifier output for one piece of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub label: SentimentLabel,
    /// Model confidence in `[0.0, 1.0]`. Not used for tallying.
    pub score: f32,
}

/// Overall reception derived from label counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reception {
    Positive,
    Negative,
    Neutral,
}

impl fmt::Display for Reception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reception::Positive => write!(f, "positive"),
            Reception::Negative => write!(f, "negative"),
            Reception::Neutral => write!(f, "neutral"),
        }
    }
}

/// Tally of classified lines for one aggregation call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SentimentVerdict {
    pub positive_count: usize,
    pub negative_count: usize,
}

impl SentimentVerdict {
    #[must_use]
    pub fn from_labels<I>(labels: I) -> Self
    where
        I: IntoIterator<Item = SentimentLabel>,
    {
        labels
            .into_iter()
            .fold(Self::default(), |mut verdict, label| {
                match label {
                    SentimentLabel::Positive => verdict.positive_count += 1,
                    SentimentLabel::Negative => verdict.negative_count += 1,
                }
                verdict
            })
    }

    /// Majority reception; ties (including 0/0) are neutral.
    #[must_use]
    pub fn overall(&self) -> Reception {
        match self.positive_count.cmp(&self.negative_count) {
            std::cmp::Ordering::Greater => Reception::Positive,
            std::cmp::Ordering::Less => Reception::Negative,
            std::cmp::Ordering::Equal => Reception::Neutral,
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.positive_count + self.negative_count
    }
}

impl fmt::Display for SentimentVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "The overall reception is {}. Positive comments: {}, Negative comments: {}.",
            self.overall(),
            self.positive_count,
            self.negative_count
        )
    }
}
