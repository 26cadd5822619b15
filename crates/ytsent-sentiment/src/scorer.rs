//! Word-lexicon sentiment classifier for video comments.
//!
//! Used when no model server is configured. It always commits to a label,
//! like a binary sentiment checkpoint would.

use async_trait::async_trait;

use crate::classifier::Classifier;
use crate::error::SentimentError;
use crate::types::{Classification, SentimentLabel};

/// General-purpose comment lexicon.
///
/// Keys are lowercase single words. Values in `(0.0, 1.0]` are positive,
/// in `[-1.0, 0.0)` are negative. The final score is clamped to `[-1.0, 1.0]`.
pub(crate) const LEXICON: &[(&str, f32)] = &[
    // Positive
    ("amazing", 0.5),
    ("awesome", 0.5),
    ("beautiful", 0.4),
    ("best", 0.5),
    ("brilliant", 0.5),
    ("enjoyed", 0.4),
    ("excellent", 0.5),
    ("fantastic", 0.5),
    ("fun", 0.3),
    ("funny", 0.3),
    ("good", 0.3),
    ("great", 0.4),
    ("helpful", 0.4),
    ("incredible", 0.5),
    ("like", 0.2),
    ("love", 0.5),
    ("loved", 0.5),
    ("masterpiece", 0.6),
    ("nice", 0.3),
    ("perfect", 0.5),
    ("recommend", 0.4),
    ("thanks", 0.3),
    ("useful", 0.3),
    ("wonderful", 0.5),
    // Negative
    ("annoying", -0.4),
    ("awful", -0.6),
    ("bad", -0.4),
    ("boring", -0.4),
    ("clickbait", -0.5),
    ("disappointed", -0.5),
    ("disappointing", -0.5),
    ("dislike", -0.4),
    ("fake", -0.4),
    ("hate", -0.6),
    ("horrible", -0.6),
    ("misleading", -0.5),
    ("poor", -0.4),
    ("scam", -0.6),
    ("terrible", -0.6),
    ("trash", -0.5),
    ("useless", -0.5),
    ("waste", -0.5),
    ("worse", -0.4),
    ("worst", -0.6),
    ("wrong", -0.3),
];

/// Score a text string using the comment lexicon.
///
/// Splits text into lowercase words, sums matching weights, and clamps
/// the result to `[-1.0, 1.0]`. Returns `0.0` for empty or unknown text.
#[must_use]
pub fn lexicon_score(text: &str) -> f32 {
    let mut score = 0.0_f32;
    for word in text.split_whitespace() {
        let w = word
            .trim_matches(|c: char| !c.is_alphabetic())
            .to_lowercase();
        for &(lex_word, weight) in LEXICON {
            if w == lex_word {
                score += weight;
                break;
            }
        }
    }
    score.clamp(-1.0, 1.0)
}

/// [`Classifier`] backed by [`lexicon_score`].
///
/// Non-negative scores map to [`SentimentLabel::Positive`]. The reported
/// confidence grows with the magnitude of the score.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconClassifier;

impl LexiconClassifier {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Classifier for LexiconClassifier {
    async fn classify(&self, text: &str) -> Result<Classification, SentimentError> {
        let score = lexicon_score(text);
        let label = if score < 0.0 {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Positive
        };
        Ok(Classification {
            label,
            score: 0.5 + score.abs() / 2.0,
        })
    }
}
