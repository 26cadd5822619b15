//! End-to-end video reception analysis.

use std::time::Duration;

use crate::aggregation::Aggregator;
use crate::error::SentimentError;
use crate::retrieval::retrieve;
use crate::sources::CommentSource;
use crate::types::{CommentBatch, SentimentVerdict};

/// Comments collected for a video and the verdict computed over them.
#[derive(Debug, Clone)]
pub struct VideoReception {
    pub batch: CommentBatch,
    pub verdict: SentimentVerdict,
}

/// Run retrieval and aggregation back to back for one video.
///
/// The batch is rendered to text and handed to the aggregator exactly as an
/// orchestrator would pass one tool's output to the next, so the verdict
/// matches what the two tools produce when chained.
///
/// # Errors
///
/// Returns the first [`SentimentError`] from either stage.
pub async fn analyze_video(
    source: &dyn CommentSource,
    aggregator: &Aggregator,
    link: &str,
    max_comments: usize,
    fetch_timeout: Duration,
) -> Result<VideoReception, SentimentError> {
    let batch = retrieve(source, link, max_comments, fetch_timeout).await?;
    let verdict = aggregator.aggregate(&batch.render()).await?;

    tracing::info!(
        link,
        comments = batch.len(),
        overall = %verdict.overall(),
        "video reception analyzed"
    );

    Ok(VideoReception { batch, verdict })
}
