//! Top-comment retrieval.

use std::time::Duration;

use futures::{StreamExt, TryStreamExt};

use crate::error::SentimentError;
use crate::sources::{CommentOrder, CommentSource};
use crate::types::CommentBatch;

/// Default cap on collected comments when the caller gives none.
pub const DEFAULT_MAX_COMMENTS: usize = 50;

/// Resolve a caller-supplied cap. Missing means `default`; zero or negative
/// means no comments.
#[must_use]
pub fn effective_max_comments(requested: Option<i64>, default: usize) -> usize {
    requested.map_or(default, |n| usize::try_from(n).unwrap_or(0))
}

/// Collect up to `max_comments` comments from `source`, most popular first.
///
/// Stops as soon as the cap is reached or the source is exhausted. A cap of
/// zero returns an empty batch without touching the source. Any source
/// failure discards everything collected so far.
///
/// # Errors
///
/// Returns the source's [`SentimentError`], or [`SentimentError::Timeout`]
/// when collection takes longer than `timeout`.
pub async fn retrieve(
    source: &dyn CommentSource,
    link: &str,
    max_comments: usize,
    timeout: Duration,
) -> Result<CommentBatch, SentimentError> {
    if max_comments == 0 {
        tracing::debug!(link, "max_comments is zero; skipping fetch");
        return Ok(CommentBatch::default());
    }

    let collect = source
        .comments(link, CommentOrder::Popular)
        .take(max_comments)
        .try_collect::<Vec<_>>();

    let comments = tokio::time::timeout(timeout, collect)
        .await
        .map_err(|_| SentimentError::Timeout {
            operation: "comment retrieval",
            after: timeout,
        })??;

    tracing::info!(link, count = comments.len(), max_comments, "retrieved comments");
    Ok(CommentBatch::new(comments))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{PendingCommentSource, StaticCommentSource};
    use crate::types::Comment;

    const LONG: Duration = Duration::from_secs(5);

    #[test]
    fn cap_resolution_clamps_non_positive_to_zero() {
        assert_eq!(effective_max_comments(None, 50), 50);
        assert_eq!(effective_max_comments(Some(7), 50), 7);
        assert_eq!(effective_max_comments(Some(0), 50), 0);
        assert_eq!(effective_max_comments(Some(-5), 50), 0);
    }

    #[tokio::test]
    async fn takes_first_n_in_source_order() {
        let source = StaticCommentSource::new(["a", "b", "c", "d"]);
        let batch = retrieve(&source, "link", 3, LONG).await.expect("retrieve");
        assert_eq!(
            batch.comments(),
            &[Comment::new("a"), Comment::new("b"), Comment::new("c")]
        );
        assert_eq!(
            batch.render(),
            "These are the top 3 comments from the video:\na\nb\nc"
        );
    }

    #[tokio::test]
    async fn exhausted_source_yields_fewer_than_requested() {
        let source = StaticCommentSource::new(["only"]);
        let batch = retrieve(&source, "link", 50, LONG).await.expect("retrieve");
        assert_eq!(batch.len(), 1);
        assert!(batch.render().starts_with("These are the top 1 comments"));
    }

    #[tokio::test]
    async fn zero_cap_reports_zero_comments_without_fetching() {
        let source = StaticCommentSource::new(["a", "b"]);
        let batch = retrieve(&source, "link", 0, LONG).await.expect("retrieve");
        assert!(batch.is_empty());
        assert_eq!(batch.render(), "These are the top 0 comments from the video:\n");
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn mid_stream_failure_discards_partial_results() {
        let source = StaticCommentSource::new(["a", "b"]).failing_after(1, "connection reset");
        let err = retrieve(&source, "link", 10, LONG).await.unwrap_err();
        assert!(err.to_string().contains("connection reset"), "got: {err}");
    }

    #[tokio::test]
    async fn stops_pulling_once_cap_is_reached() {
        // The failure sits after the cap, so it must never be observed.
        let source = StaticCommentSource::new(["a", "b"]).failing_after(2, "should not be reached");
        let batch = retrieve(&source, "link", 2, LONG).await.expect("retrieve");
        assert_eq!(batch.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn hanging_source_times_out() {
        let err = retrieve(&PendingCommentSource, "link", 5, Duration::from_secs(3))
            .await
            .unwrap_err();
        assert!(err.is_timeout(), "got: {err:?}");
        assert_eq!(err.to_string(), "comment retrieval timed out after 3s");
    }
}
