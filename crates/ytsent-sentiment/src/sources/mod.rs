//! Comment source abstractions.

mod video_link;
mod youtube;

pub use video_link::extract_video_id;
pub use youtube::YouTubeClient;

use futures::stream::BoxStream;

use crate::error::SentimentError;
use crate::types::Comment;

/// Order in which a source yields comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentOrder {
    /// Most popular first.
    Popular,
    Newest,
}

/// A feed of comments for a video.
///
/// The returned stream is lazy and finite: pages are only requested as the
/// consumer pulls, so callers that stop early never pay for unread pages.
pub trait CommentSource: Send + Sync {
    fn comments<'a>(
        &'a self,
        link: &'a str,
        order: CommentOrder,
    ) -> BoxStream<'a, Result<Comment, SentimentError>>;
}
