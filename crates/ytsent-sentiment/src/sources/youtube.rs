//! YouTube Data API v3 comment collector.

use std::time::Duration;

use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use serde::Deserialize;

use super::{extract_video_id, CommentOrder, CommentSource};
use crate::error::SentimentError;
use crate::types::Comment;

/// Largest page the `commentThreads` endpoint accepts.
const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentThreadList {
    next_page_token: Option<String>,
    #[serde(default)]
    items: Vec<CommentThread>,
}

#[derive(Debug, Deserialize)]
struct CommentThread {
    snippet: ThreadSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThreadSnippet {
    top_level_comment: TopLevelComment,
}

#[derive(Debug, Deserialize)]
struct TopLevelComment {
    snippet: CommentSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentSnippet {
    text_original: Option<String>,
    text_display: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
    #[serde(default)]
    errors: Vec<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    reason: Option<String>,
}

enum Cursor {
    First,
    Next(String),
    Done,
}

/// HTTP client for the `commentThreads` endpoint.
///
/// Yields top-level comment text in the requested order, following
/// `nextPageToken` until the feed is exhausted or the consumer stops.
pub struct YouTubeClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    page_size: u32,
}

impl YouTubeClient {
    /// Creates a `YouTubeClient` with a per-request timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_url: &str,
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, SentimentError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            page_size: MAX_PAGE_SIZE,
        })
    }

    /// Override the number of threads requested per page (clamped to `1..=100`).
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    async fn fetch_page(
        &self,
        video_id: &str,
        order: CommentOrder,
        page_token: Option<&str>,
    ) -> Result<CommentThreadList, SentimentError> {
        let order = match order {
            CommentOrder::Popular => "relevance",
            CommentOrder::Newest => "time",
        };
        let page_size = self.page_size.to_string();
        let mut query = vec![
            ("part", "snippet"),
            ("videoId", video_id),
            ("order", order),
            ("textFormat", "plainText"),
            ("maxResults", page_size.as_str()),
            ("key", self.api_key.as_str()),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }

        let url = format!("{}/commentThreads", self.api_url);
        let response = self.client.get(&url).query(&query).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(decode_api_error(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|source| SentimentError::Deserialize {
            context: format!("commentThreads page for video {video_id}"),
            source,
        })
    }
}

/// Turn a non-2xx body into a typed error, falling back to the raw body when
/// the response is not the usual Google error envelope.
fn decode_api_error(status: u16, body: &str) -> SentimentError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => SentimentError::YouTube {
            status,
            reason: envelope
                .error
                .errors
                .into_iter()
                .find_map(|detail| detail.reason)
                .unwrap_or_else(|| "unknown".to_string()),
            message: envelope.error.message,
        },
        Err(_) => SentimentError::YouTube {
            status,
            reason: "unknown".to_string(),
            message: body.trim().to_string(),
        },
    }
}

fn into_comments(page: Vec<CommentThread>) -> Vec<Result<Comment, SentimentError>> {
    page.into_iter()
        .filter_map(|thread| {
            let snippet = thread.snippet.top_level_comment.snippet;
            snippet.text_original.or(snippet.text_display)
        })
        .map(|text| Ok(Comment::new(text)))
        .collect()
}

impl CommentSource for YouTubeClient {
    fn comments<'a>(
        &'a self,
        link: &'a str,
        order: CommentOrder,
    ) -> BoxStream<'a, Result<Comment, SentimentError>> {
        let video_id = match extract_video_id(link) {
            Ok(id) => id,
            Err(e) => return stream::once(async move { Err(e) }).boxed(),
        };

        stream::try_unfold(Cursor::First, move |cursor| {
            let video_id = video_id.clone();
            async move {
                let token = match cursor {
                    Cursor::First => None,
                    Cursor::Next(token) => Some(token),
                    Cursor::Done => return Ok::<_, SentimentError>(None),
                };
                let page = self.fetch_page(&video_id, order, token.as_deref()).await?;
                tracing::debug!(
                    video_id = %video_id,
                    count = page.items.len(),
                    has_next = page.next_page_token.is_some(),
                    "fetched comment page"
                );
                let next = page
                    .next_page_token
                    .filter(|t| !t.is_empty())
                    .map_or(Cursor::Done, Cursor::Next);
                Ok(Some((stream::iter(into_comments(page.items)), next)))
            }
        })
        .try_flatten()
        .boxed()
    }
}
