use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{
    parse_arguments, PropertySchema, Tool, ToolDefinition, ToolError, ToolFailure, ToolOutput,
    ToolParameters,
};
use crate::retrieval::{effective_max_comments, retrieve, DEFAULT_MAX_COMMENTS};
use crate::sources::CommentSource;

pub const COMMENT_TOOL_NAME: &str = "fetch_video_comments";

#[derive(Debug, Deserialize)]
struct CommentArgs {
    link: String,
    max_comments: Option<i64>,
}

/// Fetches the most popular comments of a video as one descriptive string.
pub struct CommentRetrievalTool {
    source: Arc<dyn CommentSource>,
    default_max_comments: usize,
    timeout: Duration,
}

impl CommentRetrievalTool {
    #[must_use]
    pub fn new(source: Arc<dyn CommentSource>, timeout: Duration) -> Self {
        Self {
            source,
            default_max_comments: DEFAULT_MAX_COMMENTS,
            timeout,
        }
    }

    #[must_use]
    pub fn with_default_max_comments(mut self, max_comments: usize) -> Self {
        self.default_max_comments = max_comments;
        self
    }

    /// Schema advertised to the orchestrator. Needs no source, so tools can
    /// be listed without credentials.
    #[must_use]
    pub fn describe(default_max_comments: usize) -> ToolDefinition {
        ToolDefinition::new(
            COMMENT_TOOL_NAME,
            "Fetches the most popular comments from a YouTube video and returns them as a \
             single string: a line stating how many comments were collected, followed by \
             one comment per line.",
        )
        .with_parameters(
            ToolParameters::new()
                .add_property("link", PropertySchema::string("The YouTube video URL."), true)
                .add_property(
                    "max_comments",
                    PropertySchema::integer("The maximum number of comments to retrieve.")
                        .with_default(json!(default_max_comments)),
                    false,
                ),
        )
    }

    /// Typed entry point behind the text boundary.
    ///
    /// Non-positive `max_comments` collects nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ToolFailure::Retrieval`] wrapping the source error.
    pub async fn run(&self, link: &str, max_comments: Option<i64>) -> Result<String, ToolFailure> {
        let max_comments = effective_max_comments(max_comments, self.default_max_comments);
        match retrieve(self.source.as_ref(), link, max_comments, self.timeout).await {
            Ok(batch) => Ok(batch.render()),
            Err(e) => {
                tracing::warn!(link, error = %e, "comment retrieval failed");
                Err(ToolFailure::Retrieval(e))
            }
        }
    }
}

#[async_trait]
impl Tool for CommentRetrievalTool {
    fn name(&self) -> &str {
        COMMENT_TOOL_NAME
    }

    fn definition(&self) -> ToolDefinition {
        Self::describe(self.default_max_comments)
    }

    async fn execute(&self, arguments: Value) -> Result<ToolOutput, ToolError> {
        let args: CommentArgs = parse_arguments(COMMENT_TOOL_NAME, arguments)?;
        Ok(match self.run(&args.link, args.max_comments).await {
            Ok(text) => ToolOutput::success(text),
            Err(failure) => failure.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StaticCommentSource;

    fn tool(source: &Arc<StaticCommentSource>) -> CommentRetrievalTool {
        CommentRetrievalTool::new(source.clone(), Duration::from_secs(5))
            .with_default_max_comments(2)
    }

    #[tokio::test]
    async fn negative_cap_collects_nothing_and_never_fetches() {
        let source = Arc::new(StaticCommentSource::new(["a", "b", "c"]));
        let out = tool(&source)
            .execute(json!({ "link": "https://youtu.be/KxaPYhfJV4U", "max_comments": -5 }))
            .await
            .expect("tool call");

        assert!(!out.is_error);
        assert_eq!(out.content, "These are the top 0 comments from the video:\n");
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn missing_cap_uses_configured_default() {
        let source = Arc::new(StaticCommentSource::new(["a", "b", "c"]));
        let text = tool(&source).run("link", None).await.expect("run");
        assert_eq!(text, "These are the top 2 comments from the video:\na\nb");
        assert_eq!(source.calls(), 1);
    }
}
