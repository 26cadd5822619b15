use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::{
    parse_arguments, PropertySchema, Tool, ToolDefinition, ToolError, ToolFailure, ToolOutput,
    ToolParameters,
};
use crate::aggregation::Aggregator;
use crate::types::SentimentVerdict;

pub const SENTIMENT_TOOL_NAME: &str = "analyze_comment_sentiment";

#[derive(Debug, Deserialize)]
struct SentimentArgs {
    comments: String,
}

/// Classifies newline-separated comments and reports the overall reception.
pub struct SentimentAggregationTool {
    aggregator: Arc<Aggregator>,
}

impl SentimentAggregationTool {
    #[must_use]
    pub fn new(aggregator: Arc<Aggregator>) -> Self {
        Self { aggregator }
    }

    #[must_use]
    pub fn describe() -> ToolDefinition {
        ToolDefinition::new(
            SENTIMENT_TOOL_NAME,
            "Analyzes the sentiment of YouTube comments to determine the overall reception. \
             Each non-empty line is classified as positive or negative and the majority \
             decides whether the reception is positive, negative, or neutral.",
        )
        .with_parameters(ToolParameters::new().add_property(
            "comments",
            PropertySchema::string(
                "Newline-separated comments, e.g. the output of the comment tool.",
            ),
            true,
        ))
    }

    /// Typed entry point behind the text boundary.
    ///
    /// # Errors
    ///
    /// Returns [`ToolFailure::Classification`] when any line fails to classify.
    pub async fn run(&self, comments: &str) -> Result<SentimentVerdict, ToolFailure> {
        self.aggregator.aggregate(comments).await.map_err(|e| {
            tracing::warn!(error = %e, "sentiment aggregation failed");
            ToolFailure::Classification(e)
        })
    }
}

#[async_trait]
impl Tool for SentimentAggregationTool {
    fn name(&self) -> &str {
        SENTIMENT_TOOL_NAME
    }

    fn definition(&self) -> ToolDefinition {
        Self::describe()
    }

    async fn execute(&self, arguments: Value) -> Result<ToolOutput, ToolError> {
        let args: SentimentArgs = parse_arguments(SENTIMENT_TOOL_NAME, arguments)?;
        Ok(match self.run(&args.comments).await {
            Ok(verdict) => ToolOutput::success(verdict.to_string()),
            Err(failure) => failure.into(),
        })
    }
}
