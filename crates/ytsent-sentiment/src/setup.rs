//! Wiring of sources, classifier, and tools from application config.

use std::sync::Arc;
use std::time::Duration;

use ytsent_core::{AppConfig, ClassifierBackend};

use crate::aggregation::{Aggregator, LineFilter};
use crate::classifier::{Classifier, TeiClassifier};
use crate::error::SentimentError;
use crate::pipeline::{analyze_video, VideoReception};
use crate::scorer::LexiconClassifier;
use crate::sources::{CommentSource, YouTubeClient};
use crate::tools::{CommentRetrievalTool, SentimentAggregationTool, ToolDefinition, ToolRegistry};

/// Load the configured classifier once for the whole process.
///
/// # Errors
///
/// Returns [`SentimentError::MissingCredential`] when the TEI backend is
/// selected without a URL, or [`SentimentError::Http`] if its client cannot
/// be built.
pub fn build_classifier(config: &AppConfig) -> Result<Arc<dyn Classifier>, SentimentError> {
    match config.classifier {
        ClassifierBackend::Lexicon => {
            tracing::info!("using built-in lexicon classifier");
            Ok(Arc::new(LexiconClassifier::new()))
        }
        ClassifierBackend::Tei => {
            let url = config
                .tei_url
                .as_deref()
                .ok_or(SentimentError::MissingCredential("SENTIMENT_TEI_URL"))?;
            tracing::info!(tei_url = url, "using TEI classifier");
            Ok(Arc::new(TeiClassifier::new(
                url,
                config.classify_timeout_secs,
                &config.user_agent,
            )?))
        }
    }
}

/// Build an [`Aggregator`] honouring the configured limits and preamble policy.
#[must_use]
pub fn build_aggregator(config: &AppConfig, classifier: Arc<dyn Classifier>) -> Aggregator {
    Aggregator::new(classifier)
        .with_line_filter(LineFilter::from_policy(config.preamble_policy))
        .with_max_input_chars(config.classifier_max_chars)
        .with_concurrency(config.classify_concurrency)
        .with_timeout(Duration::from_secs(config.classify_timeout_secs))
}

/// Build the YouTube comment source.
///
/// # Errors
///
/// Returns [`SentimentError::MissingCredential`] without `YOUTUBE_API_KEY`.
pub fn build_comment_source(config: &AppConfig) -> Result<Arc<dyn CommentSource>, SentimentError> {
    let api_key = config
        .youtube_api_key
        .as_deref()
        .ok_or(SentimentError::MissingCredential("YOUTUBE_API_KEY"))?;
    let client = YouTubeClient::new(
        &config.youtube_api_url,
        api_key,
        config.fetch_timeout_secs,
        &config.user_agent,
    )?;
    Ok(Arc::new(client))
}

/// Schemas of every tool in registration order, without building any
/// collaborator.
#[must_use]
pub fn tool_definitions(config: &AppConfig) -> Vec<ToolDefinition> {
    vec![
        CommentRetrievalTool::describe(config.default_max_comments),
        SentimentAggregationTool::describe(),
    ]
}

/// Process-wide collaborators shared by every tool call.
pub struct Toolkit {
    source: Arc<dyn CommentSource>,
    aggregator: Arc<Aggregator>,
    default_max_comments: usize,
    fetch_timeout: Duration,
}

impl Toolkit {
    #[must_use]
    pub fn new(
        source: Arc<dyn CommentSource>,
        aggregator: Aggregator,
        default_max_comments: usize,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            source,
            aggregator: Arc::new(aggregator),
            default_max_comments,
            fetch_timeout,
        }
    }

    /// Build every collaborator from config.
    ///
    /// # Errors
    ///
    /// Returns the first [`SentimentError`] from the source or classifier setup.
    pub fn from_config(config: &AppConfig) -> Result<Self, SentimentError> {
        let source = build_comment_source(config)?;
        let classifier = build_classifier(config)?;
        Ok(Self::new(
            source,
            build_aggregator(config, classifier),
            config.default_max_comments,
            Duration::from_secs(config.fetch_timeout_secs),
        ))
    }

    #[must_use]
    pub fn default_max_comments(&self) -> usize {
        self.default_max_comments
    }

    /// Registry exposing both tools to an orchestrator.
    #[must_use]
    pub fn registry(&self) -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(
            CommentRetrievalTool::new(Arc::clone(&self.source), self.fetch_timeout)
                .with_default_max_comments(self.default_max_comments),
        ));
        registry.register(Arc::new(SentimentAggregationTool::new(Arc::clone(
            &self.aggregator,
        ))));
        registry
    }

    /// Retrieve and classify comments for one video.
    ///
    /// # Errors
    ///
    /// Returns the first [`SentimentError`] from either stage.
    pub async fn analyze(
        &self,
        link: &str,
        max_comments: usize,
    ) -> Result<VideoReception, SentimentError> {
        analyze_video(
            self.source.as_ref(),
            &self.aggregator,
            link,
            max_comments,
            self.fetch_timeout,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::testing::{KeywordClassifier, StaticCommentSource};
    use crate::types::SentimentLabel;

    fn toolkit() -> Toolkit {
        let source = Arc::new(StaticCommentSource::new(["good", "bad", "good", "good"]));
        let classifier = Arc::new(
            KeywordClassifier::new(SentimentLabel::Positive).label("bad", SentimentLabel::Negative),
        );
        Toolkit::new(source, Aggregator::new(classifier), 3, Duration::from_secs(5))
    }

    #[test]
    fn registry_exposes_both_tools_in_order() {
        let registry = toolkit().registry();
        assert_eq!(
            registry.names(),
            vec!["fetch_video_comments", "analyze_comment_sentiment"]
        );
        let defs = registry.definitions();
        assert_eq!(defs[0].parameters.required, vec!["link".to_string()]);
        assert_eq!(
            defs[0].parameters.properties["max_comments"].default,
            Some(json!(3))
        );
        assert_eq!(defs[1].parameters.required, vec!["comments".to_string()]);
    }

    #[test]
    fn definitions_need_no_credentials_and_match_the_registry() {
        let config = ytsent_core::build_app_config(|_| Err(std::env::VarError::NotPresent))
            .expect("defaults");
        assert!(config.youtube_api_key.is_none());

        let defs = tool_definitions(&config);
        let names: Vec<&str> = defs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, toolkit().registry().names());
        assert_eq!(
            defs[0].parameters.properties["max_comments"].default,
            Some(json!(50))
        );
    }

    #[tokio::test]
    async fn analyze_uses_the_shared_collaborators() {
        let reception = toolkit().analyze("link", 2).await.expect("analyze");
        assert_eq!(reception.batch.len(), 2);
        assert_eq!(reception.verdict.positive_count, 1);
        assert_eq!(reception.verdict.negative_count, 1);
    }
}
