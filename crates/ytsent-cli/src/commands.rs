//! Subcommand handlers. Each one builds only the collaborators it needs.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use serde_json::Value;
use ytsent_core::AppConfig;
use ytsent_sentiment::tools::{CommentRetrievalTool, SentimentAggregationTool};
use ytsent_sentiment::{
    build_aggregator, build_classifier, build_comment_source, effective_max_comments,
    tool_definitions, Toolkit,
};

pub(crate) async fn run_comments(
    config: &AppConfig,
    link: &str,
    max: Option<i64>,
) -> anyhow::Result<()> {
    let source = build_comment_source(config)?;
    let tool = CommentRetrievalTool::new(source, Duration::from_secs(config.fetch_timeout_secs))
        .with_default_max_comments(config.default_max_comments);
    let text = tool.run(link, max).await?;
    println!("{text}");
    Ok(())
}

pub(crate) async fn run_sentiment(config: &AppConfig, file: Option<&Path>) -> anyhow::Result<()> {
    let comments = match file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read comments from {}", path.display()))?,
        None => tokio::task::spawn_blocking(|| std::io::read_to_string(std::io::stdin()))
            .await?
            .context("failed to read comments from stdin")?,
    };

    let classifier = build_classifier(config)?;
    let tool = SentimentAggregationTool::new(Arc::new(build_aggregator(config, classifier)));
    let verdict = tool.run(&comments).await?;
    println!("{verdict}");
    Ok(())
}

pub(crate) async fn run_analyze(
    config: &AppConfig,
    link: &str,
    max: Option<i64>,
) -> anyhow::Result<()> {
    let toolkit = Toolkit::from_config(config)?;
    let max = effective_max_comments(max, toolkit.default_max_comments());
    let reception = toolkit.analyze(link, max).await?;

    tracing::info!(
        link,
        count = reception.batch.len(),
        positive = reception.verdict.positive_count,
        negative = reception.verdict.negative_count,
        "analysis complete"
    );
    println!("{}", reception.verdict);
    Ok(())
}

pub(crate) fn run_tools(config: &AppConfig) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&tool_definitions(config))?);
    Ok(())
}

pub(crate) async fn run_call(config: &AppConfig, name: &str, args: &str) -> anyhow::Result<()> {
    let arguments: Value = serde_json::from_str(args).context("--args must be valid JSON")?;
    let registry = Toolkit::from_config(config)?.registry();
    let output = registry.execute(name, arguments).await?;
    if output.is_error {
        anyhow::bail!(output.content);
    }
    println!("{}", output.content);
    Ok(())
}
