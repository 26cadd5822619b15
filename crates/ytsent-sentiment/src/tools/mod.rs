//! Orchestrator-facing tools.
//!
//! The orchestrator speaks text: it discovers tools through their
//! [`ToolDefinition`], calls them with JSON arguments, and reads back a
//! single string. Domain failures therefore travel as [`ToolOutput`] values
//! flagged `is_error`, while [`ToolError`] is reserved for calls the
//! orchestrator itself got wrong.

mod comments;
mod sentiment;

pub use comments::{CommentRetrievalTool, COMMENT_TOOL_NAME};
pub use sentiment::{SentimentAggregationTool, SENTIMENT_TOOL_NAME};

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::error::SentimentError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: ToolParameters,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: ToolParameters::default(),
        }
    }

    #[must_use]
    pub fn with_parameters(mut self, parameters: ToolParameters) -> Self {
        self.parameters = parameters;
        self
    }
}

/// JSON-schema object describing a tool's arguments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameters {
    #[serde(rename = "type")]
    pub schema_type: String,
    #[serde(default)]
    pub properties: BTreeMap<String, PropertySchema>,
    #[serde(default)]
    pub required: Vec<String>,
    #[serde(rename = "additionalProperties", default)]
    pub additional_properties: bool,
}

impl Default for ToolParameters {
    fn default() -> Self {
        Self {
            schema_type: "object".to_string(),
            properties: BTreeMap::new(),
            required: Vec::new(),
            additional_properties: false,
        }
    }
}

impl ToolParameters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn add_property(
        mut self,
        name: impl Into<String>,
        schema: PropertySchema,
        required: bool,
    ) -> Self {
        let name = name.into();
        self.properties.insert(name.clone(), schema);
        if required {
            self.required.push(name);
        }
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub schema_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl PropertySchema {
    pub fn string(description: impl Into<String>) -> Self {
        Self {
            schema_type: "string".to_string(),
            description: Some(description.into()),
            default: None,
        }
    }

    pub fn integer(description: impl Into<String>) -> Self {
        Self {
            schema_type: "integer".to_string(),
            description: Some(description.into()),
            default: None,
        }
    }

    #[must_use]
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }
}

/// Text handed back to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolOutput {
    pub content: String,
    pub is_error: bool,
}

impl ToolOutput {
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: false,
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: true,
        }
    }
}

/// Domain failure of a tool, kept typed until it crosses the text boundary.
///
/// The `Display` output is the exact text the orchestrator receives.
#[derive(Debug, Error)]
pub enum ToolFailure {
    #[error("Error fetching comments: {0}")]
    Retrieval(#[source] SentimentError),

    #[error("Error during sentiment analysis: {0}")]
    Classification(#[source] SentimentError),
}

impl ToolFailure {
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            ToolFailure::Retrieval(e) | ToolFailure::Classification(e) => e.is_timeout(),
        }
    }
}

impl From<ToolFailure> for ToolOutput {
    fn from(failure: ToolFailure) -> Self {
        ToolOutput::error(failure.to_string())
    }
}

/// A call the orchestrator could not make.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("invalid arguments for {tool}: {source}")]
    InvalidArguments {
        tool: String,
        #[source]
        source: serde_json::Error,
    },
}

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn definition(&self) -> ToolDefinition;

    async fn execute(&self, arguments: Value) -> Result<ToolOutput, ToolError>;
}

/// Decode tool arguments, treating `null` as an empty object.
pub(crate) fn parse_arguments<T>(tool: &str, arguments: Value) -> Result<T, ToolError>
where
    T: for<'de> Deserialize<'de>,
{
    let arguments = if arguments.is_null() {
        Value::Object(serde_json::Map::new())
    } else {
        arguments
    };
    serde_json::from_value(arguments).map_err(|source| ToolError::InvalidArguments {
        tool: tool.to_string(),
        source,
    })
}

/// Tools available to the orchestrator, in registration order.
#[derive(Default)]
pub struct ToolRegistry {
    order: Vec<String>,
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, replacing any tool already registered under its name.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        if self.tools.insert(name.clone(), tool).is_none() {
            self.order.push(name);
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.order.iter().map(String::as_str).collect()
    }

    #[must_use]
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|tool| tool.definition())
            .collect()
    }

    /// Invoke the named tool with JSON `arguments`.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::UnknownTool`] for unregistered names and
    /// propagates argument decoding errors from the tool.
    pub async fn execute(&self, name: &str, arguments: Value) -> Result<ToolOutput, ToolError> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        tracing::debug!(tool = name, "executing tool");
        tool.execute(arguments).await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use super::*;

    #[test]
    fn failure_text_matches_boundary_format() {
        let retrieval = ToolFailure::Retrieval(SentimentError::Source("offline".to_string()));
        assert_eq!(
            retrieval.to_string(),
            "Error fetching comments: comment source error: offline"
        );

        let classification = ToolFailure::Classification(SentimentError::Timeout {
            operation: "sentiment classification",
            after: Duration::from_secs(10),
        });
        assert!(classification.is_timeout());
        let output = ToolOutput::from(classification);
        assert!(output.is_error);
        assert_eq!(
            output.content,
            "Error during sentiment analysis: sentiment classification timed out after 10s"
        );
    }

    #[test]
    fn parameters_serialize_as_json_schema() {
        let params = ToolParameters::new()
            .add_property("link", PropertySchema::string("Video URL"), true)
            .add_property(
                "max_comments",
                PropertySchema::integer("Cap").with_default(json!(50)),
                false,
            );
        let value = serde_json::to_value(&params).expect("serialize");
        assert_eq!(value["type"], "object");
        assert_eq!(value["required"], json!(["link"]));
        assert_eq!(value["properties"]["max_comments"]["default"], 50);
        assert_eq!(value["additionalProperties"], false);
        assert!(value["properties"]["link"].get("default").is_none());
    }

    #[derive(Debug, Deserialize)]
    struct Args {
        #[serde(default)]
        n: u32,
    }

    #[test]
    fn null_arguments_decode_as_empty_object() {
        let args: Args = parse_arguments("t", Value::Null).expect("decode");
        assert_eq!(args.n, 0);
    }

    #[test]
    fn wrong_argument_type_is_invalid() {
        let err = parse_arguments::<Args>("t", json!({"n": "three"})).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { ref tool, .. } if tool == "t"));
    }
}
