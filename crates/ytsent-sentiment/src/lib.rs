//! Comment sentiment tools for ytsent.
//!
//! Fetches the most popular comments of a video through the YouTube Data
//! API, classifies each line with a pluggable sentiment classifier (a TEI
//! model server or a built-in lexicon), and tallies a majority verdict. Both
//! steps are exposed as schema-described tools for an external orchestrator.

pub mod aggregation;
pub mod classifier;
pub mod error;
pub mod pipeline;
pub mod retrieval;
pub mod scorer;
pub mod setup;
pub mod sources;
pub mod tools;
pub mod types;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use aggregation::{Aggregator, LineFilter};
pub use classifier::{Classifier, TeiClassifier};
pub use error::SentimentError;
pub use pipeline::{analyze_video, VideoReception};
pub use retrieval::{effective_max_comments, retrieve, DEFAULT_MAX_COMMENTS};
pub use scorer::{lexicon_score, LexiconClassifier};
pub use setup::{
    build_aggregator, build_classifier, build_comment_source, tool_definitions, Toolkit,
};
pub use sources::{CommentOrder, CommentSource, YouTubeClient};
pub use tools::{
    Tool, ToolDefinition, ToolError, ToolFailure, ToolOutput, ToolRegistry, COMMENT_TOOL_NAME,
    SENTIMENT_TOOL_NAME,
};
pub use types::{
    Classification, Comment, CommentBatch, Reception, SentimentLabel, SentimentVerdict,
};
