use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Which sentiment classifier the process loads at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierBackend {
    /// Built-in word lexicon; needs no external service.
    Lexicon,
    /// Text Embeddings Inference server hosting a sequence-classification model.
    Tei,
}

impl std::fmt::Display for ClassifierBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClassifierBackend::Lexicon => write!(f, "lexicon"),
            ClassifierBackend::Tei => write!(f, "tei"),
        }
    }
}

/// Whether the aggregation tool classifies the header line that the
/// comment tool prepends to its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreamblePolicy {
    /// Drop known header lines before classifying.
    Skip,
    /// Classify every non-blank line, header included.
    Keep,
}

impl std::fmt::Display for PreamblePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PreamblePolicy::Skip => write!(f, "skip"),
            PreamblePolicy::Keep => write!(f, "keep"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub youtube_api_key: Option<String>,
    pub youtube_api_url: String,
    pub user_agent: String,
    pub classifier: ClassifierBackend,
    pub tei_url: Option<String>,
    pub default_max_comments: usize,
    pub fetch_timeout_secs: u64,
    pub classify_timeout_secs: u64,
    pub classify_concurrency: usize,
    pub classifier_max_chars: usize,
    pub preamble_policy: PreamblePolicy,
    pub profile_path: Option<PathBuf>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field(
                "youtube_api_key",
                &self.youtube_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("youtube_api_url", &self.youtube_api_url)
            .field("user_agent", &self.user_agent)
            .field("classifier", &self.classifier)
            .field("tei_url", &self.tei_url)
            .field("default_max_comments", &self.default_max_comments)
            .field("fetch_timeout_secs", &self.fetch_timeout_secs)
            .field("classify_timeout_secs", &self.classify_timeout_secs)
            .field("classify_concurrency", &self.classify_concurrency)
            .field("classifier_max_chars", &self.classifier_max_chars)
            .field("preamble_policy", &self.preamble_policy)
            .field("profile_path", &self.profile_path)
            .finish()
    }
}
