//! Shared configuration for the ytsent tool service.

mod app_config;
mod config;
mod profile;

pub use app_config::{AppConfig, ClassifierBackend, Environment, PreamblePolicy};
pub use config::{build_app_config, load_app_config, load_app_config_from_env};
pub use profile::{load_agent_profile, AgentProfile};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read agent profile {path}: {source}")]
    ProfileFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse agent profile: {0}")]
    ProfileFileParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),
}
