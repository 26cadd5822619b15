//! Agent profile loaded from a declarative YAML file.
//!
//! The profile carries what the external orchestrator needs to drive the
//! tools: the planning model identifier, a step budget, and prompt templates.
//! Templates are kept opaque; this crate only checks the envelope.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const DEFAULT_MAX_STEPS: u32 = 6;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentProfile {
    /// Planning model identifier, e.g. `qwen2.5:3b`.
    pub model: String,
    #[serde(default = "default_max_steps")]
    pub max_steps: u32,
    #[serde(default)]
    pub prompt_templates: BTreeMap<String, serde_yaml::Value>,
}

fn default_max_steps() -> u32 {
    DEFAULT_MAX_STEPS
}

/// Load and validate an agent profile from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_agent_profile(path: &Path) -> Result<AgentProfile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ProfileFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let profile: AgentProfile = serde_yaml::from_str(&content)?;
    validate_profile(&profile)?;

    Ok(profile)
}

fn validate_profile(profile: &AgentProfile) -> Result<(), ConfigError> {
    if profile.model.trim().is_empty() {
        return Err(ConfigError::Validation(
            "agent profile model must be non-empty".to_string(),
        ));
    }

    if profile.max_steps == 0 {
        return Err(ConfigError::Validation(
            "agent profile max_steps must be at least 1".to_string(),
        ));
    }

    Ok(())
}
