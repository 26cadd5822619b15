use crate::app_config::{AppConfig, ClassifierBackend, Environment, PreamblePolicy};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can pass a `HashMap` lookup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_secs = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let secs = or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if secs == 0 {
            return Err(invalid(var, "must be at least 1 second".to_string()));
        }
        Ok(secs)
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>().map_err(|e| invalid(var, e.to_string()))
    };

    let parse_nonzero = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let value = parse_usize(var, default)?;
        if value == 0 {
            return Err(invalid(var, "must be at least 1".to_string()));
        }
        Ok(value)
    };

    let env = parse_environment(&or_default("YTSENT_ENV", "development"))?;

    let bind_addr = or_default("YTSENT_BIND_ADDR", "127.0.0.1:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("YTSENT_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("YTSENT_LOG_LEVEL", "info");

    let youtube_api_key = optional("YOUTUBE_API_KEY");
    let youtube_api_url = or_default(
        "YTSENT_YOUTUBE_API_URL",
        "https://www.googleapis.com/youtube/v3",
    )
    .trim_end_matches('/')
    .to_string();
    let user_agent = or_default("YTSENT_USER_AGENT", "ytsent/0.1 (comment-sentiment)");

    let classifier = parse_classifier(&or_default("YTSENT_CLASSIFIER", "lexicon"))?;
    let tei_url = optional("SENTIMENT_TEI_URL").map(|url| url.trim_end_matches('/').to_string());
    if classifier == ClassifierBackend::Tei && tei_url.is_none() {
        return Err(ConfigError::MissingEnvVar("SENTIMENT_TEI_URL".to_string()));
    }

    let default_max_comments = parse_usize("YTSENT_DEFAULT_MAX_COMMENTS", "50")?;
    let fetch_timeout_secs = parse_secs("YTSENT_FETCH_TIMEOUT_SECS", "30")?;
    let classify_timeout_secs = parse_secs("YTSENT_CLASSIFY_TIMEOUT_SECS", "10")?;
    let classify_concurrency = parse_nonzero("YTSENT_CLASSIFY_CONCURRENCY", "4")?;
    let classifier_max_chars = parse_nonzero("YTSENT_CLASSIFIER_MAX_CHARS", "2000")?;
    let preamble_policy = parse_preamble_policy(&or_default("YTSENT_PREAMBLE_POLICY", "skip"))?;
    let profile_path = optional("YTSENT_PROFILE_PATH").map(PathBuf::from);

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        youtube_api_key,
        youtube_api_url,
        user_agent,
        classifier,
        tei_url,
        default_max_comments,
        fetch_timeout_secs,
        classify_timeout_secs,
        classify_concurrency,
        classifier_max_chars,
        preamble_policy,
        profile_path,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "YTSENT_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

fn parse_classifier(s: &str) -> Result<ClassifierBackend, ConfigError> {
    match s.to_ascii_lowercase().as_str() {
        "lexicon" => Ok(ClassifierBackend::Lexicon),
        "tei" => Ok(ClassifierBackend::Tei),
        other => Err(ConfigError::InvalidEnvVar {
            var: "YTSENT_CLASSIFIER".to_string(),
            reason: format!("expected 'lexicon' or 'tei', got '{other}'"),
        }),
    }
}

fn parse_preamble_policy(s: &str) -> Result<PreamblePolicy, ConfigError> {
    match s.to_ascii_lowercase().as_str() {
        "skip" => Ok(PreamblePolicy::Skip),
        "keep" => Ok(PreamblePolicy::Keep),
        other => Err(ConfigError::InvalidEnvVar {
            var: "YTSENT_PREAMBLE_POLICY".to_string(),
            reason: format!("expected 'skip' or 'keep', got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
