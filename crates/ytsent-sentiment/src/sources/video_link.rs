//! Video link parsing.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::Url;

use crate::error::SentimentError;

static VIDEO_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("valid video id regex"));

const PATH_PREFIXES: [&str; 4] = ["shorts", "embed", "live", "v"];

/// Extract the 11-character video id from a watch URL, short link, or bare id.
///
/// # Errors
///
/// Returns [`SentimentError::InvalidLink`] when no video id can be found.
pub fn extract_video_id(link: &str) -> Result<String, SentimentError> {
    let trimmed = link.trim();
    let invalid = |reason: &str| SentimentError::InvalidLink {
        link: trimmed.to_string(),
        reason: reason.to_string(),
    };

    if VIDEO_ID.is_match(trimmed) {
        return Ok(trimmed.to_string());
    }

    let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };
    let url = Url::parse(&with_scheme).map_err(|e| invalid(&e.to_string()))?;

    let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);
    let mut segments = url.path_segments().into_iter().flatten().filter(|s| !s.is_empty());

    let candidate = match host {
        "youtu.be" => segments.next().map(str::to_string),
        "youtube.com" | "m.youtube.com" | "music.youtube.com" | "youtube-nocookie.com" => {
            match segments.next() {
                Some("watch") => url
                    .query_pairs()
                    .find(|(key, _)| key == "v")
                    .map(|(_, value)| value.into_owned()),
                Some(prefix) if PATH_PREFIXES.contains(&prefix) => {
                    segments.next().map(str::to_string)
                }
                _ => None,
            }
        }
        _ => return Err(invalid("not a YouTube URL")),
    };

    match candidate {
        Some(id) if VIDEO_ID.is_match(&id) => Ok(id),
        Some(_) => Err(invalid("malformed video id")),
        None => Err(invalid("no video id in URL")),
    }
}
