use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{Request, State},
    http::{
        header::{AUTHORIZATION, RETRY_AFTER},
        HeaderMap, HeaderName, HeaderValue, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use subtle::ConstantTimeEq;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Env var holding comma-separated bearer tokens.
pub const API_KEYS_VAR: &str = "YTSENT_API_KEYS";

pub static X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Caller-supplied ids longer than this are replaced.
const MAX_REQUEST_ID_LEN: usize = 128;

/// Request id stored as a request extension and echoed on the response.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Bearer tokens accepted on protected routes. Disabled means open access.
#[derive(Debug, Clone)]
pub struct AuthState {
    api_keys: Arc<Vec<String>>,
    pub enabled: bool,
}

impl AuthState {
    /// Reads tokens from `YTSENT_API_KEYS`.
    ///
    /// # Errors
    ///
    /// See [`AuthState::from_keys`].
    pub fn from_env(is_development: bool) -> anyhow::Result<Self> {
        let raw = std::env::var(API_KEYS_VAR).ok();
        Self::from_keys(raw.as_deref(), is_development)
    }

    /// Parses a comma-separated token list.
    ///
    /// An empty list turns auth off in development and is a startup error
    /// everywhere else.
    ///
    /// # Errors
    ///
    /// Returns an error when no keys are given outside development.
    pub fn from_keys(raw: Option<&str>, is_development: bool) -> anyhow::Result<Self> {
        let mut api_keys: Vec<String> = raw
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToOwned::to_owned)
            .collect();
        api_keys.sort_unstable();
        api_keys.dedup();

        match (api_keys.is_empty(), is_development) {
            (false, _) => Ok(Self {
                api_keys: Arc::new(api_keys),
                enabled: true,
            }),
            (true, true) => {
                tracing::warn!("{API_KEYS_VAR} not set; tool routes are unauthenticated");
                Ok(Self {
                    api_keys: Arc::new(Vec::new()),
                    enabled: false,
                })
            }
            (true, false) => anyhow::bail!(
                "{API_KEYS_VAR} must list at least one bearer token outside development"
            ),
        }
    }

    fn allows(&self, token: &str) -> bool {
        // Every key is compared so timing does not reveal which one matched.
        self.api_keys
            .iter()
            .fold(subtle::Choice::from(0), |acc, key| {
                acc | key.as_bytes().ct_eq(token.as_bytes())
            })
            .into()
    }
}

#[derive(Debug)]
struct FixedWindow {
    started_at: Instant,
    used: usize,
}

impl FixedWindow {
    /// Count one request at `now`, or return how long until the window resets.
    fn try_acquire(
        &mut self,
        now: Instant,
        limit: usize,
        window: Duration,
    ) -> Result<(), Duration> {
        let elapsed = now.saturating_duration_since(self.started_at);
        if elapsed >= window {
            self.started_at = now;
            self.used = 0;
        }
        if self.used >= limit {
            return Err(window.saturating_sub(elapsed));
        }
        self.used += 1;
        Ok(())
    }
}

/// Process-wide request budget for the tool routes.
#[derive(Debug, Clone)]
pub struct RateLimitState {
    max_requests: usize,
    window: Duration,
    state: Arc<Mutex<FixedWindow>>,
}

impl RateLimitState {
    #[must_use]
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            state: Arc::new(Mutex::new(FixedWindow {
                started_at: Instant::now(),
                used: 0,
            })),
        }
    }
}

/// Short-circuit response in the same `{ error: { code, message } }` shape
/// the handlers use.
fn reject(status: StatusCode, code: &str, message: &str) -> Response {
    (
        status,
        Json(json!({ "error": { "code": code, "message": message } })),
    )
        .into_response()
}

/// Keep a caller's id only when it is short printable ASCII.
fn incoming_request_id(headers: &HeaderMap) -> Option<String> {
    let id = headers.get(&X_REQUEST_ID)?.to_str().ok()?.trim();
    let usable = !id.is_empty()
        && id.len() <= MAX_REQUEST_ID_LEN
        && id.bytes().all(|b| b.is_ascii_graphic());
    usable.then(|| id.to_string())
}

/// Tags every request with a [`RequestId`] and echoes it as `x-request-id`.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = incoming_request_id(req.headers()).unwrap_or_else(|| Uuid::new_v4().to_string());
    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        res.headers_mut().insert(X_REQUEST_ID.clone(), value);
    }
    res
}

pub async fn require_bearer_auth(
    State(auth): State<AuthState>,
    req: Request,
    next: Next,
) -> Response {
    if !auth.enabled {
        return next.run(req).await;
    }
    match bearer_token(req.headers()) {
        Some(token) if auth.allows(token) => next.run(req).await,
        _ => reject(
            StatusCode::UNAUTHORIZED,
            "unauthorized",
            "missing or invalid bearer token",
        ),
    }
}

/// Rejects with `429` and a `Retry-After` header once the window is spent.
pub async fn enforce_rate_limit(
    State(limit): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    let acquired = limit
        .state
        .lock()
        .await
        .try_acquire(Instant::now(), limit.max_requests, limit.window);

    match acquired {
        Ok(()) => next.run(req).await,
        Err(retry_in) => {
            let retry_secs = retry_in.as_secs().max(1);
            tracing::warn!(
                max_requests = limit.max_requests,
                retry_secs,
                "rate limit exceeded"
            );
            let mut res = reject(
                StatusCode::TOO_MANY_REQUESTS,
                "rate_limited",
                "rate limit exceeded",
            );
            res.headers_mut()
                .insert(RETRY_AFTER, HeaderValue::from(retry_secs));
            res
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(name: &HeaderName, value: &'static str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(name.clone(), HeaderValue::from_static(value));
        map
    }

    #[test]
    fn bearer_token_accepts_valid_header() {
        let map = headers(&AUTHORIZATION, "Bearer test-token");
        assert_eq!(bearer_token(&map), Some("test-token"));
    }

    #[test]
    fn bearer_token_rejects_other_schemes_and_blank_tokens() {
        assert_eq!(bearer_token(&headers(&AUTHORIZATION, "Basic abc123")), None);
        assert_eq!(bearer_token(&headers(&AUTHORIZATION, "Bearer   ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn auth_state_disables_when_no_keys_in_dev() {
        let state = AuthState::from_keys(None, true).expect("dev should allow missing keys");
        assert!(!state.enabled);
    }

    #[test]
    fn auth_state_requires_keys_outside_dev() {
        let err = AuthState::from_keys(Some(" , "), false).unwrap_err();
        assert!(err.to_string().contains(API_KEYS_VAR));
    }

    #[test]
    fn auth_state_matches_any_configured_key() {
        let state = AuthState::from_keys(Some("beta, alpha, beta"), false).expect("keys");
        assert!(state.enabled);
        assert!(state.allows("alpha"));
        assert!(state.allows("beta"));
        assert!(!state.allows("gamma"));
        assert!(!state.allows("alph"));
    }

    #[test]
    fn caller_request_id_is_kept_when_printable() {
        let map = headers(&X_REQUEST_ID, "req-123");
        assert_eq!(incoming_request_id(&map).as_deref(), Some("req-123"));
    }

    #[test]
    fn unusable_request_ids_are_replaced() {
        assert_eq!(incoming_request_id(&headers(&X_REQUEST_ID, "   ")), None);
        assert_eq!(incoming_request_id(&headers(&X_REQUEST_ID, "has space")), None);
        let long = "x".repeat(MAX_REQUEST_ID_LEN + 1);
        let mut map = HeaderMap::new();
        map.insert(
            X_REQUEST_ID.clone(),
            HeaderValue::from_str(&long).expect("header"),
        );
        assert_eq!(incoming_request_id(&map), None);
    }

    #[test]
    fn fixed_window_reports_time_until_reset() {
        let start = Instant::now();
        let window = Duration::from_secs(60);
        let mut fw = FixedWindow {
            started_at: start,
            used: 0,
        };

        assert!(fw.try_acquire(start, 2, window).is_ok());
        assert!(fw.try_acquire(start + Duration::from_secs(1), 2, window).is_ok());
        assert_eq!(
            fw.try_acquire(start + Duration::from_secs(20), 2, window),
            Err(Duration::from_secs(40))
        );
        assert!(fw.try_acquire(start + window, 2, window).is_ok());
    }
}
