//! Authenticated GraphQL transport.
//!
//! One request/response cycle per call: no retries, no caching. Transport
//! failures map to the typed [`ApiError`] taxonomy; GraphQL-level errors in
//! a 2xx body surface as [`ApiError::GraphQl`].

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{TimeZone, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::client::discussions::DiscussionCategory;
use crate::config::ClientConfig;

/// Maximum page size the API accepts.
pub const MAX_PAGE_SIZE: usize = 100;

/// Default cap on total items retrieved by one paged listing.
pub const DEFAULT_HARD_CAP: usize = 1000;

/// Typed failures surfaced by the API client.
///
/// All are fatal to the request that raised them; none are retried
/// automatically.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No bearer token was resolvable when a request was attempted.
    #[error("no API token configured (GITHUB_TOKEN or GH_TOKEN)")]
    AuthenticationMissing,

    /// The API rejected the token (401).
    #[error("unauthorized: the API rejected the token")]
    Unauthorized,

    /// 403 with the rate-limit-remaining signal at exactly zero.
    #[error("rate limited (resets at {})", reset.as_deref().unwrap_or("unknown"))]
    RateLimited {
        /// Reset time reported by the API, if any.
        reset: Option<String>,
    },

    /// 403 without the rate-limit signal.
    #[error("forbidden: the API denied the request")]
    Forbidden,

    /// Any other non-2xx status.
    #[error("transport failure: {status}")]
    Transport { status: String },

    /// 2xx response whose body carried a non-empty errors array.
    #[error("GraphQL error: {0}")]
    GraphQl(String),

    /// 2xx response with neither data nor errors.
    #[error("response contained neither data nor errors")]
    NoData,

    /// Network-level failure before any status was received.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Response envelope for GraphQL bodies.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQlErrorItem>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlErrorItem {
    message: String,
}

/// One page of a cursor-paginated listing.
#[derive(Debug)]
pub struct Page<T> {
    /// Items on this page.
    pub nodes: Vec<T>,
    /// Whether the origin reports further pages.
    pub has_next_page: bool,
    /// Cursor to request the next page with.
    pub end_cursor: Option<String>,
}

/// GitHub GraphQL client.
///
/// Holds the injected [`ClientConfig`] and an instance-scoped category
/// lookup cache. The token is checked lazily, only when a request is
/// attempted.
pub struct GithubClient {
    http: reqwest::Client,
    config: ClientConfig,
    pub(crate) category_cache: Mutex<HashMap<String, DiscussionCategory>>,
}

impl GithubClient {
    /// Create a client from an explicit configuration.
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            category_cache: Mutex::new(HashMap::new()),
        }
    }

    /// Create a client resolving the token from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(ClientConfig::from_env())
    }

    /// Drop all memoized category lookups.
    pub fn clear_category_cache(&self) {
        if let Ok(mut cache) = self.category_cache.lock() {
            cache.clear();
        }
    }

    /// Execute one authenticated GraphQL request.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::AuthenticationMissing`] when no token is
    /// configured, a classified transport error for non-2xx statuses, or
    /// [`ApiError::GraphQl`] / [`ApiError::NoData`] for 2xx bodies without
    /// usable data.
    pub async fn request<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, ApiError> {
        let token = self
            .config
            .token
            .as_deref()
            .ok_or(ApiError::AuthenticationMissing)?;

        let response = self
            .http
            .post(&self.config.endpoint)
            .bearer_auth(token)
            .header(reqwest::header::USER_AGENT, &self.config.user_agent)
            .json(&serde_json::json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let remaining = header_str(&response, "x-ratelimit-remaining");
            let reset = header_str(&response, "x-ratelimit-reset");
            return Err(classify_failure(
                status.as_u16(),
                &status.to_string(),
                remaining.as_deref(),
                reset.as_deref(),
            ));
        }

        let envelope: Envelope<T> = response.json().await?;
        resolve_envelope(envelope)
    }
}

/// Resolve a 2xx envelope into its data payload.
///
/// A non-empty errors array wins over any data, with the messages joined
/// into one [`ApiError::GraphQl`]. A body with neither data nor errors is
/// [`ApiError::NoData`].
fn resolve_envelope<T>(envelope: Envelope<T>) -> Result<T, ApiError> {
    if let Some(errors) = envelope.errors {
        if !errors.is_empty() {
            let joined = errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(ApiError::GraphQl(joined));
        }
    }

    envelope.data.ok_or(ApiError::NoData)
}

fn header_str(response: &reqwest::Response, name: &str) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Classify a non-2xx response into a typed failure.
///
/// 403 combined with a rate-limit-remaining signal of exactly `"0"` is a
/// rate limit; any other 403 is a plain `Forbidden`.
#[must_use]
pub fn classify_failure(
    status: u16,
    status_text: &str,
    rate_remaining: Option<&str>,
    rate_reset: Option<&str>,
) -> ApiError {
    match status {
        401 => ApiError::Unauthorized,
        403 if rate_remaining == Some("0") => ApiError::RateLimited {
            reset: rate_reset.map(format_reset),
        },
        403 => ApiError::Forbidden,
        _ => ApiError::Transport {
            status: status_text.to_string(),
        },
    }
}

/// Render the epoch-seconds reset header as RFC 3339 when parseable.
fn format_reset(raw: &str) -> String {
    raw.parse::<i64>()
        .ok()
        .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
        .map_or_else(|| raw.to_string(), |t| t.to_rfc3339())
}

/// Accumulate a cursor-paginated listing into one vector.
///
/// Repeatedly calls `fetch_page` with the cursor from the previous page,
/// stopping when the origin reports no further pages or `hard_cap` items
/// have been collected. Hitting the cap returns the partial result, not an
/// error.
///
/// # Errors
///
/// Propagates the first page fetch failure.
pub async fn collect_pages<T, F, Fut>(hard_cap: usize, mut fetch_page: F) -> Result<Vec<T>, ApiError>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>, ApiError>>,
{
    let mut items = Vec::new();
    let mut cursor = None;

    loop {
        let page = fetch_page(cursor.take()).await?;
        let has_next = page.has_next_page;
        cursor = page.end_cursor;
        items.extend(page.nodes);

        if items.len() >= hard_cap {
            items.truncate(hard_cap);
            break;
        }
        if !has_next {
            break;
        }
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_unauthorized() {
        let err = classify_failure(401, "401 Unauthorized", None, None);
        assert!(matches!(err, ApiError::Unauthorized));
    }

    #[test]
    fn test_classify_rate_limited_with_reset() {
        let err = classify_failure(403, "403 Forbidden", Some("0"), Some("1700000000"));
        match &err {
            ApiError::RateLimited { reset } => {
                let reset = reset.as_deref().unwrap();
                assert!(reset.starts_with("2023-11-14"), "unexpected reset: {reset}");
            }
            other => panic!("expected RateLimited, got {other:?}"),
        }
        assert!(err.to_string().contains("2023-11-14"));
    }

    #[test]
    fn test_classify_rate_limited_without_reset() {
        let err = classify_failure(403, "403 Forbidden", Some("0"), None);
        assert!(err.to_string().contains("unknown"));
    }

    #[test]
    fn test_classify_forbidden_when_quota_remains() {
        let err = classify_failure(403, "403 Forbidden", Some("37"), None);
        assert!(matches!(err, ApiError::Forbidden));
    }

    #[test]
    fn test_classify_transport_includes_status_text() {
        let err = classify_failure(502, "502 Bad Gateway", None, None);
        assert!(err.to_string().contains("502 Bad Gateway"));
    }

    fn parse_envelope(json: &str) -> Envelope<serde_json::Value> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_envelope_joins_multiple_errors() {
        let envelope = parse_envelope(
            r#"{"data": null, "errors": [
                {"message": "Could not resolve to a Repository"},
                {"message": "Field 'nope' doesn't exist"}
            ]}"#,
        );
        match resolve_envelope(envelope) {
            Err(ApiError::GraphQl(message)) => {
                assert_eq!(
                    message,
                    "Could not resolve to a Repository; Field 'nope' doesn't exist"
                );
            }
            other => panic!("expected GraphQl, got {other:?}"),
        }
    }

    #[test]
    fn test_envelope_empty_errors_yield_data() {
        let envelope = parse_envelope(r#"{"data": {"ok": true}, "errors": []}"#);
        let data = resolve_envelope(envelope).unwrap();
        assert_eq!(data["ok"], true);
    }

    #[test]
    fn test_envelope_without_data_or_errors_is_no_data() {
        let envelope = parse_envelope("{}");
        let result = resolve_envelope(envelope);
        assert!(matches!(result, Err(ApiError::NoData)));
    }

    #[test]
    fn test_envelope_errors_win_over_data() {
        let envelope = parse_envelope(
            r#"{"data": {"partial": 1}, "errors": [{"message": "boom"}]}"#,
        );
        let result = resolve_envelope(envelope);
        assert!(matches!(result, Err(ApiError::GraphQl(m)) if m == "boom"));
    }

    #[tokio::test]
    async fn test_collect_pages_follows_cursor() {
        // 250 items served in pages of 100 should take exactly 3 fetches.
        let total = 250;
        let page_size = 100;
        let mut fetches = 0;

        let items = collect_pages(DEFAULT_HARD_CAP, |cursor| {
            fetches += 1;
            let start: usize = cursor.map_or(0, |c| c.parse().unwrap());
            let end = (start + page_size).min(total);
            std::future::ready(Ok(Page {
                nodes: (start..end).collect::<Vec<_>>(),
                has_next_page: end < total,
                end_cursor: Some(end.to_string()),
            }))
        })
        .await
        .unwrap();

        assert_eq!(items.len(), 250);
        assert_eq!(fetches, 3);
        assert_eq!(items[0], 0);
        assert_eq!(items[249], 249);
    }

    #[tokio::test]
    async fn test_collect_pages_stops_at_hard_cap() {
        let items = collect_pages(150, |cursor| {
            let start: usize = cursor.map_or(0, |c| c.parse().unwrap());
            std::future::ready(Ok(Page {
                nodes: (start..start + 100).collect::<Vec<_>>(),
                has_next_page: true,
                end_cursor: Some((start + 100).to_string()),
            }))
        })
        .await
        .unwrap();

        assert_eq!(items.len(), 150);
    }

    #[tokio::test]
    async fn test_collect_pages_propagates_failure() {
        let result: Result<Vec<u32>, _> = collect_pages(100, |_| {
            std::future::ready(Err(ApiError::NoData))
        })
        .await;
        assert!(matches!(result, Err(ApiError::NoData)));
    }
}
