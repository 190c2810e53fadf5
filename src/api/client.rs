//! HTTP transport for the blog backend.
//!
//! One method per backend query. Every request goes through the same
//! pipeline: bounded timeout, optional bearer token, size-capped body read,
//! envelope decode, and a bounded retry loop for transient failures.

use std::time::Duration;

use chrono::NaiveDate;
use futures::StreamExt;
use reqwest::redirect::Policy;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use super::types::{ApiEnvelope, Article, ArticleQuery, Author, CategoryNode, JobExperience, Mission, Page, Tag};
use crate::catalog::CategoryId;

/// Hard cap on any response body. The largest legitimate payload is an
/// article body with embedded data URIs; 2 MiB is generous for that.
const MAX_RESPONSE_SIZE: usize = 2 * 1024 * 1024;

/// Per-request timeout, matching the backend's slowest endpoint (article
/// detail with a cold cache) plus headroom.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("Insecure API base URL: HTTPS required (except localhost)")]
    InsecureBaseUrl,
    #[error("Request timed out after {}s", REQUEST_TIMEOUT.as_secs())]
    Timeout,
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    #[error("Response too large (exceeds {0} bytes)")]
    ResponseTooLarge(usize),
    #[error("Invalid UTF-8 in response")]
    InvalidUtf8,
    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Backend error {code}: {message}")]
    Backend { code: i64, message: String },
    #[error("Backend returned success without data for {0}")]
    MissingData(&'static str),
}

impl ApiError {
    /// True if the failure is transient and the request should be retried.
    fn is_retryable(&self) -> bool {
        match self {
            ApiError::Timeout | ApiError::Network(_) => true,
            ApiError::HttpStatus(status) => *status >= 500,
            _ => false,
        }
    }
}

/// Redirect policy: at most 3 hops, with loop detection.
fn redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() >= 3 {
            return attempt.error("Too many redirects (max 3)");
        }
        let url = attempt.url();
        for prev in attempt.previous() {
            if prev.as_str() == url.as_str() {
                return attempt.error("Redirect loop detected");
            }
        }
        tracing::debug!(
            from = %attempt.previous().last().map(|u| u.as_str()).unwrap_or("initial"),
            to = %url,
            "Following redirect"
        );
        attempt.follow()
    })
}

/// Client for the blog backend.
///
/// Cheap to clone; the underlying `reqwest::Client` is an `Arc` internally
/// and the base/token are shared per spawn.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    /// Normalized base URL, no trailing slash.
    base: String,
    /// Optional bearer token. Only ever sent to `base` — the client never
    /// requests any other host.
    token: Option<SecretString>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base", &self.base)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl ApiClient {
    /// Build a client for `base_url`.
    ///
    /// The base must parse as an absolute URL and must be HTTPS; plain HTTP
    /// is allowed only for localhost, so a locally running backend can be
    /// used without certificates.
    pub fn new(base_url: &str, token: Option<SecretString>) -> Result<Self, ApiError> {
        let parsed =
            Url::parse(base_url).map_err(|e| ApiError::InvalidBaseUrl(e.to_string()))?;

        match parsed.scheme() {
            "https" => {}
            "http" => {
                let is_local = matches!(parsed.host_str(), Some("localhost") | Some("127.0.0.1"));
                if !is_local {
                    tracing::error!(base_url, "Rejecting non-HTTPS API base URL");
                    return Err(ApiError::InsecureBaseUrl);
                }
                tracing::warn!(base_url, "Using plain-HTTP API base URL (localhost only)");
            }
            other => return Err(ApiError::InvalidBaseUrl(format!("unsupported scheme {other}"))),
        }

        let http = reqwest::Client::builder()
            .redirect(redirect_policy())
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(60))
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    // ------------------------------------------------------------------
    // Endpoints
    // ------------------------------------------------------------------

    /// The nested category tree (children of `root_id`) with article counts.
    pub async fn category_tree(&self, root_id: CategoryId) -> Result<Vec<CategoryNode>, ApiError> {
        self.get_json("/category/tree", &[("rootId", root_id.to_string())], "category tree")
            .await
    }

    /// One page of the home feed (no category filter).
    pub async fn home_articles(&self, query: &ArticleQuery) -> Result<Page<Article>, ApiError> {
        self.get_json(
            "/article/home/page",
            &[
                ("pageNum", query.page_num.to_string()),
                ("pageSize", query.page_size.to_string()),
            ],
            "article page",
        )
        .await
    }

    /// One page of articles whose category id is in `query.category_ids`
    /// (the selected category's subtree).
    pub async fn category_articles(&self, query: &ArticleQuery) -> Result<Page<Article>, ApiError> {
        let ids = query
            .category_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.get_json(
            "/article/category/page",
            &[
                ("pageNum", query.page_num.to_string()),
                ("pageSize", query.page_size.to_string()),
                ("categoryIds", ids),
            ],
            "article page",
        )
        .await
    }

    /// Full article detail (markdown body included).
    pub async fn article(&self, article_id: i64) -> Result<Article, ApiError> {
        self.get_json(&format!("/article/{article_id}"), &[], "article")
            .await
    }

    pub async fn tags(&self) -> Result<Vec<Tag>, ApiError> {
        self.get_json("/tag/list", &[], "tag list").await
    }

    pub async fn author(&self) -> Result<Author, ApiError> {
        self.get_json("/author", &[], "author").await
    }

    pub async fn mission(&self) -> Result<Mission, ApiError> {
        self.get_json("/mission", &[], "mission").await
    }

    pub async fn job_experiences(&self) -> Result<Vec<JobExperience>, ApiError> {
        self.get_json("/job-experience/list", &[], "job experience list")
            .await
    }

    pub async fn article_total(&self) -> Result<u64, ApiError> {
        self.get_json("/article/total", &[], "article total").await
    }

    pub async fn category_total(&self) -> Result<u64, ApiError> {
        self.get_json("/category/total", &[], "category total").await
    }

    /// Distinct publish dates, newest first as the backend returns them.
    ///
    /// Dates the backend formats unexpectedly are skipped with a warning
    /// rather than failing the whole sidebar.
    pub async fn publish_dates(&self) -> Result<Vec<NaiveDate>, ApiError> {
        let raw: Vec<String> = self
            .get_json("/article/publish-dates", &[], "publish dates")
            .await?;
        Ok(raw
            .iter()
            .filter_map(|s| {
                let date_part = s.get(..10).unwrap_or(s);
                match NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
                    Ok(d) => Some(d),
                    Err(e) => {
                        tracing::warn!(value = %s, error = %e, "Skipping unparsable publish date");
                        None
                    }
                }
            })
            .collect())
    }

    // ------------------------------------------------------------------
    // Transport
    // ------------------------------------------------------------------

    /// GET `path` with retries, unwrap the envelope, and return its data.
    ///
    /// Retries transient failures (timeout, transport error, HTTP 5xx) up
    /// to [`MAX_RETRIES`] times with 1s/2s/4s backoff. Backend-level errors
    /// (`code != 0`) are never retried.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        what: &'static str,
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base, path);
        let mut retry_count = 0;

        loop {
            match self.get_json_once(&url, query, what).await {
                Ok(data) => return Ok(data),
                Err(e) if e.is_retryable() && retry_count < MAX_RETRIES => {
                    let delay = 1u64 << retry_count; // 1s, 2s, 4s
                    tracing::debug!(
                        error = %e,
                        retry = retry_count + 1,
                        delay_secs = delay,
                        url = %url,
                        "Retrying backend request after transient error"
                    );
                    tokio::time::sleep(Duration::from_secs(delay)).await;
                    retry_count += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn get_json_once<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
        what: &'static str,
    ) -> Result<T, ApiError> {
        let mut request = self.http.get(url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {}", token.expose_secret()));
        }

        let response = tokio::time::timeout(REQUEST_TIMEOUT, request.send())
            .await
            .map_err(|_| ApiError::Timeout)?
            .map_err(ApiError::Network)?;

        if !response.status().is_success() {
            return Err(ApiError::HttpStatus(response.status().as_u16()));
        }

        let body = read_limited_text(response, MAX_RESPONSE_SIZE).await?;
        let envelope: ApiEnvelope<T> = serde_json::from_str(&body)?;

        if envelope.code != 0 {
            return Err(ApiError::Backend {
                code: envelope.code,
                message: envelope.message.unwrap_or_else(|| "unknown error".to_string()),
            });
        }

        envelope.data.ok_or(ApiError::MissingData(what))
    }
}

/// Read a response body, aborting once `limit` bytes are exceeded.
async fn read_limited_text(response: reqwest::Response, limit: usize) -> Result<String, ApiError> {
    // Fast path: trust Content-Length when present
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(ApiError::ResponseTooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(ApiError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(ApiError::ResponseTooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }

    String::from_utf8(bytes).map_err(|_| ApiError::InvalidUtf8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn https_base_accepted() {
        assert!(ApiClient::new("https://blog.example.com/api", None).is_ok());
    }

    #[test]
    fn http_base_accepted_for_localhost_only() {
        assert!(ApiClient::new("http://127.0.0.1:8080/api", None).is_ok());
        assert!(ApiClient::new("http://localhost:8080", None).is_ok());
        assert!(matches!(
            ApiClient::new("http://blog.example.com/api", None),
            Err(ApiError::InsecureBaseUrl)
        ));
    }

    #[test]
    fn garbage_base_rejected() {
        assert!(matches!(
            ApiClient::new("not a url", None),
            Err(ApiError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            ApiClient::new("ftp://example.com", None),
            Err(ApiError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn trailing_slash_normalized() {
        let client = ApiClient::new("https://blog.example.com/api/", None).unwrap();
        assert_eq!(client.base_url(), "https://blog.example.com/api");
    }

    #[test]
    fn debug_masks_token() {
        let client = ApiClient::new(
            "https://blog.example.com",
            Some(SecretString::from("super-secret")),
        )
        .unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn retryable_classification() {
        assert!(ApiError::Timeout.is_retryable());
        assert!(ApiError::HttpStatus(503).is_retryable());
        assert!(!ApiError::HttpStatus(404).is_retryable());
        assert!(!ApiError::Backend {
            code: 1,
            message: "nope".into()
        }
        .is_retryable());
        assert!(!ApiError::MissingData("x").is_retryable());
    }
}
