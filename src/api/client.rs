//! HTTP binding for the URL-analysis backend.
//!
//! This module wraps the backend's REST surface behind typed methods on
//! [`ApiClient`]. All requests flow through one `send` core that injects the
//! bearer token from the injected [`Session`], and all failures are
//! normalized into [`UrlscopeError`] right here at the transport boundary:
//! anything that never produced a response becomes `Transport`, any non-2xx
//! response becomes `Api` built from the server's `{error, code?, field?}`
//! envelope when present.
//!
//! No call is ever retried; every failure propagates to the caller
//! immediately. There is no hidden resilience policy to reason about.

use crate::domain::error::{Result, UrlscopeError, UNEXPECTED_ERROR};
use crate::domain::record::{BulkAction, Page, UrlRecord};
use crate::session::Session;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Request body for the auth endpoints.
#[derive(Debug, Serialize)]
struct AuthRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// Response envelope for the auth endpoints. The optional `user` object is
/// accepted but unused by this client.
#[derive(Debug, Deserialize)]
struct AuthResponse {
    token: String,
}

/// Request body for URL submission.
#[derive(Debug, Serialize)]
struct AddUrlRequest<'a> {
    address: &'a str,
}

/// Request body for bulk actions.
#[derive(Debug, Serialize)]
struct BulkRequest<'a> {
    action: BulkAction,
    ids: &'a [i64],
}

/// Error envelope the backend attaches to non-2xx responses.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    code: Option<String>,
    field: Option<String>,
}

/// Typed client for the backend's REST surface.
///
/// Cheap to clone; the underlying `reqwest::Client` shares its connection
/// pool across clones.
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// Shared HTTP connection pool.
    http: reqwest::Client,

    /// Backend base URL, guaranteed to end with `/` so joins append.
    base_url: Url,
}

impl ApiClient {
    /// Creates a client for the backend at `base_url`.
    ///
    /// When `timeout` is `None` no client-side timeout is enforced, matching
    /// the original dashboard's behavior of letting a hung request hang.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `base_url` is not a valid absolute
    /// URL or the HTTP client cannot be constructed.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut normalized = base_url.trim().to_string();
        if !normalized.ends_with('/') {
            normalized.push('/');
        }
        let base_url = Url::parse(&normalized)
            .map_err(|e| UrlscopeError::Config(format!("invalid base URL {base_url:?}: {e}")))?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| UrlscopeError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, base_url })
    }

    /// Exchanges credentials for a token via `POST /auth/login`.
    ///
    /// # Errors
    ///
    /// Propagates transport failures and non-2xx responses unchanged.
    pub async fn login(&self, username: &str, password: &str) -> Result<String> {
        let body = AuthRequest { username, password };
        let response: AuthResponse = self
            .send_json(Method::POST, "auth/login", None, Some(&body), &[])
            .await?;
        Ok(response.token)
    }

    /// Registers an account and returns its token via `POST /auth/signup`.
    ///
    /// # Errors
    ///
    /// Propagates transport failures and non-2xx responses unchanged.
    pub async fn signup(&self, username: &str, password: &str) -> Result<String> {
        let body = AuthRequest { username, password };
        let response: AuthResponse = self
            .send_json(Method::POST, "auth/signup", None, Some(&body), &[])
            .await?;
        Ok(response.token)
    }

    /// Submits a URL for analysis via `POST /urls`.
    ///
    /// The returned record carries the server-assigned `id` and initial
    /// `queued` status; nothing is computed client-side.
    ///
    /// # Errors
    ///
    /// Propagates transport failures and non-2xx responses unchanged.
    pub async fn add_url(&self, session: &Session, address: &str) -> Result<UrlRecord> {
        let body = AddUrlRequest { address };
        self.send_json(Method::POST, "urls", session.token(), Some(&body), &[])
            .await
    }

    /// Fetches one page of records via `GET /urls?page&size[&q]`.
    ///
    /// A blank or whitespace-only `query` is omitted from the request
    /// entirely rather than sent as an empty string.
    ///
    /// # Errors
    ///
    /// Propagates transport failures and non-2xx responses unchanged.
    pub async fn fetch_urls(
        &self,
        session: &Session,
        page: u64,
        size: u64,
        query: Option<&str>,
    ) -> Result<Page> {
        let params = list_query(page, size, query);
        self.send_json(Method::GET, "urls", session.token(), None::<&()>, &params)
            .await
    }

    /// Fetches a single record via `GET /urls/:id`.
    ///
    /// # Errors
    ///
    /// Propagates transport failures and non-2xx responses unchanged.
    pub async fn fetch_url_details(&self, session: &Session, id: i64) -> Result<UrlRecord> {
        self.send_json(Method::GET, &format!("urls/{id}"), session.token(), None::<&()>, &[])
            .await
    }

    /// Applies a bulk action to the given ids via `POST /urls/bulk`.
    ///
    /// The action is not decomposed: it either succeeds as a whole or this
    /// returns the backend's error and nothing was confirmed.
    ///
    /// # Errors
    ///
    /// Propagates transport failures and non-2xx responses unchanged.
    pub async fn bulk_action(
        &self,
        session: &Session,
        action: BulkAction,
        ids: &[i64],
    ) -> Result<()> {
        let body = BulkRequest { action, ids };
        self.send(Method::POST, "urls/bulk", session.token(), Some(&body), &[])
            .await?;
        Ok(())
    }

    /// Sends a request and decodes the 2xx response body as JSON.
    async fn send_json<B: Serialize, R: serde::de::DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<&B>,
        query: &[(&str, String)],
    ) -> Result<R> {
        let text = self.send(method, path, token, body, query).await?;
        serde_json::from_str(&text).map_err(|e| UrlscopeError::Transport {
            message: format!("failed to decode response: {e}"),
        })
    }

    /// Request core shared by every endpoint.
    ///
    /// Injects the bearer token when present, issues the request once, and
    /// returns the raw body of a 2xx response. Classification into the error
    /// taxonomy happens here and nowhere else.
    async fn send<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<&B>,
        query: &[(&str, String)],
    ) -> Result<String> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| UrlscopeError::Config(format!("invalid request path {path:?}: {e}")))?;

        let _span = tracing::debug_span!("api_request", method = %method, path = %path).entered();

        let mut request = self.http.request(method, url);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        let text = response.text().await.map_err(transport_error)?;

        if status.is_success() {
            tracing::debug!(status = status.as_u16(), "request succeeded");
            Ok(text)
        } else {
            tracing::debug!(status = status.as_u16(), "request failed");
            Err(error_from_body(status.as_u16(), &text))
        }
    }
}

/// Converts a reqwest failure that produced no usable response into the
/// transport variant of the taxonomy.
fn transport_error(e: reqwest::Error) -> UrlscopeError {
    UrlscopeError::Transport {
        message: e.to_string(),
    }
}

/// Builds the application-error variant from a non-2xx response body.
///
/// Uses the server's `error` message when the body parses as the documented
/// envelope; anything else falls back to the generic message so callers
/// always have something displayable.
fn error_from_body(status: u16, body: &str) -> UrlscopeError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = parsed
        .error
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| UNEXPECTED_ERROR.to_string());

    UrlscopeError::Api {
        message,
        code: parsed.code,
        field: parsed.field,
        status: Some(status),
    }
}

/// Builds the query pairs for a list fetch.
///
/// `q` is included only when the query is non-blank after trimming.
fn list_query(page: u64, size: u64, query: Option<&str>) -> Vec<(&'static str, String)> {
    let mut params = vec![("page", page.to_string()), ("size", size.to_string())];
    if let Some(q) = query {
        let q = q.trim();
        if !q.is_empty() {
            params.push(("q", q.to_string()));
        }
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_query_is_omitted() {
        assert_eq!(
            list_query(2, 10, None),
            vec![("page", "2".to_string()), ("size", "10".to_string())]
        );
        assert_eq!(list_query(1, 10, Some("")).len(), 2);
        assert_eq!(list_query(1, 10, Some("   ")).len(), 2);
    }

    #[test]
    fn non_blank_query_is_trimmed_and_sent() {
        let params = list_query(1, 10, Some("  example  "));
        assert_eq!(params[2], ("q", "example".to_string()));
    }

    #[test]
    fn server_envelope_wins_over_fallback() {
        let err = error_from_body(422, r#"{"error": "invalid URL", "field": "address"}"#);
        match err {
            UrlscopeError::Api {
                message,
                field,
                status,
                ..
            } => {
                assert_eq!(message, "invalid URL");
                assert_eq!(field.as_deref(), Some("address"));
                assert_eq!(status, Some(422));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn unrecognized_body_falls_back_to_generic_message() {
        let err = error_from_body(502, "<html>Bad Gateway</html>");
        assert_eq!(err.message(), UNEXPECTED_ERROR);
        assert_eq!(err.status(), Some(502));
    }

    #[test]
    fn empty_error_field_also_falls_back() {
        let err = error_from_body(500, r#"{"error": ""}"#);
        assert_eq!(err.message(), UNEXPECTED_ERROR);
    }

    #[test]
    fn base_url_gains_trailing_slash() {
        let client = ApiClient::new("http://localhost:8080/api", None).unwrap();
        assert_eq!(client.base_url.as_str(), "http://localhost:8080/api/");
        assert_eq!(
            client.base_url.join("auth/login").unwrap().as_str(),
            "http://localhost:8080/api/auth/login"
        );
    }

    #[test]
    fn invalid_base_url_is_a_config_error() {
        assert!(matches!(
            ApiClient::new("not a url", None),
            Err(UrlscopeError::Config(_))
        ));
    }
}
