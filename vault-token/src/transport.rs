//! Transport primitives the token facade is built on.
//!
//! [`Transport`] is the seam: four verbs taking an absolute API path
//! (`/v1/...`) and returning the decoded JSON body. [`HttpTransport`]
//! talks to a real Vault server with reqwest.

use crate::{
    config::{ClientConfig, HttpConfig},
    error::{TransportError, TransportResult},
};
use async_trait::async_trait;
use reqwest::{
    Client, ClientBuilder, Method,
    header::{CONTENT_TYPE, HeaderValue},
};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Header carrying the caller's token.
pub const VAULT_TOKEN_HEADER: &str = "X-Vault-Token";

const INVALID_TOKEN: &str = "token is not a valid header value";

/// Request primitives against the Vault HTTP API.
///
/// Implementations resolve `path` against the server address, attach
/// credentials and turn non-success responses into errors. An empty
/// response body is returned as [`Value::Null`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// `GET path`
    async fn get(&self, path: &str) -> TransportResult<Value>;

    /// `POST path` with an optional JSON body.
    async fn post(&self, path: &str, body: Option<&str>) -> TransportResult<Value>;

    /// `LIST path`
    async fn list(&self, path: &str) -> TransportResult<Value>;

    /// `DELETE path`
    async fn delete(&self, path: &str) -> TransportResult<Value>;
}

/// Build a configured HTTP client with rustls and connection pooling.
///
/// # Errors
///
/// Returns an error if the client cannot be built (e.g., TLS initialization fails).
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    ClientBuilder::new()
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .pool_idle_timeout(config.pool_idle_timeout)
        .pool_max_idle_per_host(config.pool_max_idle_per_host)
        .user_agent(&config.user_agent)
        .use_rustls_tls()
        .build()
}

/// reqwest-backed [`Transport`].
#[derive(Debug, Clone)]
pub struct HttpTransport {
    addr: String,
    token: SecretString,
    http: Client,
}

impl HttpTransport {
    /// Create a transport from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Http`] if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> TransportResult<Self> {
        let http = build_http_client(&config.http)?;
        Ok(Self::with_client(config, http))
    }

    /// Create a transport around an existing reqwest client.
    #[must_use]
    pub fn with_client(config: ClientConfig, http: Client) -> Self {
        Self {
            addr: config.addr,
            token: config.token,
            http,
        }
    }

    /// Server address requests are sent to.
    #[must_use]
    pub fn addr(&self) -> &str {
        &self.addr
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&str>,
    ) -> TransportResult<Value> {
        let url = format!("{}{}", self.addr, path);
        debug!(%method, path, "Sending Vault request");

        let mut token = HeaderValue::from_str(self.token.expose_secret())
            .map_err(|_| TransportError::invalid_config(INVALID_TOKEN))?;
        token.set_sensitive(true);

        let mut request = self
            .http
            .request(method, &url)
            .header(VAULT_TOKEN_HEADER, token);

        if let Some(b) = body {
            request = request
                .header(CONTENT_TYPE, "application/json")
                .body(b.to_owned());
        }

        let response = request
            .send()
            .await
            .map_err(|e| TransportError::unavailable(e.to_string()))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!(status, path, "Vault request failed");
            return Err(status_error(status, path, &text));
        }

        let bytes = response.bytes().await?;
        debug!(status, len = bytes.len(), "Vault responded");

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str) -> TransportResult<Value> {
        self.request(Method::GET, path, None).await
    }

    async fn post(&self, path: &str, body: Option<&str>) -> TransportResult<Value> {
        self.request(Method::POST, path, body).await
    }

    async fn list(&self, path: &str) -> TransportResult<Value> {
        self.request(list_method(), path, None).await
    }

    async fn delete(&self, path: &str) -> TransportResult<Value> {
        self.request(Method::DELETE, path, None).await
    }
}

fn list_method() -> Method {
    Method::from_bytes(b"LIST").unwrap_or(Method::GET)
}

/// Vault's error body: `{"errors": ["..."]}`.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<String>,
}

fn vault_errors(body: &str) -> Vec<String> {
    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.errors)
        .unwrap_or_default()
}

/// Classify a non-success response. Only the status and Vault's `errors`
/// messages are kept; the raw body is dropped.
fn status_error(status: u16, path: &str, body: &str) -> TransportError {
    match status {
        404 => TransportError::not_found(path),
        403 => TransportError::PermissionDenied(path.to_string()),
        429 => TransportError::RateLimited,
        s if s >= 500 => {
            let errors = vault_errors(body).join("; ");
            TransportError::unavailable(format!("status {s}: {errors}"))
        }
        s => TransportError::Status {
            status: s,
            errors: vault_errors(body),
        },
    }
}
