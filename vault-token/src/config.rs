//! Client configuration.

use crate::error::{TransportError, TransportResult};
use secrecy::SecretString;
use std::time::Duration;

/// Default Vault address when `VAULT_ADDR` is unset.
pub const DEFAULT_ADDR: &str = "http://127.0.0.1:8200";

const USER_AGENT: &str = concat!("vault-token/", env!("CARGO_PKG_VERSION"));

/// HTTP client configuration.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Request timeout (default: 30s)
    pub timeout: Duration,
    /// Connection timeout (default: 10s)
    pub connect_timeout: Duration,
    /// Pool idle timeout (default: 90s)
    pub pool_idle_timeout: Duration,
    /// Maximum idle connections per host (default: 10)
    pub pool_max_idle_per_host: usize,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            pool_idle_timeout: Duration::from_secs(90),
            pool_max_idle_per_host: 10,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl HttpConfig {
    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set connect timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set connection pool limits.
    #[must_use]
    pub const fn with_pool_config(mut self, idle_timeout: Duration, max_idle: usize) -> Self {
        self.pool_idle_timeout = idle_timeout;
        self.pool_max_idle_per_host = max_idle;
        self
    }
}

/// Where to reach Vault and which token to present.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Vault server address, without trailing slash
    pub addr: String,
    /// Token sent as `X-Vault-Token`
    pub token: SecretString,
    /// HTTP settings
    pub http: HttpConfig,
}

impl ClientConfig {
    /// Create a new configuration.
    #[must_use]
    pub fn new(addr: impl Into<String>, token: impl Into<SecretString>) -> Self {
        Self {
            addr: normalize_addr(addr.into()),
            token: token.into(),
            http: HttpConfig::default(),
        }
    }

    /// Read configuration from the environment.
    ///
    /// - `VAULT_ADDR`: server address, default [`DEFAULT_ADDR`]
    /// - `VAULT_TOKEN`: token, required
    /// - `VAULT_CLIENT_TIMEOUT`: request timeout in seconds, optional
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::InvalidConfig`] if `VAULT_TOKEN` is unset
    /// or `VAULT_CLIENT_TIMEOUT` is not a number.
    pub fn from_env() -> TransportResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> TransportResult<Self> {
        let addr = lookup("VAULT_ADDR");
        let addr = addr.as_deref().unwrap_or(DEFAULT_ADDR);
        let token = lookup("VAULT_TOKEN")
            .filter(|t| !t.is_empty())
            .ok_or_else(|| TransportError::invalid_config("VAULT_TOKEN is not set"))?;

        let mut config = Self::new(addr, token);

        if let Some(raw) = lookup("VAULT_CLIENT_TIMEOUT") {
            let Ok(secs) = raw.trim().parse::<u64>() else {
                let msg = format!("VAULT_CLIENT_TIMEOUT is not a number: {raw}");
                return Err(TransportError::invalid_config(msg));
            };
            config.http.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Replace HTTP settings.
    #[must_use]
    pub fn with_http(mut self, http: HttpConfig) -> Self {
        self.http = http;
        self
    }

    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http.timeout = timeout;
        self
    }
}

fn normalize_addr(addr: String) -> String {
    if addr.ends_with('/') {
        addr.trim_end_matches('/').to_string()
    } else {
        addr
    }
}
