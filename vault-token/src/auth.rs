//! Token auth backend operations.
//!
//! [`Auth`] is the capability callers program against; [`TokenClient`]
//! implements it on top of any [`Transport`]. Each operation is a single
//! request/response round-trip with no state kept between calls.

use crate::{
    config::ClientConfig,
    error::{TokenError, TokenResult},
    path::{TOKEN_BASE, fixup, role_path},
    transport::{HttpTransport, Transport},
    types::{
        AuthEnvelope, CreatedToken, DataEnvelope, KeyList, LookedUpToken, LookedUpTokenRole,
        RenewedToken, TokenOptions, TokenRequest, TokenRoleOptions,
    },
};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};
use zeroize::Zeroizing;

/// Manage tokens and token roles through the token auth backend.
///
/// See <https://developer.hashicorp.com/vault/api-docs/auth/token>.
#[async_trait]
pub trait Auth: Send + Sync {
    /// Create a token. Fails if Vault reports success without a token.
    async fn create_token(&self, opts: &TokenOptions) -> TokenResult<CreatedToken>;

    /// Look up a token by value.
    async fn lookup_token(&self, id: &SecretString) -> TokenResult<LookedUpToken>;

    /// Look up the token the client authenticates with.
    async fn lookup_self_token(&self) -> TokenResult<LookedUpToken>;

    /// Renew a token by `increment`, truncated to whole seconds.
    async fn renew_token(
        &self,
        id: &SecretString,
        increment: Duration,
    ) -> TokenResult<RenewedToken>;

    /// Renew the client's own token by `increment`, truncated to whole seconds.
    async fn renew_self_token(&self, increment: Duration) -> TokenResult<RenewedToken>;

    /// Names of all token roles, sorted ascending.
    async fn list_token_roles(&self) -> TokenResult<Vec<String>>;

    /// Create or replace the role named by `role.name`.
    async fn create_token_role(&self, role: &TokenRoleOptions) -> TokenResult<()>;

    /// Read a token role.
    async fn lookup_token_role(&self, name: &str) -> TokenResult<LookedUpTokenRole>;

    /// Delete a token role.
    async fn delete_token_role(&self, name: &str) -> TokenResult<()>;
}

/// [`Auth`] backed by a [`Transport`].
#[derive(Debug, Clone)]
pub struct TokenClient<T> {
    transport: T,
}

impl<T: Transport> TokenClient<T> {
    /// Create a client over `transport`.
    pub const fn new(transport: T) -> Self {
        Self { transport }
    }

    /// The underlying transport.
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Consume the client, returning the transport.
    pub fn into_transport(self) -> T {
        self.transport
    }
}

impl TokenClient<HttpTransport> {
    /// Create a client talking HTTP to the configured Vault server.
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be built.
    pub fn from_config(config: ClientConfig) -> TokenResult<Self> {
        let transport = HttpTransport::new(config)
            .map_err(|e| TokenError::transport("failed to build transport", e))?;
        Ok(Self::new(transport))
    }
}

/// Query path for a renew endpoint; sub-second increments are dropped.
fn renew_path(endpoint: &str, increment: Duration) -> String {
    let secs = increment.as_secs().to_string();
    fixup("/v1/auth", endpoint, &[("increment", secs.as_str())])
}

fn decode<R: DeserializeOwned>(value: Value, context: &str) -> TokenResult<R> {
    serde_json::from_value(value)
        .map_err(|e| TokenError::decode(context, e))
}

fn token_body(id: &SecretString) -> TokenResult<Zeroizing<String>> {
    let body = serde_json::to_string(&TokenRequest {
        token: id.expose_secret(),
    })?;
    Ok(Zeroizing::new(body))
}

#[async_trait]
impl<T: Transport> Auth for TokenClient<T> {
    #[instrument(skip_all, fields(policies = opts.policies.len()))]
    async fn create_token(&self, opts: &TokenOptions) -> TokenResult<CreatedToken> {
        const CONTEXT: &str = "failed to create token";

        let body = serde_json::to_string(opts)?;
        debug!(request = %body, "token create request");

        let value = self
            .transport
            .post(&format!("{TOKEN_BASE}/create"), Some(body.as_str()))
            .await
            .map_err(|e| TokenError::transport(CONTEXT, e))?;

        let created: AuthEnvelope<CreatedToken> = decode(value, CONTEXT)?;
        if created.auth.id.expose_secret().is_empty() {
            // most likely a response shape we failed to parse
            return Err(TokenError::EmptyTokenId);
        }

        Ok(created.auth)
    }

    #[instrument(skip_all)]
    async fn lookup_token(&self, id: &SecretString) -> TokenResult<LookedUpToken> {
        const CONTEXT: &str = "failed to lookup token";

        let body = token_body(id)?;
        let value = self
            .transport
            .post(&format!("{TOKEN_BASE}/lookup"), Some(body.as_str()))
            .await
            .map_err(|e| TokenError::transport(CONTEXT, e))?;

        let looked_up: DataEnvelope<LookedUpToken> = decode(value, CONTEXT)?;
        Ok(looked_up.data)
    }

    #[instrument(skip_all)]
    async fn lookup_self_token(&self) -> TokenResult<LookedUpToken> {
        const CONTEXT: &str = "failed to lookup self token";

        let value = self
            .transport
            .get(&format!("{TOKEN_BASE}/lookup-self"))
            .await
            .map_err(|e| TokenError::transport(CONTEXT, e))?;

        let looked_up: DataEnvelope<LookedUpToken> = decode(value, CONTEXT)?;
        Ok(looked_up.data)
    }

    #[instrument(skip_all, fields(increment_secs = increment.as_secs()))]
    async fn renew_token(
        &self,
        id: &SecretString,
        increment: Duration,
    ) -> TokenResult<RenewedToken> {
        const CONTEXT: &str = "failed to renew token";

        let body = token_body(id)?;
        let value = self
            .transport
            .post(&renew_path("token/renew", increment), Some(body.as_str()))
            .await
            .map_err(|e| TokenError::transport(CONTEXT, e))?;

        let renewed: AuthEnvelope<RenewedToken> = decode(value, CONTEXT)?;
        Ok(renewed.auth)
    }

    #[instrument(skip_all, fields(increment_secs = increment.as_secs()))]
    async fn renew_self_token(&self, increment: Duration) -> TokenResult<RenewedToken> {
        const CONTEXT: &str = "failed to self-renew token";

        let value = self
            .transport
            .post(&renew_path("token/renew-self", increment), None)
            .await
            .map_err(|e| TokenError::transport(CONTEXT, e))?;

        let renewed: AuthEnvelope<RenewedToken> = decode(value, CONTEXT)?;
        Ok(renewed.auth)
    }

    #[instrument(skip_all)]
    async fn list_token_roles(&self) -> TokenResult<Vec<String>> {
        let path = format!("{TOKEN_BASE}/roles");
        let context = format!("failed to list token roles at {path:?}");

        let value = self
            .transport
            .list(&path)
            .await
            .map_err(|e| TokenError::transport(context.as_str(), e))?;

        let listed: DataEnvelope<KeyList> = decode(value, &context)?;
        let mut keys = listed.data.keys;
        keys.sort();
        Ok(keys)
    }

    #[instrument(skip_all, fields(role = %role.name))]
    async fn create_token_role(&self, role: &TokenRoleOptions) -> TokenResult<()> {
        let body = serde_json::to_string(role)?;
        debug!(request = %body, "role-create request");

        let path = role_path(&role.name);
        let context = format!("creating role at {path:?}");
        self.transport
            .post(&path, Some(body.as_str()))
            .await
            .map_err(|e| TokenError::transport(context.as_str(), e))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn lookup_token_role(&self, name: &str) -> TokenResult<LookedUpTokenRole> {
        const CONTEXT: &str = "failed to look up role";

        let value = self
            .transport
            .get(&role_path(name))
            .await
            .map_err(|e| TokenError::transport(CONTEXT, e))?;

        let role: DataEnvelope<LookedUpTokenRole> = decode(value, CONTEXT)?;
        Ok(role.data)
    }

    #[instrument(skip(self))]
    async fn delete_token_role(&self, name: &str) -> TokenResult<()> {
        let context = format!("failed to delete role {name:?}");
        self.transport
            .delete(&role_path(name))
            .await
            .map_err(|e| TokenError::transport(context.as_str(), e))?;

        Ok(())
    }
}
