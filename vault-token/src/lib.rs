//! Client for the Vault token auth backend.
//!
//! Wraps the `/v1/auth/token/*` endpoints: token creation, lookup and
//! renewal, plus token role management. Requests go through a
//! [`Transport`]; [`HttpTransport`] is the reqwest-backed implementation.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod auth;
pub mod config;
pub mod error;
pub mod path;
pub mod telemetry;
pub mod transport;
pub mod types;

pub use auth::{Auth, TokenClient};
pub use config::{ClientConfig, HttpConfig};
pub use error::{TokenError, TokenResult, TransportError, TransportResult};
pub use transport::{HttpTransport, Transport};
pub use types::{
    CreatedToken, LookedUpToken, LookedUpTokenRole, RenewedToken, TokenOptions, TokenRoleOptions,
};
