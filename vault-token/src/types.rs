//! Request and response shapes of the token auth backend.
//!
//! Field names follow the Vault wire format exactly. Role creation sends
//! `period` as a string while role lookup returns it as an integer; both
//! shapes are kept as Vault defines them.

use secrecy::SecretString;
use serde::{Deserialize, Deserializer, Serialize};
use std::{collections::HashMap, time::Duration};

/// Properties of a token being created.
///
/// Empty, zero and `false` fields are left out of the request so Vault
/// applies its own defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenOptions {
    /// Policies attached to the token
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub policies: Vec<String>,
    /// Do not attach the `default` policy
    #[serde(skip_serializing_if = "is_false")]
    pub no_default_policy: bool,
    /// Create the token without a parent
    #[serde(rename = "no_parent", skip_serializing_if = "is_false")]
    pub orphan: bool,
    /// Allow the token to be renewed
    #[serde(skip_serializing_if = "is_false")]
    pub renewable: bool,
    /// Display name of the token
    #[serde(skip_serializing_if = "String::is_empty")]
    pub display_name: String,
    /// Maximum number of uses, zero for unlimited
    #[serde(rename = "num_uses", skip_serializing_if = "is_zero")]
    pub max_uses: u32,
    /// Initial TTL
    #[serde(with = "duration_secs", skip_serializing_if = "Option::is_none")]
    pub ttl: Option<Duration>,
    /// Hard upper bound on the TTL
    #[serde(
        rename = "explicit_max_ttl",
        with = "duration_secs",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_ttl: Option<Duration>,
    /// Renewal period for periodic tokens
    #[serde(with = "duration_secs", skip_serializing_if = "Option::is_none")]
    pub period: Option<Duration>,
}

impl TokenOptions {
    /// Options with the given policies.
    #[must_use]
    pub fn with_policies<I, S>(policies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            policies: policies.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Set the display name.
    #[must_use]
    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    /// Create an orphan token.
    #[must_use]
    pub const fn orphan(mut self) -> Self {
        self.orphan = true;
        self
    }

    /// Make the token renewable.
    #[must_use]
    pub const fn renewable(mut self) -> Self {
        self.renewable = true;
        self
    }

    /// Set the initial TTL.
    #[must_use]
    pub const fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Set the periodic renewal window.
    #[must_use]
    pub const fn period(mut self, period: Duration) -> Self {
        self.period = Some(period);
        self
    }
}

/// A token issued by Vault. `id` is the token itself.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedToken {
    /// The token value
    #[serde(
        rename = "client_token",
        default = "empty_secret",
        deserialize_with = "secret"
    )]
    pub id: SecretString,
    /// Granted policies
    #[serde(default, deserialize_with = "nullable")]
    pub policies: Vec<String>,
    /// Token metadata
    #[serde(default, deserialize_with = "nullable")]
    pub metadata: HashMap<String, String>,
    /// Lease duration in seconds
    #[serde(default)]
    pub lease_duration: u64,
    /// Whether the token can be renewed
    #[serde(default)]
    pub renewable: bool,
}

/// Description of an existing token.
#[derive(Debug, Clone, Deserialize)]
pub struct LookedUpToken {
    /// The token value
    #[serde(default = "empty_secret", deserialize_with = "secret")]
    pub id: SecretString,
    /// Non-secret reference to the token
    #[serde(default, deserialize_with = "nullable")]
    pub accessor: String,
    /// Creation time as Unix seconds
    #[serde(default)]
    pub creation_time: u64,
    /// TTL at creation, in seconds
    #[serde(default)]
    pub creation_ttl: u64,
    /// Display name
    #[serde(default, deserialize_with = "nullable")]
    pub display_name: String,
    /// Hard TTL limit in seconds
    #[serde(rename = "explicit_max_ttl", default)]
    pub max_ttl: u64,
    /// Remaining uses, zero for unlimited
    #[serde(default)]
    pub num_uses: u64,
    /// Whether the token has no parent
    #[serde(default)]
    pub orphan: bool,
    /// Path the token was created at
    #[serde(default, deserialize_with = "nullable")]
    pub path: String,
    /// Attached policies
    #[serde(default, deserialize_with = "nullable")]
    pub policies: Vec<String>,
    /// Remaining TTL in seconds
    #[serde(default)]
    pub ttl: u64,
}

/// Result of a token renewal.
#[derive(Debug, Clone, Deserialize)]
pub struct RenewedToken {
    /// The renewed token value
    #[serde(default = "empty_secret", deserialize_with = "secret")]
    pub client_token: SecretString,
    /// Non-secret reference to the token
    #[serde(default, deserialize_with = "nullable")]
    pub accessor: String,
    /// Attached policies
    #[serde(default, deserialize_with = "nullable")]
    pub policies: Vec<String>,
    /// New lease duration in seconds
    #[serde(default)]
    pub lease_duration: u64,
    /// Whether the token can be renewed again
    #[serde(default)]
    pub renewable: bool,
}

impl RenewedToken {
    /// The new lease as a [`Duration`].
    #[must_use]
    pub const fn lease(&self) -> Duration {
        Duration::from_secs(self.lease_duration)
    }
}

/// Definition of a token role. Every field is sent, including empty ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRoleOptions {
    /// Role name, also used as the last path segment
    #[serde(rename = "role_name")]
    pub name: String,
    /// Comma-separated allowed policies
    pub allowed_policies: String,
    /// Comma-separated disallowed policies
    pub disallowed_policies: String,
    /// Issue orphan tokens
    pub orphan: bool,
    /// Period as a Vault duration string, e.g. `"24h"`
    pub period: String,
    /// Issue renewable tokens
    pub renewable: bool,
    /// Hard TTL limit in seconds
    pub explicit_max_ttl: u64,
    /// Suffix appended to the token path
    pub path_suffix: String,
    /// CIDR blocks allowed to use issued tokens
    pub bound_cidrs: Vec<String>,
}

impl TokenRoleOptions {
    /// Role options with only the name set.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// A token role as stored by Vault.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LookedUpTokenRole {
    /// Allowed policies
    #[serde(default, deserialize_with = "nullable")]
    pub allowed_policies: Vec<String>,
    /// Disallowed policies
    #[serde(default, deserialize_with = "nullable")]
    pub disallowed_policies: Vec<String>,
    /// Hard TTL limit in seconds
    #[serde(default)]
    pub explicit_max_ttl: u64,
    /// Role name
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    /// Issues orphan tokens
    #[serde(default)]
    pub orphan: bool,
    /// Suffix appended to the token path
    #[serde(default, deserialize_with = "nullable")]
    pub path_suffix: String,
    /// Period in seconds
    #[serde(default)]
    pub period: u64,
    /// Issues renewable tokens
    #[serde(default)]
    pub renewable: bool,
}

/// `{"auth": ...}` envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct AuthEnvelope<T> {
    pub auth: T,
}

/// `{"data": ...}` envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct DataEnvelope<T> {
    pub data: T,
}

/// Payload of a LIST response.
#[derive(Debug, Deserialize)]
pub(crate) struct KeyList {
    #[serde(default, deserialize_with = "nullable")]
    pub keys: Vec<String>,
}

/// Body of the lookup and renew requests.
#[derive(Serialize)]
pub(crate) struct TokenRequest<'a> {
    pub token: &'a str,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
const fn is_false(value: &bool) -> bool {
    !*value
}

#[allow(clippy::trivially_copy_pass_by_ref)]
const fn is_zero(value: &u32) -> bool {
    *value == 0
}

fn empty_secret() -> SecretString {
    SecretString::from(String::new())
}

fn secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(SecretString::from(value.unwrap_or_default()))
}

/// Treat `null` like a missing field.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Durations as whole seconds; sub-second parts are dropped.
mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    #[allow(clippy::ref_option)]
    pub fn serialize<S>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(d) => serializer.serialize_u64(d.as_secs()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = Option::<u64>::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}
