//! Shared proptest generators.

use proptest::prelude::*;
use std::time::Duration;
use vault_token::{TokenOptions, TokenRoleOptions};

/// Generate Vault-style token values.
pub fn token_id_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "s\\.[A-Za-z0-9]{24}",
        "hvs\\.[A-Za-z0-9_-]{24,90}",
        "[a-f0-9]{8}-[a-f0-9]{4}-[a-f0-9]{4}-[a-f0-9]{4}-[a-f0-9]{12}",
    ]
}

/// Generate URL-safe role names.
pub fn role_name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_-]{0,30}"
}

/// Generate policy names.
pub fn policy_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("default".to_string()),
        Just("root".to_string()),
        "[a-z][a-z0-9-]{2,20}",
    ]
}

/// Generate whole-second durations, or none.
pub fn whole_seconds_strategy() -> impl Strategy<Value = Option<Duration>> {
    proptest::option::of((0u64..=31_536_000).prop_map(Duration::from_secs))
}

/// Generate durations with a sub-second part.
pub fn increment_strategy() -> impl Strategy<Value = Duration> {
    (0u64..=1_000_000, 0u32..1_000_000_000)
        .prop_map(|(secs, nanos)| Duration::new(secs, nanos))
}

/// Generate token creation options with whole-second durations.
pub fn token_options_strategy() -> impl Strategy<Value = TokenOptions> {
    let flags = (any::<bool>(), any::<bool>(), any::<bool>());
    let durations = (
        whole_seconds_strategy(),
        whole_seconds_strategy(),
        whole_seconds_strategy(),
    );
    (
        prop::collection::vec(policy_strategy(), 0..5),
        flags,
        "[a-zA-Z0-9 _-]{0,20}",
        0u32..1000,
        durations,
    )
        .prop_map(|(policies, flags, display_name, max_uses, durations)| {
            let (no_default_policy, orphan, renewable) = flags;
            let (ttl, max_ttl, period) = durations;
            TokenOptions {
                policies,
                no_default_policy,
                orphan,
                renewable,
                display_name,
                max_uses,
                ttl,
                max_ttl,
                period,
            }
        })
}

/// Generate token role definitions.
pub fn token_role_options_strategy() -> impl Strategy<Value = TokenRoleOptions> {
    (
        role_name_strategy(),
        prop::collection::vec(policy_strategy(), 0..4),
        any::<bool>(),
        prop_oneof![Just(String::new()), "[1-9][0-9]{0,3}[smh]"],
        any::<bool>(),
        0u64..100_000,
        prop::collection::vec("10\\.[0-9]{1,3}\\.0\\.0/16", 0..3),
    )
        .prop_map(|(name, allowed, orphan, period, renewable, max_ttl, cidrs)| {
            let allowed_policies = allowed.join(",");
            TokenRoleOptions {
                name,
                allowed_policies,
                disallowed_policies: String::new(),
                orphan,
                period,
                renewable,
                explicit_max_ttl: max_ttl,
                path_suffix: String::new(),
                bound_cidrs: cidrs,
            }
        })
}
