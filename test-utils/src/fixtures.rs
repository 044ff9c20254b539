//! Vault response bodies for testing.
//!
//! Shapes follow what the token auth backend returns, including the
//! extra fields the client ignores.

use serde_json::{Value, json};

/// Response of `POST /v1/auth/token/create`.
#[must_use]
pub fn created_token_response(id: &str) -> Value {
    json!({
        "request_id": "f00341c1-fad5-f6e6-13fd-235617f858a1",
        "lease_id": "",
        "renewable": false,
        "lease_duration": 0,
        "data": null,
        "auth": {
            "client_token": id,
            "accessor": "2c84f488-2133-4ced-87b0-570f93a76830",
            "policies": ["default", "web"],
            "token_policies": ["default", "web"],
            "metadata": {"user": "armon"},
            "lease_duration": 3600,
            "renewable": true
        }
    })
}

/// Response of `lookup` and `lookup-self`.
#[must_use]
pub fn looked_up_token_response(id: &str) -> Value {
    json!({
        "data": {
            "accessor": "8609694a-cdbc-db9b-d345-e782dbb562ed",
            "creation_time": 1_523_979_354,
            "creation_ttl": 2_764_800,
            "display_name": "ldap2-tesla",
            "entity_id": "7d2e3179-f69b-450c-7179-ac8ee8bd8ca9",
            "expire_time": "2018-05-19T11:35:54.466476215-04:00",
            "explicit_max_ttl": 0,
            "id": id,
            "meta": {"username": "tesla"},
            "num_uses": 0,
            "orphan": true,
            "path": "auth/ldap2/login/tesla",
            "policies": ["default", "testgroup2-policy"],
            "renewable": true,
            "ttl": 2_764_790
        }
    })
}

/// Response of `renew` and `renew-self`.
#[must_use]
pub fn renewed_token_response(id: &str, lease_duration: u64) -> Value {
    json!({
        "auth": {
            "client_token": id,
            "accessor": "4d3d3d1e-3e7a-4b15-9a67-05b2c2c3f0a6",
            "policies": ["web", "stage"],
            "metadata": {"user": "armon"},
            "lease_duration": lease_duration,
            "renewable": true
        }
    })
}

/// Response of `LIST /v1/auth/token/roles`.
#[must_use]
pub fn role_list_response(keys: &[&str]) -> Value {
    json!({ "data": { "keys": keys } })
}

/// Response of `GET /v1/auth/token/roles/<name>`.
#[must_use]
pub fn token_role_response(name: &str) -> Value {
    json!({
        "request_id": "075a19cd-4e56-a3ca-d956-7609819831ec",
        "data": {
            "allowed_entity_aliases": [],
            "allowed_policies": ["dev"],
            "disallowed_policies": [],
            "explicit_max_ttl": 0,
            "name": name,
            "orphan": false,
            "path_suffix": "",
            "period": 0,
            "renewable": true,
            "token_type": "default-service"
        }
    })
}

/// Vault error body.
#[must_use]
pub fn error_response(messages: &[&str]) -> Value {
    json!({ "errors": messages })
}
