//! Property-based tests for the token client.
//!
//! Tests validate:
//! - Request bodies decode back to the options they were built from
//! - Token values never appear in returned errors
//! - Renew increments are truncated to whole seconds
//! - Role listings are sorted client-side
//! - Role path and `role_name` come from the same field

use proptest::prelude::*;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use std::time::Duration;
use test_utils::fixtures::{
    created_token_response, looked_up_token_response, renewed_token_response, role_list_response,
    token_role_response,
};
use test_utils::generators::{
    increment_strategy, role_name_strategy, token_id_strategy, token_options_strategy,
    token_role_options_strategy,
};
use test_utils::{MockTransport, Verb};
use vault_token::{Auth, TokenClient, TokenError, TokenOptions, TokenRoleOptions, TransportError};

const FAILURE_KINDS: usize = 4;

/// A transport failure of the given kind.
fn failure(kind: usize) -> TransportError {
    match kind % FAILURE_KINDS {
        0 => TransportError::unavailable("status 503: Vault is sealed"),
        1 => TransportError::PermissionDenied("/v1/auth/token/lookup".to_string()),
        2 => TransportError::Status {
            status: 400,
            errors: vec!["bad token".to_string()],
        },
        _ => TransportError::RateLimited,
    }
}

fn client_with(reply: Value) -> TokenClient<MockTransport> {
    TokenClient::new(MockTransport::new().with_reply(reply))
}

fn failing_client(kind: usize) -> TokenClient<MockTransport> {
    TokenClient::new(MockTransport::new().with_error(failure(kind)))
}

/// Run every operation against a failing transport, pairing each error
/// with the context it should carry.
async fn failed_operations(
    kind: usize,
    id: &str,
    name: &str,
) -> Vec<(&'static str, Option<TokenError>)> {
    let secret = SecretString::from(id);
    let opts = TokenOptions::default();
    let role = TokenRoleOptions::new(name);
    let increment = Duration::from_secs(1);

    let create = failing_client(kind).create_token(&opts).await.err();
    let lookup = failing_client(kind).lookup_token(&secret).await.err();
    let lookup_self = failing_client(kind).lookup_self_token().await.err();
    let renew = failing_client(kind).renew_token(&secret, increment).await;
    let renew_self = failing_client(kind).renew_self_token(increment).await;
    let list = failing_client(kind).list_token_roles().await.err();
    let create_role = failing_client(kind).create_token_role(&role).await.err();
    let lookup_role = failing_client(kind).lookup_token_role(name).await.err();
    let delete_role = failing_client(kind).delete_token_role(name).await.err();

    vec![
        ("failed to create token", create),
        ("failed to lookup token", lookup),
        ("failed to lookup self token", lookup_self),
        ("failed to renew token", renew.err()),
        ("failed to self-renew token", renew_self.err()),
        ("failed to list token roles", list),
        ("creating role at", create_role),
        ("failed to look up role", lookup_role),
        ("failed to delete role", delete_role),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// For any options, the create request body decodes back to the same options.
    #[test]
    fn prop_create_token_body_round_trips(opts in token_options_strategy()) {
        let client = client_with(created_token_response("s.issued"));

        let created = tokio_test::block_on(client.create_token(&opts)).unwrap();
        prop_assert_eq!(created.id.expose_secret(), "s.issued");

        let call = client.transport().last_call().unwrap();
        prop_assert_eq!(call.verb, Verb::Post);
        prop_assert_eq!(call.path.as_str(), "/v1/auth/token/create");

        let decoded: TokenOptions = serde_json::from_str(call.body.as_deref().unwrap()).unwrap();
        prop_assert_eq!(decoded, opts);
    }

    /// Failed lookups never include the queried token in the error text.
    #[test]
    fn prop_lookup_error_does_not_leak_token(
        id in token_id_strategy(),
        kind in 0..FAILURE_KINDS,
    ) {
        let client = failing_client(kind);
        let secret = SecretString::from(id.clone());

        let err = tokio_test::block_on(client.lookup_token(&secret)).unwrap_err();
        let text = err.to_string();
        let debug = format!("{err:?}");
        prop_assert!(!text.contains(&id), "error leaked token: {}", text);
        prop_assert!(!debug.contains(&id), "error debug leaked token: {}", debug);
        prop_assert!(text.starts_with("failed to lookup token: "));

        let call = client.transport().last_call().unwrap();
        prop_assert_eq!(call.json_body(), Some(json!({ "token": id })));
    }

    /// Failed self lookups are wrapped and send no request body.
    #[test]
    fn prop_lookup_self_error_wrapped(kind in 0..FAILURE_KINDS) {
        let client = failing_client(kind);

        let err = tokio_test::block_on(client.lookup_self_token()).unwrap_err();
        let text = err.to_string();
        prop_assert!(text.starts_with("failed to lookup self token: "));
        prop_assert!(err.transport_error().is_some());

        let call = client.transport().last_call().unwrap();
        prop_assert_eq!(call.verb, Verb::Get);
        prop_assert_eq!(call.body, None);
    }

    /// Renew increments are sent as truncated whole seconds.
    #[test]
    fn prop_renew_increment_truncated(
        id in token_id_strategy(),
        increment in increment_strategy(),
    ) {
        let secs = increment.as_secs();
        let transport = MockTransport::new()
            .with_reply(renewed_token_response(&id, secs))
            .with_reply(renewed_token_response(&id, secs));
        let client = TokenClient::new(transport);
        let secret = SecretString::from(id.clone());

        let renewed = tokio_test::block_on(client.renew_token(&secret, increment)).unwrap();
        prop_assert_eq!(renewed.lease_duration, secs);
        tokio_test::block_on(client.renew_self_token(increment)).unwrap();

        let calls = client.transport().calls();
        prop_assert_eq!(calls.len(), 2);

        let renew_path = format!("/v1/auth/token/renew?increment={secs}");
        prop_assert_eq!(calls[0].path.clone(), renew_path);
        prop_assert_eq!(calls[0].json_body(), Some(json!({ "token": id })));

        let renew_self_path = format!("/v1/auth/token/renew-self?increment={secs}");
        prop_assert_eq!(calls[1].path.clone(), renew_self_path);
        prop_assert_eq!(calls[1].body.clone(), None);
    }

    /// Role listings come back sorted whatever order Vault uses.
    #[test]
    fn prop_list_token_roles_sorted(names in prop::collection::vec(role_name_strategy(), 0..20)) {
        let keys: Vec<&str> = names.iter().map(String::as_str).collect();
        let client = client_with(role_list_response(&keys));

        let listed = tokio_test::block_on(client.list_token_roles()).unwrap();

        let mut expected = names.clone();
        expected.sort();
        prop_assert_eq!(listed, expected);

        let call = client.transport().last_call().unwrap();
        prop_assert_eq!(call.verb, Verb::List);
        prop_assert_eq!(call.path.as_str(), "/v1/auth/token/roles");
    }

    /// The role path segment and `role_name` body field agree.
    #[test]
    fn prop_create_role_path_matches_body(role in token_role_options_strategy()) {
        let client = TokenClient::new(MockTransport::new());

        tokio_test::block_on(client.create_token_role(&role)).unwrap();

        let call = client.transport().last_call().unwrap();
        let expected_path = format!("/v1/auth/token/roles/{}", role.name);
        prop_assert_eq!(call.verb, Verb::Post);
        prop_assert_eq!(call.path.clone(), expected_path);

        let body = call.json_body().unwrap();
        prop_assert_eq!(body["role_name"].as_str(), Some(role.name.as_str()));
        prop_assert_eq!(body["period"].as_str(), Some(role.period.as_str()));

        let decoded: TokenRoleOptions = serde_json::from_value(body).unwrap();
        prop_assert_eq!(decoded, role);
    }

    /// Any transport failure surfaces wrapped with operation context.
    #[test]
    fn prop_transport_failure_wrapped(
        id in token_id_strategy(),
        name in role_name_strategy(),
        kind in 0..FAILURE_KINDS,
    ) {
        let cases = tokio_test::block_on(failed_operations(kind, &id, &name));
        prop_assert_eq!(cases.len(), 9);

        for (context, err) in cases {
            let err = err.unwrap();
            let text = err.to_string();
            prop_assert!(matches!(err, TokenError::Transport { .. }), "{:?}", err);
            prop_assert!(text.starts_with(context), "{} does not start with {}", text, context);
            prop_assert!(!text.contains(&id), "error leaked token: {}", text);
            prop_assert!(err.transport_error().is_some());
        }
    }
}

#[tokio::test]
async fn test_create_token_rejects_empty_id() {
    let client = client_with(created_token_response(""));

    let opts = TokenOptions::default();
    let err = client.create_token(&opts).await.unwrap_err();

    assert!(matches!(err, TokenError::EmptyTokenId));
    assert_eq!(err.to_string(), "create token returned empty id");
    assert_eq!(client.transport().count(), 1);
}

#[tokio::test]
async fn test_create_token_without_auth_envelope_fails() {
    let client = client_with(json!({"data": {}}));

    let opts = TokenOptions::default();
    let err = client.create_token(&opts).await.unwrap_err();

    assert!(matches!(err, TokenError::Decode { .. }));
    assert!(err.to_string().starts_with("failed to create token"));
}

#[tokio::test]
async fn test_created_token_fields() {
    let client = client_with(created_token_response("s.new"));

    let opts = TokenOptions::with_policies(["web"]).renewable();
    let created = client.create_token(&opts).await.unwrap();

    assert_eq!(created.id.expose_secret(), "s.new");
    assert_eq!(created.policies, vec!["default", "web"]);
    assert_eq!(created.lease_duration, 3600);
    assert!(created.renewable);

    let user = created.metadata.get("user").map(String::as_str);
    assert_eq!(user, Some("armon"));

    let call = client.transport().last_call().unwrap();
    let body = call.json_body().unwrap();
    assert_eq!(body, json!({"policies": ["web"], "renewable": true}));
}

#[tokio::test]
async fn test_lookup_token_fields() {
    let client = client_with(looked_up_token_response("s.abc"));

    let id = SecretString::from("s.abc");
    let token = client.lookup_token(&id).await.unwrap();

    assert_eq!(token.id.expose_secret(), "s.abc");
    assert_eq!(token.accessor, "8609694a-cdbc-db9b-d345-e782dbb562ed");
    assert_eq!(token.creation_time, 1_523_979_354);
    assert_eq!(token.creation_ttl, 2_764_800);
    assert_eq!(token.display_name, "ldap2-tesla");
    assert!(token.orphan);
    assert_eq!(token.path, "auth/ldap2/login/tesla");
    assert_eq!(token.ttl, 2_764_790);
}

#[tokio::test]
async fn test_lookup_self_uses_get() {
    let client = client_with(looked_up_token_response("s.me"));

    let token = client.lookup_self_token().await.unwrap();

    assert_eq!(token.id.expose_secret(), "s.me");
    let call = client.transport().last_call().unwrap();
    assert_eq!(call.verb, Verb::Get);
    assert_eq!(call.path, "/v1/auth/token/lookup-self");
}

#[tokio::test]
async fn test_renew_truncates_fractional_seconds() {
    let client = client_with(renewed_token_response("s.r", 90));

    let id = SecretString::from("s.r");
    let increment = Duration::from_secs_f64(90.9);
    let renewed = client.renew_token(&id, increment).await.unwrap();

    assert_eq!(renewed.lease(), Duration::from_secs(90));
    let call = client.transport().last_call().unwrap();
    assert_eq!(call.path, "/v1/auth/token/renew?increment=90");
}

#[tokio::test]
async fn test_list_token_roles_sorts_keys() {
    let client = client_with(role_list_response(&["c", "a", "b"]));

    let roles = client.list_token_roles().await.unwrap();
    assert_eq!(roles, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn test_create_token_role_request() {
    let client = TokenClient::new(MockTransport::new());
    let role = TokenRoleOptions {
        renewable: true,
        ..TokenRoleOptions::new("my-role")
    };

    client.create_token_role(&role).await.unwrap();

    let call = client.transport().last_call().unwrap();
    assert_eq!(call.path, "/v1/auth/token/roles/my-role");

    let raw = call.body.as_deref().unwrap();
    assert!(raw.contains(r#""role_name":"my-role""#));
    assert_eq!(call.json_body().unwrap()["renewable"], json!(true));
}

#[tokio::test]
async fn test_lookup_token_role() {
    let client = client_with(token_role_response("my-role"));

    let role = client.lookup_token_role("my-role").await.unwrap();

    assert_eq!(role.name, "my-role");
    assert_eq!(role.allowed_policies, vec!["dev"]);
    assert_eq!(role.period, 0);
    assert!(role.renewable);

    let call = client.transport().last_call().unwrap();
    assert_eq!(call.verb, Verb::Get);
    assert_eq!(call.path, "/v1/auth/token/roles/my-role");
}

#[tokio::test]
async fn test_delete_token_role() {
    let client = TokenClient::new(MockTransport::new());

    client.delete_token_role("my-role").await.unwrap();

    let call = client.transport().last_call().unwrap();
    assert_eq!(call.verb, Verb::Delete);
    assert_eq!(call.path, "/v1/auth/token/roles/my-role");
}

#[tokio::test]
async fn test_delete_error_names_role() {
    let missing = TransportError::not_found("/v1/auth/token/roles/gone");
    let client = TokenClient::new(MockTransport::new().with_error(missing));

    let err = client.delete_token_role("gone").await.unwrap_err();

    let text = err.to_string();
    assert!(text.starts_with(r#"failed to delete role "gone": "#));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_client_is_usable_as_trait_object() {
    let client: Box<dyn Auth> = Box::new(client_with(role_list_response(&["z", "y"])));

    let roles = client.list_token_roles().await.unwrap();
    assert_eq!(roles, vec!["y", "z"]);
}
