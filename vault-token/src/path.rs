//! Request path construction.

use url::form_urlencoded;

/// Base path of the token auth backend.
pub const TOKEN_BASE: &str = "/v1/auth/token";

/// Join `prefix` and `path` with a single `/` and append `params` as a
/// form-encoded query string.
///
/// ```
/// use vault_token::path::fixup;
///
/// let p = fixup("/v1/auth", "token/renew", &[("increment", "90")]);
/// assert_eq!(p, "/v1/auth/token/renew?increment=90");
/// ```
#[must_use]
pub fn fixup(prefix: &str, path: &str, params: &[(&str, &str)]) -> String {
    let mut out = format!(
        "{}/{}",
        prefix.trim_end_matches('/'),
        path.trim_start_matches('/')
    );

    if !params.is_empty() {
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(params)
            .finish();
        out.push('?');
        out.push_str(&query);
    }

    out
}

/// Path of a named token role. The name is used as given.
#[must_use]
pub fn role_path(name: &str) -> String {
    format!("{TOKEN_BASE}/roles/{name}")
}
