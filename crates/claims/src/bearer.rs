//! `Authorization` header helpers for forwarding tokens between services.

/// Token part of a `Bearer` header (scheme matched case-insensitively).
///
/// A header without the `Bearer` scheme yields `None`; a bare token is not
/// passed through as if it were one.
pub fn extract_bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(char::is_whitespace)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    if token.is_empty() { None } else { Some(token) }
}

/// Header value for `token`, unless it already carries the prefix.
pub fn build_auth_header(token: &str) -> String {
    if token.starts_with("Bearer ") {
        token.to_string()
    } else {
        format!("Bearer {token}")
    }
}
