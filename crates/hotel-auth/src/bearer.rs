//! Bearer token extraction (RFC 6750 §2.1)

/// Strip an optional `Bearer ` scheme from an authorization value.
///
/// API Gateway hands token authorizers the raw header value, which some
/// clients send as a bare token. Returns `None` for blank input.
pub fn extract_bearer_token(value: &str) -> Option<&str> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = match value.split_once(char::is_whitespace) {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        _ => value,
    };
    (!token.is_empty()).then_some(token)
}

/// Find the `Authorization` header among `headers`, ignoring name case
pub fn authorization_header<'a, I>(headers: I) -> Option<&'a str>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    headers
        .into_iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("authorization"))
        .map(|(_, value)| value)
}
