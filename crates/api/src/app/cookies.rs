//! Session cookie parsing and `Set-Cookie` formatting.

use axum::http::{HeaderMap, HeaderValue, header};

use brandkit_infra::AuthSession;

use crate::config::CookieSettings;

/// Refresh tokens outlive the access token; the provider enforces the real
/// expiry, this only bounds how long the browser keeps it.
const REFRESH_MAX_AGE_SECS: i64 = 60 * 60 * 24 * 30;

/// Value of the first cookie called `name` across all `Cookie` headers.
pub fn read_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.trim().trim_matches('"'))
        .filter(|v| !v.is_empty())
}

fn format_cookie(name: &str, value: &str, max_age: i64, secure: bool) -> String {
    let mut cookie = format!("{name}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` values storing a freshly issued session.
pub fn session_cookies(
    settings: &CookieSettings,
    session: &AuthSession,
) -> Result<Vec<HeaderValue>, header::InvalidHeaderValue> {
    [
        format_cookie(
            &settings.access_name,
            &session.access_token,
            session.expires_in.max(0),
            settings.secure,
        ),
        format_cookie(
            &settings.refresh_name,
            &session.refresh_token,
            REFRESH_MAX_AGE_SECS,
            settings.secure,
        ),
    ]
    .iter()
    .map(|c| HeaderValue::from_str(c))
    .collect()
}

/// `Set-Cookie` values that make the browser drop both session cookies.
pub fn clearing_cookies(settings: &CookieSettings) -> Vec<HeaderValue> {
    [&settings.access_name, &settings.refresh_name]
        .into_iter()
        .filter_map(|name| HeaderValue::from_str(&format_cookie(name, "", 0, settings.secure)).ok())
        .collect()
}

/// Attach `Set-Cookie` values to a header map.
pub fn append_set_cookies(headers: &mut HeaderMap, values: Vec<HeaderValue>) {
    for value in values {
        headers.append(header::SET_COOKIE, value);
    }
}
