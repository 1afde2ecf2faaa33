//! Cookie header parsing and `Set-Cookie` construction.

use axum::http::{header, HeaderMap, HeaderValue};

/// Find a cookie value by name across all `Cookie` headers.
pub fn get_cookie<'h>(headers: &'h HeaderMap, name: &str) -> Option<&'h str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find_map(|(key, value)| (key == name).then_some(value.trim_matches('"')))
}

/// Returns true if any of `names` is present with a non-empty value.
pub fn has_any_cookie<S: AsRef<str>>(headers: &HeaderMap, names: &[S]) -> bool {
    names
        .iter()
        .any(|name| get_cookie(headers, name.as_ref()).is_some_and(|v| !v.is_empty()))
}

/// Attributes shared by every cookie the service writes.
#[derive(Debug, Clone, Copy)]
pub struct CookieOptions {
    pub secure: bool,
    pub http_only: bool,
}

/// Build a `Set-Cookie` value scoped to the whole site with `SameSite=Lax`.
pub fn set_cookie(name: &str, value: &str, max_age_secs: u64, options: CookieOptions) -> Option<HeaderValue> {
    let mut cookie = format!("{name}={value}; Path=/; Max-Age={max_age_secs}; SameSite=Lax");
    if options.http_only {
        cookie.push_str("; HttpOnly");
    }
    if options.secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie).ok()
}

/// Build a `Set-Cookie` value that expires `name` immediately.
pub fn clear_cookie(name: &str) -> Option<HeaderValue> {
    HeaderValue::from_str(&format!("{name}=; Path=/; Max-Age=0; SameSite=Lax")).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(cookies: &[&str]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for c in cookies {
            map.append(header::COOKIE, HeaderValue::from_str(c).unwrap());
        }
        map
    }

    #[test]
    fn test_get_cookie() {
        let map = headers(&["theme=dark; quizhub_session=abc123", "other=\"quoted\""]);

        assert_eq!(get_cookie(&map, "quizhub_session"), Some("abc123"));
        assert_eq!(get_cookie(&map, "other"), Some("quoted"));
        assert_eq!(get_cookie(&map, "quizhub"), None);
    }

    #[test]
    fn test_has_any_cookie_ignores_empty_values() {
        let map = headers(&["quizhub_session="]);
        assert!(!has_any_cookie(&map, &["quizhub_session"]));

        let map = headers(&["__Secure-quizhub_session=t"]);
        assert!(has_any_cookie(&map, &["quizhub_session", "__Secure-quizhub_session"]));
    }

    #[test]
    fn test_set_cookie_attributes() {
        let value = set_cookie("sid", "t", 60, CookieOptions { secure: true, http_only: true }).unwrap();
        assert_eq!(value, "sid=t; Path=/; Max-Age=60; SameSite=Lax; HttpOnly; Secure");
    }
}
