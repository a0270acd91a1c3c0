//! The `token` cookie carrying the bearer token.

use axum::http::{header, HeaderMap};
use tower_sessions::cookie::{Cookie, SameSite};

pub const TOKEN_COOKIE: &str = "token";

/// Read the token cookie from the request headers.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| Cookie::split_parse(value))
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
}

/// HTTP-only cookie holding a freshly issued token.
pub fn token_cookie(value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, value))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .build()
}

/// Cookie that makes the browser drop the token immediately.
pub fn removal_cookie(secure: bool) -> Cookie<'static> {
    let mut cookie = token_cookie(String::new(), secure);
    cookie.make_removal();
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_token_from_headers() {
        let mut headers = HeaderMap::new();
        assert_eq!(token_from_headers(&headers), None);

        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("id=session; token=abc123; theme=dark"),
        );
        assert_eq!(token_from_headers(&headers).as_deref(), Some("abc123"));
    }

    #[test]
    fn test_token_cookie_attributes() {
        let cookie = token_cookie("abc123".to_string(), false).to_string();
        assert!(cookie.starts_with("token=abc123"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Path=/"));
        assert!(!cookie.contains("Secure"));

        assert!(token_cookie("x".to_string(), true).to_string().contains("Secure"));
    }

    #[test]
    fn test_removal_cookie_expires_immediately() {
        let cookie = removal_cookie(false).to_string();
        assert!(cookie.starts_with("token=;"));
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.contains("Expires="));
    }
}
