//! # HTTP Basic Credentials

use axum::http::{header, HeaderMap};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::errors::{AuthError, AuthResult};

const BASIC_SCHEME: &str = "basic";

/// Username and password supplied by a client
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

// Keep passwords out of logs
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Parse the `Authorization` header.
    ///
    /// The scheme is matched case-insensitively. The password is everything
    /// after the first `:` and may itself contain colons.
    pub fn from_headers(headers: &HeaderMap) -> AuthResult<Self> {
        let value = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AuthError::MissingCredentials)?;
        Self::from_authorization(value)
    }

    pub fn from_authorization(value: &str) -> AuthResult<Self> {
        let (scheme, payload) = value
            .trim()
            .split_once(' ')
            .ok_or(AuthError::MissingCredentials)?;
        if !scheme.eq_ignore_ascii_case(BASIC_SCHEME) {
            return Err(AuthError::MissingCredentials);
        }

        let decoded = STANDARD
            .decode(payload.trim())
            .map_err(|_| AuthError::MalformedCredentials)?;
        let decoded = String::from_utf8(decoded).map_err(|_| AuthError::MalformedCredentials)?;

        let (username, password) = decoded
            .split_once(':')
            .ok_or(AuthError::InvalidCredentials)?;
        Ok(Self::new(username, password))
    }

    /// Value for an `Authorization` header carrying these credentials
    pub fn to_header_value(&self) -> String {
        let raw = format!("{}:{}", self.username, self.password);
        format!("Basic {}", STANDARD.encode(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_parse_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Basic YWxpY2U6c2VjcmV0"),
        );
        let creds = Credentials::from_headers(&headers).unwrap();
        assert_eq!(creds, Credentials::new("alice", "secret"));
    }

    #[test]
    fn test_password_may_contain_colon() {
        let header = Credentials::new("bob", "a:b:c").to_header_value();
        let creds = Credentials::from_authorization(&header).unwrap();
        assert_eq!(creds.password, "a:b:c");
    }

    #[test]
    fn test_scheme_case_insensitive() {
        let creds = Credentials::from_authorization("BASIC YWxpY2U6c2VjcmV0").unwrap();
        assert_eq!(creds.username, "alice");
    }

    #[test]
    fn test_missing_header() {
        let err = Credentials::from_headers(&HeaderMap::new()).unwrap_err();
        assert_eq!(err, AuthError::MissingCredentials);
    }

    #[test]
    fn test_other_scheme() {
        let err = Credentials::from_authorization("Bearer abc.def").unwrap_err();
        assert_eq!(err, AuthError::MissingCredentials);
    }

    #[test]
    fn test_bad_base64() {
        let err = Credentials::from_authorization("Basic !!!not-base64").unwrap_err();
        assert_eq!(err, AuthError::MalformedCredentials);
    }

    #[test]
    fn test_no_separator() {
        // "alice" without ':'
        let err = Credentials::from_authorization("Basic YWxpY2U=").unwrap_err();
        assert_eq!(err, AuthError::InvalidCredentials);
    }

    #[test]
    fn test_debug_hides_password() {
        let rendered = format!("{:?}", Credentials::new("alice", "secret"));
        assert!(!rendered.contains("secret"));
    }
}
