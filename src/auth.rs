use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use std::fmt;

use crate::error::{AdoError, Result};

/// Personal access token for the DevOps server.
///
/// Kept behind a newtype so it never ends up in logs through `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for Token {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(***)")
    }
}

/// Builds the headers attached to every request.
///
/// The server accepts Basic auth with any username, so the username is left
/// empty and the token goes in the password slot.
pub fn auth_headers(token: &Token) -> Result<HeaderMap> {
    let encoded = STANDARD.encode(format!(":{}", token.as_str()));

    let mut authorization = HeaderValue::from_str(&format!("Basic {encoded}"))
        .map_err(|e| AdoError::Config(format!("Invalid authorization header: {e}")))?;
    authorization.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, authorization);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
}
