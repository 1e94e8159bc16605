//! Wire and session types for the auth flow.

use crate::error::{AuthError, Result};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use url::Url;

/// Token endpoint response body
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    /// Present on code exchange; refresh responses may rotate it
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// Tokens held after a completed login or refresh
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSet {
    /// Bearer token for API calls
    pub access_token: String,
    /// Token used to obtain new access tokens, when issued
    pub refresh_token: Option<String>,
    /// Expiry instant derived from the endpoint's `expires_in`
    pub expires_at: Option<DateTime<Utc>>,
}

impl TokenSet {
    pub(crate) fn from_response(response: TokenResponse) -> Self {
        let expires_at = response
            .expires_in
            .map(|secs| Utc::now() + Duration::seconds(secs));
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            expires_at,
        }
    }
}

/// Query parameters delivered to the callback route.
///
/// `cleaned_url` is the callback URL with the authorization parameters
/// stripped; callers should rewrite the user agent's location to it so the
/// code cannot be replayed from history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackParams {
    /// Authorization code on success
    pub code: Option<String>,
    /// Provider error on denial
    pub error: Option<String>,
    cleaned_url: Option<String>,
}

impl CallbackParams {
    /// Parse a full callback URL.
    pub fn from_url(raw: &str) -> Result<Self> {
        let url = Url::parse(raw).map_err(|e| AuthError::Parse(format!("callback URL: {e}")))?;
        let mut params = Self::from_query(url.query().unwrap_or(""));

        let mut cleaned = url.clone();
        let retained: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(k, _)| k != "code" && k != "error" && k != "state")
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        cleaned.set_query(None);
        if !retained.is_empty() {
            cleaned.query_pairs_mut().extend_pairs(retained);
        }
        params.cleaned_url = Some(cleaned.to_string());
        Ok(params)
    }

    /// Parse a bare query string (`code=...` or `error=...`).
    pub fn from_query(query: &str) -> Self {
        let mut code = None;
        let mut error = None;
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "code" => code = Some(value.into_owned()),
                "error" => error = Some(value.into_owned()),
                _ => {}
            }
        }
        Self {
            code,
            error,
            cleaned_url: None,
        }
    }

    /// The callback URL with authorization parameters removed, when the
    /// params were parsed from a full URL.
    pub fn cleaned_url(&self) -> Option<&str> {
        self.cleaned_url.as_deref()
    }
}
