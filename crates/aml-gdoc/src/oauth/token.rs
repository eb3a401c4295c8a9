//! Cached OAuth2 credentials.

use std::io::ErrorKind;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::GdocError;

/// Treat tokens this close to expiry as expired (milliseconds).
const EXPIRY_MARGIN_MS: u64 = 60_000;

/// OAuth2 credential as stored in the token cache file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StoredToken {
    /// Bearer token for API requests.
    pub access_token: String,
    /// Long-lived token used to obtain new access tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Token type (always "Bearer" for Google).
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Granted scopes, space-separated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Expiry as milliseconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<u64>,
}

fn default_token_type() -> String {
    "Bearer".to_owned()
}

/// Token endpoint response body.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub(crate) access_token: String,
    #[serde(default)]
    pub(crate) refresh_token: Option<String>,
    #[serde(default)]
    pub(crate) token_type: Option<String>,
    #[serde(default)]
    pub(crate) scope: Option<String>,
    /// Lifetime in seconds.
    #[serde(default)]
    pub(crate) expires_in: Option<u64>,
}

impl StoredToken {
    pub(crate) fn from_response(response: TokenResponse, now_ms: u64) -> Self {
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            token_type: response.token_type.unwrap_or_else(default_token_type),
            scope: response.scope,
            expiry_date: response
                .expires_in
                .map(|secs| now_ms.saturating_add(secs.saturating_mul(1000))),
        }
    }

    /// Whether the access token has expired (or is about to) at `now_ms`.
    ///
    /// Tokens without an expiry never expire.
    pub fn is_expired(&self, now_ms: u64) -> bool {
        self.expiry_date
            .is_some_and(|expiry| now_ms.saturating_add(EXPIRY_MARGIN_MS) >= expiry)
    }

    /// Load the token cache. Returns `None` if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`GdocError::TokenCache`] if the file exists but is not a token.
    pub fn load(path: &Path) -> Result<Option<Self>, GdocError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| GdocError::TokenCache {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Write the token cache, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), GdocError> {
        crate::fs::write_json(path, self)?;
        info!("Token stored to {}", path.display());
        Ok(())
    }
}

/// Current time in milliseconds since the Unix epoch.
pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn token(expiry_date: Option<u64>) -> StoredToken {
        StoredToken {
            access_token: "ya29.access".to_owned(),
            refresh_token: Some("1//refresh".to_owned()),
            token_type: "Bearer".to_owned(),
            scope: None,
            expiry_date,
        }
    }

    #[test]
    fn test_from_response_sets_expiry() {
        let response: TokenResponse = serde_json::from_str(
            r#"{"access_token": "a", "expires_in": 3599, "token_type": "Bearer", "scope": "s"}"#,
        )
        .unwrap();
        let token = StoredToken::from_response(response, 1_000);

        assert_eq!(token.access_token, "a");
        assert_eq!(token.refresh_token, None);
        assert_eq!(token.scope.as_deref(), Some("s"));
        assert_eq!(token.expiry_date, Some(1_000 + 3_599_000));
    }

    #[test]
    fn test_is_expired() {
        assert!(!token(None).is_expired(u64::MAX));
        assert!(!token(Some(1_000_000)).is_expired(0));
        assert!(token(Some(1_000_000)).is_expired(1_000_000));
        // Within the safety margin.
        assert!(token(Some(1_000_000)).is_expired(1_000_000 - 30_000));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("creds/google-token.json");
        let original = token(Some(42));

        original.save(&path).unwrap();
        let loaded = StoredToken::load(&path).unwrap();

        assert_eq!(loaded, Some(original));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = StoredToken::load(&dir.path().join("none.json")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("google-token.json");
        std::fs::write(&path, "not json").unwrap();

        let err = StoredToken::load(&path).unwrap_err();
        assert!(matches!(err, GdocError::TokenCache { .. }));
        assert!(err.to_string().contains("google-token.json"));
    }

    #[test]
    fn test_load_googleapis_format() {
        // Cache files written by other googleapis clients.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("google-token.json");
        std::fs::write(
            &path,
            r#"{"access_token":"a","refresh_token":"r","token_type":"Bearer","expiry_date":1500000000000}"#,
        )
        .unwrap();

        let loaded = StoredToken::load(&path).unwrap().unwrap();
        assert_eq!(loaded.refresh_token.as_deref(), Some("r"));
        assert_eq!(loaded.expiry_date, Some(1_500_000_000_000));
    }
}
