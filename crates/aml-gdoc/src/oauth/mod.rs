//! Google OAuth2 for installed applications.
//!
//! The user opens [`GoogleOAuth::authorization_url`] in a browser, grants
//! read-only Drive access, and pastes back the code, which is exchanged for an
//! access token plus a refresh token. Tokens are cached on disk as
//! [`StoredToken`] and refreshed when they expire.

mod session;
mod token;

pub use session::{AuthorizationPrompt, acquire_token, authorize_interactive};
pub use token::StoredToken;

pub(crate) use token::now_millis;

use std::time::Duration;

use tracing::info;
use ureq::Agent;
use url::form_urlencoded;

use crate::error::GdocError;
use token::TokenResponse;

/// Read-only Drive scope; enough to export documents.
pub const DRIVE_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/drive.readonly";

const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// OAuth2 client for Google's installed-application flow.
pub struct GoogleOAuth {
    agent: Agent,
    client_id: String,
    client_secret: String,
    redirect_url: String,
    auth_url: String,
    token_url: String,
}

impl GoogleOAuth {
    /// Create a client from the registered application credentials.
    pub fn new(
        client_id: &str,
        client_secret: &str,
        redirect_url: &str,
        timeout: Option<Duration>,
    ) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(timeout)
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            client_id: client_id.to_owned(),
            client_secret: client_secret.to_owned(),
            redirect_url: redirect_url.to_owned(),
            auth_url: AUTH_URL.to_owned(),
            token_url: TOKEN_URL.to_owned(),
        }
    }

    /// URL the user must visit to grant access.
    ///
    /// Requests offline access and forces the consent screen so a refresh
    /// token is always issued.
    #[must_use]
    pub fn authorization_url(&self) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("access_type", "offline")
            .append_pair("approval_prompt", "force")
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", &self.redirect_url)
            .append_pair("scope", DRIVE_READONLY_SCOPE)
            .finish();
        format!("{}?{query}", self.auth_url)
    }

    /// Exchange an authorization code for tokens.
    ///
    /// # Errors
    ///
    /// Returns [`GdocError::OAuth`] if the request fails or the code is rejected.
    pub fn exchange_code(&self, code: &str) -> Result<StoredToken, GdocError> {
        let response = self.request_token(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("redirect_uri", &self.redirect_url),
        ])?;
        Ok(StoredToken::from_response(response, now_millis()))
    }

    /// Obtain a fresh access token using the refresh token of `token`.
    ///
    /// The refresh token is carried over when the server does not issue a new one.
    ///
    /// # Errors
    ///
    /// Returns [`GdocError::OAuth`] if `token` has no refresh token or the
    /// refresh is rejected.
    pub fn refresh(&self, token: &StoredToken) -> Result<StoredToken, GdocError> {
        let refresh_token = token
            .refresh_token
            .as_deref()
            .ok_or_else(|| GdocError::OAuth("No refresh token available".to_owned()))?;

        info!("Refreshing access token");
        let response = self.request_token(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
        ])?;

        let mut refreshed = StoredToken::from_response(response, now_millis());
        if refreshed.refresh_token.is_none() {
            refreshed.refresh_token = Some(refresh_token.to_owned());
        }
        Ok(refreshed)
    }

    /// POST a form to the token endpoint.
    fn request_token(&self, form: &[(&str, &str)]) -> Result<TokenResponse, GdocError> {
        let response = self
            .agent
            .post(&self.token_url)
            .header("Accept", "application/json")
            .send_form(form.iter().copied())
            .map_err(|e| GdocError::OAuth(format!("Token request failed: {e}")))?;

        let status = response.status().as_u16();
        let mut body_reader = response.into_body();
        let body = body_reader
            .read_to_string()
            .map_err(|e| GdocError::OAuth(format!("Failed to read response: {e}")))?;

        if status >= 400 {
            return Err(GdocError::OAuth(format!(
                "Token request failed ({status}): {body}"
            )));
        }

        serde_json::from_str(&body)
            .map_err(|e| GdocError::OAuth(format!("Invalid token response: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GoogleOAuth {
        GoogleOAuth::new(
            "123.apps.googleusercontent.com",
            "secret",
            "urn:ietf:wg:oauth:2.0:oob",
            None,
        )
    }

    #[test]
    fn test_authorization_url() {
        let url = client().authorization_url();

        assert!(url.starts_with("https://accounts.google.com/o/oauth2/auth?"));
        assert!(url.contains("access_type=offline"));
        assert!(url.contains("approval_prompt=force"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("client_id=123.apps.googleusercontent.com"));
        assert!(url.contains("redirect_uri=urn%3Aietf%3Awg%3Aoauth%3A2.0%3Aoob"));
        assert!(url.contains("scope=https%3A%2F%2Fwww.googleapis.com%2Fauth%2Fdrive.readonly"));
        assert!(!url.contains("secret"));
    }

    #[test]
    fn test_refresh_without_refresh_token() {
        let token = StoredToken {
            access_token: "a".to_owned(),
            refresh_token: None,
            token_type: "Bearer".to_owned(),
            scope: None,
            expiry_date: Some(0),
        };

        let err = client().refresh(&token).unwrap_err();
        assert!(matches!(err, GdocError::OAuth(_)));
        assert!(err.to_string().contains("refresh token"));
    }
}
