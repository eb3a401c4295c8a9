//! Google Drive v2 REST API client.
//!
//! Sync HTTP client authenticated with an OAuth2 bearer token.

mod files;

use std::time::Duration;

use ureq::Agent;
use ureq::http::Response;

use crate::error::GdocError;
use crate::oauth::StoredToken;

const DRIVE_API_URL: &str = "https://www.googleapis.com/drive/v2";

/// Google Drive REST API client.
pub struct DriveClient {
    agent: Agent,
    base_url: String,
    access_token: String,
}

impl DriveClient {
    /// Create a client authenticated with `token`.
    ///
    /// `timeout` bounds each request; `None` waits indefinitely.
    pub fn new(token: &StoredToken, timeout: Option<Duration>) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(timeout)
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: DRIVE_API_URL.to_owned(),
            access_token: token.access_token.clone(),
        }
    }

    /// Value of the `Authorization` header.
    fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

/// Turn an error status into [`GdocError::HttpResponse`].
fn check_status(response: Response<ureq::Body>) -> Result<ureq::Body, GdocError> {
    let status = response.status().as_u16();
    let mut body_reader = response.into_body();

    if status >= 400 {
        let error_body = body_reader
            .read_to_string()
            .unwrap_or_else(|_| "(unable to read error body)".to_owned());
        return Err(GdocError::HttpResponse {
            status,
            body: error_body,
        });
    }
    Ok(body_reader)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_header() {
        let token = StoredToken {
            access_token: "ya29.abc".to_owned(),
            refresh_token: None,
            token_type: "Bearer".to_owned(),
            scope: None,
            expiry_date: None,
        };
        let client = DriveClient::new(&token, Some(Duration::from_secs(5)));

        assert_eq!(client.bearer(), "Bearer ya29.abc");
        assert_eq!(client.base_url, "https://www.googleapis.com/drive/v2");
    }
}
