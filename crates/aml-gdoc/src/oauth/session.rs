//! Obtaining a usable access token.

use std::path::Path;

use tracing::{info, warn};

use super::{GoogleOAuth, StoredToken, now_millis};
use crate::error::GdocError;

/// Asks the user to authorize the application.
pub trait AuthorizationPrompt {
    /// Show `url` to the user and return the code they paste back.
    ///
    /// # Errors
    ///
    /// Returns an error if the code cannot be read.
    fn authorization_code(&self, url: &str) -> std::io::Result<String>;
}

/// Return a valid token, using the cache at `token_path` when possible.
///
/// A cached token that has not expired is used as is. An expired one is
/// refreshed and the cache rewritten. If there is no cache, or the refresh
/// fails, the interactive flow runs.
///
/// # Errors
///
/// Returns an error if the cache is unreadable or authorization fails.
pub fn acquire_token(
    oauth: &GoogleOAuth,
    token_path: &Path,
    prompt: &dyn AuthorizationPrompt,
) -> Result<StoredToken, GdocError> {
    let Some(cached) = StoredToken::load(token_path)? else {
        info!("No cached token at {}", token_path.display());
        return authorize_interactive(oauth, token_path, prompt);
    };

    if !cached.is_expired(now_millis()) {
        info!("Using cached token from {}", token_path.display());
        return Ok(cached);
    }

    if cached.refresh_token.is_some() {
        match oauth.refresh(&cached) {
            Ok(token) => {
                token.save(token_path)?;
                return Ok(token);
            }
            Err(e) => warn!("Token refresh failed: {e}"),
        }
    }

    authorize_interactive(oauth, token_path, prompt)
}

/// Run the interactive flow and cache the resulting token.
///
/// # Errors
///
/// Returns [`GdocError::OAuth`] if no code is entered or the exchange fails.
pub fn authorize_interactive(
    oauth: &GoogleOAuth,
    token_path: &Path,
    prompt: &dyn AuthorizationPrompt,
) -> Result<StoredToken, GdocError> {
    let url = oauth.authorization_url();
    let code = prompt.authorization_code(&url)?;
    let code = code.trim();
    if code.is_empty() {
        return Err(GdocError::OAuth("No authorization code entered".to_owned()));
    }

    let token = oauth.exchange_code(code)?;
    token.save(token_path)?;
    Ok(token)
}
