//! Error types for the Google Doc pipeline.

use std::path::PathBuf;

/// Error from fetching, converting or writing a document.
#[derive(Debug, thiserror::Error)]
pub enum GdocError {
    /// HTTP request failed (network error, TLS, etc).
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] ureq::Error),

    /// HTTP response error (server returned error status).
    #[error("HTTP error: {status} - {body}")]
    HttpResponse {
        /// HTTP status code.
        status: u16,
        /// Response body (may contain error details).
        body: String,
    },

    /// OAuth authorization or token exchange error.
    #[error("OAuth error: {0}")]
    OAuth(String),

    /// The Drive file has no HTML export (not a Google Doc).
    #[error("document {0} has no text/html export link")]
    MissingExportLink(String),

    /// The exported HTML does not have the expected structure.
    #[error("HTML error: {0}")]
    Html(String),

    /// The cached token file exists but cannot be parsed.
    #[error("invalid token cache {}: {source}", path.display())]
    TokenCache {
        /// Token cache path.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
