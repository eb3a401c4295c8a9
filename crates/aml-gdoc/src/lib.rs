//! Google Doc to ArchieML JSON.
//!
//! Exports a Google Doc as HTML through the Drive API, reduces it to plain
//! ArchieML text and parses that into JSON.
//!
//! # Quick Start
//!
//! ```
//! use aml_gdoc::convert_html;
//!
//! let html = "<html><body><p><span>headline: Hello</span></p></body></html>";
//! let data = convert_html(html).unwrap();
//! assert_eq!(data["headline"], "Hello");
//! ```
//!
//! # Modules
//!
//! - [`convert`]: HTML to normalized ArchieML text
//! - [`oauth`]: Google OAuth2 and the token cache
//! - [`pipeline`]: fetch, convert and write a document

mod client;
pub mod convert;
mod error;
mod fs;
pub mod oauth;
pub mod pipeline;
mod types;

pub use client::DriveClient;
pub use convert::{convert_html, render_text};
pub use error::GdocError;
pub use fs::write_json;
pub use oauth::{AuthorizationPrompt, GoogleOAuth, StoredToken, acquire_token};
pub use pipeline::{DocumentPipeline, DocumentSource, FetchResult};
pub use types::{DriveFile, HTML_MIME};
