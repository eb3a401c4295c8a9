//! Google Doc HTML export to structured data.
//!
//! The conversion runs in three steps:
//!
//! 1. Parse the export into a [`Node`] tree and locate the body
//! 2. Render the body to line-oriented text ([`render_children`])
//! 3. Decode entities and straighten quotes inside inline tags ([`normalize_text`])
//!
//! The resulting text is ArchieML and is handed to [`aml_parser::load`].

mod dom;
mod link;
mod normalize;
mod render;

pub use dom::{Element, Node, document_body, parse_html};
pub use link::normalize_href;
pub use normalize::{normalize_text, straighten_tag_quotes};
pub use render::{TagKind, render, render_children};

use serde_json::Value;
use tracing::debug;

use crate::error::GdocError;

/// Convert an exported HTML document to normalized ArchieML text.
///
/// # Errors
///
/// Returns [`GdocError::Html`] if the document has no body element.
pub fn render_text(html: &str) -> Result<String, GdocError> {
    let forest = parse_html(html);
    let body = document_body(&forest)
        .ok_or_else(|| GdocError::Html("document has no body element".to_owned()))?;

    let rendered = render_children(body);
    debug!(
        "Rendered {} bytes of text from {} bytes of HTML",
        rendered.len(),
        html.len()
    );
    Ok(normalize_text(&rendered))
}

/// Convert an exported HTML document to its structured JSON value.
///
/// # Errors
///
/// Returns [`GdocError::Html`] if the document has no body element.
pub fn convert_html(html: &str) -> Result<Value, GdocError> {
    let text = render_text(html)?;
    Ok(aml_parser::load(&text))
}
