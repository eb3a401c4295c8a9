//! Fetch a Google Doc and write its structured data.
//!
//! [`DocumentPipeline`] runs the stages in order, each returning a `Result`:
//!
//! 1. Fetch the HTML export from Drive
//! 2. Parse, render and normalize it ([`render_text`])
//! 3. Parse the text as ArchieML
//! 4. Write the JSON file atomically
//!
//! A failing stage aborts the run and leaves any previous output untouched.
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> Result<(), aml_gdoc::GdocError> {
//! use std::path::Path;
//! use aml_gdoc::{DocumentPipeline, DriveClient, StoredToken};
//!
//! let token = StoredToken::load(Path::new("google-token.json"))?.expect("authorized");
//! let client = DriveClient::new(&token, None);
//! let result = DocumentPipeline::new(&client).run("1AbC", Path::new("data.json"))?;
//! println!("{} top-level keys", result.key_count);
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{error, info};

use crate::client::DriveClient;
use crate::convert::render_text;
use crate::error::GdocError;

/// Anything that can produce the HTML export of a document.
pub trait DocumentSource {
    /// Return the exported HTML for `doc_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be fetched.
    fn export_html(&self, doc_id: &str) -> Result<String, GdocError>;
}

impl DocumentSource for DriveClient {
    fn export_html(&self, doc_id: &str) -> Result<String, GdocError> {
        DriveClient::export_html(self, doc_id)
    }
}

/// Outcome of a successful run.
#[derive(Debug)]
pub struct FetchResult {
    /// The parsed document.
    pub data: Value,
    /// Where it was written.
    pub output: PathBuf,
    /// Number of top-level keys in `data`.
    pub key_count: usize,
}

/// Runs the fetch and convert stages for one document.
pub struct DocumentPipeline<'a> {
    source: &'a dyn DocumentSource,
}

impl<'a> DocumentPipeline<'a> {
    /// Create a pipeline reading from `source`.
    #[must_use]
    pub fn new(source: &'a dyn DocumentSource) -> Self {
        Self { source }
    }

    /// Fetch and convert a document without writing it.
    ///
    /// # Errors
    ///
    /// Returns an error if fetching fails or the export has no body.
    pub fn fetch(&self, doc_id: &str) -> Result<Value, GdocError> {
        info!("Fetching document {}", doc_id);
        let html = self.source.export_html(doc_id)?;

        info!("Converting HTML export");
        let text = render_text(&html)?;

        info!("Parsing ArchieML");
        Ok(aml_parser::load(&text))
    }

    /// Fetch, convert and write a document to `output`.
    ///
    /// # Errors
    ///
    /// Returns an error if any stage fails; `output` is not modified then.
    pub fn run(&self, doc_id: &str, output: &Path) -> Result<FetchResult, GdocError> {
        let result = self.fetch(doc_id).and_then(|data| {
            info!("Writing {}", output.display());
            crate::fs::write_json(output, &data)?;
            Ok(data)
        });

        match result {
            Ok(data) => {
                let key_count = data.as_object().map_or(0, serde_json::Map::len);
                info!("Wrote {} top-level keys to {}", key_count, output.display());
                Ok(FetchResult {
                    data,
                    output: output.to_path_buf(),
                    key_count,
                })
            }
            Err(e) => {
                error!("Fetching document {} failed: {}", doc_id, e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    struct StaticSource(&'static str);

    impl DocumentSource for StaticSource {
        fn export_html(&self, _doc_id: &str) -> Result<String, GdocError> {
            Ok(self.0.to_owned())
        }
    }

    struct FailingSource;

    impl DocumentSource for FailingSource {
        fn export_html(&self, doc_id: &str) -> Result<String, GdocError> {
            Err(GdocError::MissingExportLink(doc_id.to_owned()))
        }
    }

    const DOC: &str = concat!(
        "<html><head></head><body>",
        "<p><span>title: Hello</span></p>",
        "<p><span>link: <a href=\"https://www.google.com/url?q=https%3A%2F%2Fexample.com&amp;sa=D\">here</a></span></p>",
        "</body></html>"
    );

    #[test]
    fn test_fetch() {
        let source = StaticSource(DOC);
        let data = DocumentPipeline::new(&source).fetch("doc").unwrap();

        assert_eq!(
            data,
            json!({
                "title": "Hello",
                "link": "<a href=\"https://example.com\">here</a>"
            })
        );
    }

    #[test]
    fn test_run_writes_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("src/templates/data.json");
        let source = StaticSource(DOC);

        let result = DocumentPipeline::new(&source).run("doc", &output).unwrap();

        assert_eq!(result.key_count, 2);
        assert_eq!(result.output, output);
        let written: Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(written, result.data);
    }

    #[test]
    fn test_failed_run_keeps_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("data.json");
        std::fs::write(&output, "{\"old\": true}\n").unwrap();

        let err = DocumentPipeline::new(&FailingSource)
            .run("doc", &output)
            .unwrap_err();

        assert!(matches!(err, GdocError::MissingExportLink(_)));
        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            "{\"old\": true}\n"
        );
    }

    #[test]
    fn test_empty_export_yields_empty_document() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("data.json");
        let source = StaticSource("");

        // The HTML parser always synthesizes a body.
        let result = DocumentPipeline::new(&source).run("doc", &output).unwrap();
        assert_eq!(result.data, json!({}));
    }
}
