//! Drive file metadata.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// MIME type of the HTML export.
pub const HTML_MIME: &str = "text/html";

/// Drive v2 file resource (the fields the pipeline reads).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    /// File ID.
    pub id: String,
    /// Document title.
    #[serde(default)]
    pub title: String,
    /// MIME type (`application/vnd.google-apps.document` for Docs).
    #[serde(default)]
    pub mime_type: Option<String>,
    /// Export URLs keyed by MIME type.
    #[serde(default)]
    pub export_links: BTreeMap<String, String>,
}

impl DriveFile {
    /// Export URL for `mime`, if the file can be exported to it.
    pub fn export_link(&self, mime: &str) -> Option<&str> {
        self.export_links.get(mime).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_drive_file() {
        let json = r#"{
            "kind": "drive#file",
            "id": "1AbC",
            "title": "Budget story",
            "mimeType": "application/vnd.google-apps.document",
            "exportLinks": {
                "text/html": "https://docs.google.com/feeds/download/documents/export/Export?id=1AbC&exportFormat=html",
                "text/plain": "https://docs.google.com/feeds/download/documents/export/Export?id=1AbC&exportFormat=txt"
            }
        }"#;
        let file: DriveFile = serde_json::from_str(json).unwrap();

        assert_eq!(file.id, "1AbC");
        assert_eq!(file.title, "Budget story");
        assert_eq!(
            file.mime_type.as_deref(),
            Some("application/vnd.google-apps.document")
        );
        assert!(file.export_link(HTML_MIME).unwrap().ends_with("exportFormat=html"));
    }

    #[test]
    fn test_binary_file_has_no_export_links() {
        let file: DriveFile =
            serde_json::from_str(r#"{"id": "x", "mimeType": "image/png"}"#).unwrap();
        assert!(file.export_link(HTML_MIME).is_none());
        assert!(file.title.is_empty());
    }
}
