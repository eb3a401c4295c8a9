//! File metadata and export downloads.

use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use tracing::info;

use super::{DriveClient, check_status};
use crate::error::GdocError;
use crate::types::{DriveFile, HTML_MIME};

impl DriveClient {
    /// Get file metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the file is not accessible.
    pub fn get_file(&self, file_id: &str) -> Result<DriveFile, GdocError> {
        let url = format!(
            "{}/files/{}",
            self.base_url,
            utf8_percent_encode(file_id, NON_ALPHANUMERIC)
        );

        info!("Getting metadata for file {}", file_id);

        let response = self
            .agent
            .get(&url)
            .header("Authorization", &self.bearer())
            .header("Accept", "application/json")
            .call()?;

        let file: DriveFile = check_status(response)?.read_json()?;
        info!("Found file {:?} ({})", file.title, file.id);
        Ok(file)
    }

    /// Download `url` as text with the client's credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error status.
    pub fn download(&self, url: &str) -> Result<String, GdocError> {
        let response = self
            .agent
            .get(url)
            .header("Authorization", &self.bearer())
            .call()?;

        let text = check_status(response)?
            .with_config()
            .limit(u64::MAX)
            .read_to_string()?;
        Ok(text)
    }

    /// Fetch the HTML export of a Google Doc.
    ///
    /// # Errors
    ///
    /// Returns [`GdocError::MissingExportLink`] if the file cannot be exported
    /// as HTML, or an HTTP error.
    pub fn export_html(&self, file_id: &str) -> Result<String, GdocError> {
        let file = self.get_file(file_id)?;
        let link = file
            .export_link(HTML_MIME)
            .ok_or_else(|| GdocError::MissingExportLink(file_id.to_owned()))?;

        info!("Downloading HTML export of {}", file_id);
        let html = self.download(link)?;
        info!("Downloaded {} bytes", html.len());
        Ok(html)
    }
}
