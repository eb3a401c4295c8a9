//! Google Drive API types.

mod file;

pub use file::{DriveFile, HTML_MIME};
