//! JSON file output.

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tempfile::NamedTempFile;

use crate::error::GdocError;

/// Write `value` as pretty JSON to `path`, creating parent directories.
///
/// The data goes to a temporary file in the target directory first and is
/// renamed into place, so readers never see a partial file and a failed run
/// leaves the previous file untouched.
///
/// # Errors
///
/// Returns an error if serialization or any filesystem step fails.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), GdocError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut file = NamedTempFile::new_in(dir)?;
    serde_json::to_writer_pretty(&mut file, value)?;
    file.write_all(b"\n")?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_write_json_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("src/templates/data.json");

        write_json(&path, &json!({"a": "1"})).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, json!({"a": "1"}));
    }

    #[test]
    fn test_write_json_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, "stale").unwrap();

        write_json(&path, &json!(["fresh"])).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("fresh"));
        assert!(!content.contains("stale"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
