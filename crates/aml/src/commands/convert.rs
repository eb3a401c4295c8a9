//! `aml convert` command implementation.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the convert command.
#[derive(Args)]
pub(crate) struct ConvertArgs {
    /// Path to an HTML file exported from Google Docs.
    html_file: PathBuf,

    /// Write the JSON to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the normalized ArchieML text instead of JSON.
    #[arg(long, conflicts_with = "output")]
    text: bool,
}

impl ConvertArgs {
    /// Execute the convert command.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or converted.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let html = std::fs::read_to_string(&self.html_file)?;

        if self.text {
            let text = aml_gdoc::render_text(&html)?;
            io::stdout().lock().write_all(text.as_bytes())?;
            return Ok(());
        }

        match &self.output {
            Some(path) => {
                let data = aml_gdoc::convert_html(&html)?;
                aml_gdoc::write_json(path, &data)?;
                Output::new().success(&format!("Wrote {}", path.display()));
            }
            None => io::stdout().lock().write_all(to_json(&html)?.as_bytes())?,
        }
        Ok(())
    }
}

/// Convert exported HTML to pretty JSON with a trailing newline.
fn to_json(html: &str) -> Result<String, CliError> {
    let data = aml_gdoc::convert_html(html)?;
    let mut json = serde_json::to_string_pretty(&data)?;
    json.push('\n');
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_to_json() {
        let html = "<html><body><p><span>a: 1</span></p><p><span>b: two</span></p></body></html>";
        assert_eq!(to_json(html).unwrap(), "{\n  \"a\": \"1\",\n  \"b\": \"two\"\n}\n");
    }

    #[test]
    fn test_execute_writes_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("export.html");
        let output = dir.path().join("out/data.json");
        std::fs::write(&input, "<html><body><p>key: value</p></body></html>").unwrap();

        ConvertArgs {
            html_file: input,
            output: Some(output.clone()),
            text: false,
        }
        .execute()
        .unwrap();

        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            "{\n  \"key\": \"value\"\n}\n"
        );
    }

    #[test]
    fn test_execute_replaces_existing_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("export.html");
        let output = dir.path().join("data.json");
        std::fs::write(&input, "<html><body><p>key: fresh</p></body></html>").unwrap();
        std::fs::write(&output, "{\"key\": \"stale\"}").unwrap();

        ConvertArgs {
            html_file: input,
            output: Some(output.clone()),
            text: false,
        }
        .execute()
        .unwrap();

        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            "{\n  \"key\": \"fresh\"\n}\n"
        );
        // Only the input and the output remain; no temporary files are left behind.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_execute_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ConvertArgs {
            html_file: dir.path().join("missing.html"),
            output: None,
            text: false,
        }
        .execute()
        .unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
    }
}
