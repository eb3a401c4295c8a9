//! `aml fetch` command implementation.

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use aml_config::{CliSettings, Config};
use aml_gdoc::{DocumentPipeline, DriveClient, FetchResult, GoogleOAuth, acquire_token};
use clap::Args;

use super::authorize::{StdinPrompt, oauth_client};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the fetch command.
#[derive(Args)]
pub(crate) struct FetchArgs {
    /// Google Doc id (overrides config).
    #[arg(long, env = "AML_DOC_ID")]
    doc_id: Option<String>,

    /// Output JSON path (overrides config).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// HTTP timeout in seconds (overrides config).
    #[arg(long)]
    timeout: Option<u64>,

    /// Only print the authorization URL, do not open a browser.
    #[arg(long)]
    no_browser: bool,

    /// Print the JSON to stdout instead of writing the output file.
    #[arg(long)]
    stdout: bool,

    /// Path to configuration file (default: auto-discover aml.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl FetchArgs {
    /// Execute the fetch command.
    ///
    /// # Errors
    ///
    /// Returns an error if authorization, fetching or writing fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = self.cli_settings();
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let doc_id = config.require_doc_id()?;
        let oauth = oauth_client(&config)?;

        let prompt = StdinPrompt::new(&output, !self.no_browser);
        let client = authorized_client(&config, &oauth, &prompt)?;
        let pipeline = DocumentPipeline::new(&client);

        if self.stdout {
            let data = pipeline.fetch(doc_id)?;
            let mut stdout = io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, &data)?;
            writeln!(stdout)?;
            return Ok(());
        }

        output.info(&format!("Fetching document {doc_id}..."));
        let result = pipeline.run(doc_id, &config.document_resolved.output)?;
        print_fetch_result(&output, &result);
        Ok(())
    }

    fn cli_settings(&self) -> CliSettings {
        CliSettings {
            doc_id: self.doc_id.clone(),
            output: self.output.clone(),
            timeout: self.timeout,
        }
    }
}

fn authorized_client(
    config: &Config,
    oauth: &GoogleOAuth,
    prompt: &StdinPrompt<'_>,
) -> Result<DriveClient, CliError> {
    let token = acquire_token(oauth, &config.token_path, prompt)?;
    Ok(DriveClient::new(
        &token,
        config.http.timeout.map(Duration::from_secs),
    ))
}

fn print_fetch_result(output: &Output, result: &FetchResult) {
    output.success(&format!(
        "Wrote {} ({} top-level keys)",
        result.output.display(),
        result.key_count
    ));
}
