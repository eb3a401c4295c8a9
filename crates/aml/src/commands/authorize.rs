//! `aml authorize` command implementation.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::Duration;

use aml_config::Config;
use aml_gdoc::oauth::authorize_interactive;
use aml_gdoc::{AuthorizationPrompt, GoogleOAuth};
use clap::Args;
use tracing::debug;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the authorize command.
#[derive(Args)]
pub(crate) struct AuthorizeArgs {
    /// Path to configuration file (default: auto-discover aml.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Only print the authorization URL, do not open a browser.
    #[arg(long)]
    no_browser: bool,
}

impl AuthorizeArgs {
    /// Execute the authorize command.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is incomplete or authorization fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = Config::load(self.config.as_deref(), None)?;
        let oauth = oauth_client(&config)?;

        let prompt = StdinPrompt::new(&output, !self.no_browser);
        authorize_interactive(&oauth, &config.token_path, &prompt)?;

        output.separator();
        output.success("Authorization successful!");
        output.separator();
        output.info(&format!("Token stored to {}", config.token_path.display()));
        Ok(())
    }
}

/// Build the OAuth client from the `[google]` section.
pub(crate) fn oauth_client(config: &Config) -> Result<GoogleOAuth, CliError> {
    let google = config.require_google()?;
    Ok(GoogleOAuth::new(
        &google.client_id,
        &google.client_secret,
        &google.redirect_url,
        config.http.timeout.map(Duration::from_secs),
    ))
}

/// Shows the authorization URL on the terminal and reads the code from stdin.
///
/// The URL is also opened in the default browser when `open_browser` is set.
pub(crate) struct StdinPrompt<'a> {
    output: &'a Output,
    open_browser: bool,
}

impl<'a> StdinPrompt<'a> {
    pub(crate) fn new(output: &'a Output, open_browser: bool) -> Self {
        Self {
            output,
            open_browser,
        }
    }
}

impl AuthorizationPrompt for StdinPrompt<'_> {
    fn authorization_code(&self, url: &str) -> io::Result<String> {
        self.output.separator();
        self.output.highlight("Authorization Required");
        self.output.separator();
        self.output.info("\nAuthorize this app by visiting this url:");
        self.output.highlight(&format!("\n{url}\n"));
        if self.open_browser
            && let Err(e) = open_in_browser(url)
        {
            debug!("Could not open browser: {e}");
        }

        write!(io::stderr(), "Enter the code from that page here: ")?;
        io::stderr().flush()?;
        let mut code = String::new();
        io::stdin().read_line(&mut code)?;
        Ok(code.trim().to_owned())
    }
}

/// Command opening `url` with the platform's default handler.
fn browser_command(url: &str) -> Command {
    #[cfg(target_os = "windows")]
    {
        let mut cmd = Command::new("rundll32");
        cmd.arg("url.dll,FileProtocolHandler").arg(url);
        cmd
    }
    #[cfg(target_os = "macos")]
    {
        let mut cmd = Command::new("open");
        cmd.arg(url);
        cmd
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(url);
        cmd
    }
}

fn open_in_browser(url: &str) -> io::Result<()> {
    let status = browser_command(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()?;
    if status.success() {
        Ok(())
    } else {
        Err(io::Error::other(format!("browser command exited with {status}")))
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsStr;

    use super::*;

    #[test]
    fn test_browser_command_passes_url_verbatim() {
        let url = "https://accounts.google.com/o/oauth2/auth?access_type=offline&scope=a%20b";
        let cmd = browser_command(url);

        assert!(!cmd.get_program().is_empty());
        assert_eq!(cmd.get_args().last(), Some(OsStr::new(url)));
    }

    #[test]
    fn test_oauth_client_requires_google_section() {
        let config = Config::default();
        let err = oauth_client(&config).err().unwrap();
        assert!(matches!(err, CliError::Config(_)));
        assert!(err.to_string().contains("[google]"));
    }
}
