//! Configuration management for aml.
//!
//! Parses `aml.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `document.doc_id`
//! - `google.client_id`
//! - `google.client_secret`
//! - `google.redirect_url`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the Google Doc id.
    pub doc_id: Option<String>,
    /// Override the JSON output path.
    pub output: Option<PathBuf>,
    /// Override the HTTP timeout in seconds.
    pub timeout: Option<u64>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "aml.toml";

/// Default output path, relative to the config directory.
const DEFAULT_OUTPUT: &str = "src/templates/data.json";

/// Default token cache path, relative to the config directory.
const DEFAULT_TOKEN_PATH: &str = "google-token.json";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Document configuration (paths are relative strings from TOML).
    document: DocumentConfigRaw,
    /// Google API credentials (optional section, required for `fetch`).
    pub google: Option<GoogleConfig>,
    /// HTTP client configuration.
    pub http: HttpConfig,

    /// Resolved document configuration (set after loading).
    #[serde(skip)]
    pub document_resolved: DocumentConfig,
    /// Resolved token cache path (set after loading).
    #[serde(skip)]
    pub token_path: PathBuf,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw document configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocumentConfigRaw {
    doc_id: Option<String>,
    output: Option<String>,
}

/// Resolved document configuration with absolute paths.
#[derive(Debug, Default, Clone)]
pub struct DocumentConfig {
    /// Google Doc id to fetch.
    pub doc_id: Option<String>,
    /// Where the structured JSON is written.
    pub output: PathBuf,
}

/// Google OAuth2 client configuration.
#[derive(Debug, Deserialize)]
pub struct GoogleConfig {
    /// OAuth2 client id.
    pub client_id: String,
    /// OAuth2 client secret.
    pub client_secret: String,
    /// Redirect URL registered for the client.
    #[serde(default = "default_redirect_url")]
    pub redirect_url: String,
    /// Token cache path relative to the config directory.
    #[serde(default)]
    token_path: Option<String>,
}

impl GoogleConfig {
    /// Validate that all required fields are properly set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any field is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.client_id, "google.client_id")?;
        require_non_empty(&self.client_secret, "google.client_secret")?;
        require_non_empty(&self.redirect_url, "google.redirect_url")?;
        Ok(())
    }
}

fn default_redirect_url() -> String {
    "urn:ietf:wg:oauth:2.0:oob".to_owned()
}

/// HTTP client configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Global request timeout in seconds. Unset means no timeout.
    pub timeout: Option<u64>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`google.client_secret`").
        field: String,
        /// Error message (e.g., "${`GOOGLE_CLIENT_SECRET`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `aml.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(doc_id) = &settings.doc_id {
            self.document_resolved.doc_id = Some(doc_id.clone());
        }
        if let Some(output) = &settings.output {
            self.document_resolved.output.clone_from(output);
        }
        if let Some(timeout) = settings.timeout {
            self.http.timeout = Some(timeout);
        }
    }

    /// Get validated Google configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the section is missing or invalid.
    pub fn require_google(&self) -> Result<&GoogleConfig, ConfigError> {
        let google = self.google.as_ref().ok_or_else(|| {
            ConfigError::Validation("[google] section required in config".into())
        })?;
        google.validate()?;
        Ok(google)
    }

    /// Get the document id to fetch.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if no document id is configured.
    pub fn require_doc_id(&self) -> Result<&str, ConfigError> {
        match self.document_resolved.doc_id.as_deref() {
            Some(id) if !id.is_empty() => Ok(id),
            _ => Err(ConfigError::Validation(
                "document.doc_id required (via --doc-id or config)".to_owned(),
            )),
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            document: DocumentConfigRaw::default(),
            google: None,
            http: HttpConfig::default(),
            document_resolved: DocumentConfig {
                doc_id: None,
                output: base.join(DEFAULT_OUTPUT),
            },
            token_path: base.join(DEFAULT_TOKEN_PATH),
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// The `[google]` section is not validated here; commands that need it
    /// call [`Config::require_google`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.timeout == Some(0) {
            return Err(ConfigError::Validation(
                "http.timeout must be greater than 0".to_owned(),
            ));
        }
        if self.document_resolved.output.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "document.output cannot be empty".to_owned(),
            ));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref doc_id) = self.document.doc_id {
            self.document.doc_id = Some(expand::expand_env(doc_id, "document.doc_id")?);
        }

        if let Some(ref mut google) = self.google {
            google.client_id = expand::expand_env(&google.client_id, "google.client_id")?;
            google.client_secret =
                expand::expand_env(&google.client_secret, "google.client_secret")?;
            google.redirect_url = expand::expand_env(&google.redirect_url, "google.redirect_url")?;
        }

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.document_resolved = DocumentConfig {
            doc_id: self.document.doc_id.clone(),
            output: resolve(self.document.output.as_deref(), DEFAULT_OUTPUT),
        };

        let token_path = self.google.as_ref().and_then(|g| g.token_path.as_deref());
        self.token_path = resolve(token_path, DEFAULT_TOKEN_PATH);
    }
}
