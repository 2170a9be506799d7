//! Configuration management for mdxview.
//!
//! Parses `mdxview.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! `diagrams.server_url` supports environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::time::Duration;

use mdxview_diagrams::DEFAULT_SERVER_URL;
use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mdxview.toml";

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override diagram server URL.
    pub server_url: Option<String>,
    /// Override transport timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Override diagram rendering enabled flag.
    pub diagrams_enabled: Option<bool>,
    /// Override code highlighting flag.
    pub highlight: Option<bool>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Diagram rendering configuration.
    pub diagrams: DiagramsConfig,
    /// MDX compiler configuration.
    pub compiler: CompilerConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Diagram rendering configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DiagramsConfig {
    /// Kroki-compatible server base URL.
    pub server_url: String,
    /// Transport timeout in seconds. No timeout when unset.
    pub timeout_secs: Option<u64>,
    /// Whether fenced diagrams are rendered at all.
    pub enabled: bool,
}

impl Default for DiagramsConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_owned(),
            timeout_secs: None,
            enabled: true,
        }
    }
}

impl DiagramsConfig {
    /// Transport timeout, if configured.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// MDX compiler configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Whether fenced code blocks are syntax highlighted.
    pub highlight: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self { highlight: true }
    }
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
        /// Config field path (e.g., "`diagrams.server_url`").
        field: String,
        /// Error message (e.g., "${`KROKI_URL`}: environment variable not found").
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

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `mdxview.toml` in current directory and parents,
    /// falling back to defaults.
    ///
    /// CLI settings are applied after loading, allowing CLI arguments to take
    /// precedence over config file values. The result is validated.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing or
    /// expansion fails, or the final configuration is invalid.
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
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(server_url) = &settings.server_url {
            self.diagrams.server_url.clone_from(server_url);
        }
        if let Some(timeout_secs) = settings.timeout_secs {
            self.diagrams.timeout_secs = Some(timeout_secs);
        }
        if let Some(enabled) = settings.diagrams_enabled {
            self.diagrams.enabled = enabled;
        }
        if let Some(highlight) = settings.highlight {
            self.compiler.highlight = highlight;
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

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.diagrams.server_url, "diagrams.server_url")?;
        require_http_url(&self.diagrams.server_url, "diagrams.server_url")?;

        if self.diagrams.timeout_secs == Some(0) {
            return Err(ConfigError::Validation(
                "diagrams.timeout_secs must be greater than 0".to_owned(),
            ));
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.diagrams.server_url = expand_env(&self.diagrams.server_url, "diagrams.server_url")?;
        Ok(())
    }
}

/// Expand `${VAR}` and `${VAR:-default}` in `value`.
///
/// A bare `$` is kept literally, so URLs with `$` in a path survive.
fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| std::env::var(var).map(Some))
        .map(Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}}: {}", e.var_name, e.cause),
        })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.diagrams.server_url, "https://kroki.io");
        assert_eq!(config.diagrams.timeout_secs, None);
        assert_eq!(config.diagrams.timeout(), None);
        assert!(config.diagrams.enabled);
        assert!(config.compiler.highlight);
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.diagrams.server_url, DEFAULT_SERVER_URL);
        assert!(config.compiler.highlight);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[diagrams]
server_url = "http://localhost:8000"
timeout_secs = 30
enabled = false

[compiler]
highlight = false
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.diagrams.server_url, "http://localhost:8000");
        assert_eq!(config.diagrams.timeout(), Some(Duration::from_secs(30)));
        assert!(!config.diagrams.enabled);
        assert!(!config.compiler.highlight);
    }

    #[test]
    fn test_load_from_explicit_path() {
        let file = write_config("[diagrams]\nserver_url = \"https://kroki.example.com\"\n");

        let config = Config::load(Some(file.path()), None).unwrap();

        assert_eq!(config.diagrams.server_url, "https://kroki.example.com");
        assert_eq!(config.config_path.as_deref(), Some(file.path()));
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)), "{err:?}");
    }

    #[test]
    fn test_load_invalid_toml() {
        let file = write_config("[diagrams\n");

        let err = Config::load(Some(file.path()), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)), "{err:?}");
    }

    #[test]
    fn test_load_validates_file_values() {
        let file = write_config("[diagrams]\nserver_url = \"kroki.io\"\n");

        let err = Config::load(Some(file.path()), None).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)), "{err:?}");
        assert!(err.to_string().contains("diagrams.server_url"));
    }

    #[test]
    fn test_cli_settings_override_file() {
        let file = write_config(
            "[diagrams]\nserver_url = \"https://kroki.io\"\ntimeout_secs = 5\n\n[compiler]\nhighlight = true\n",
        );
        let settings = CliSettings {
            server_url: Some("http://localhost:9000".to_owned()),
            timeout_secs: Some(60),
            diagrams_enabled: Some(false),
            highlight: Some(false),
        };

        let config = Config::load(Some(file.path()), Some(&settings)).unwrap();

        assert_eq!(config.diagrams.server_url, "http://localhost:9000");
        assert_eq!(config.diagrams.timeout_secs, Some(60));
        assert!(!config.diagrams.enabled);
        assert!(!config.compiler.highlight);
    }

    #[test]
    fn test_cli_settings_empty() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings::default());

        assert_eq!(config.diagrams.server_url, DEFAULT_SERVER_URL);
        assert!(config.diagrams.enabled);
        assert!(config.compiler.highlight);
    }

    #[test]
    fn test_cli_server_url_is_validated() {
        let file = write_config("");
        let settings = CliSettings {
            server_url: Some("ftp://kroki".to_owned()),
            ..CliSettings::default()
        };

        let err = Config::load(Some(file.path()), Some(&settings)).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)), "{err:?}");
    }

    #[test]
    fn test_expand_env_vars_server_url() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("MDXVIEW_TEST_SERVER_URL", "https://kroki.test.com");
        }
        let file = write_config("[diagrams]\nserver_url = \"${MDXVIEW_TEST_SERVER_URL}\"\n");

        let config = Config::load(Some(file.path()), None).unwrap();
        assert_eq!(config.diagrams.server_url, "https://kroki.test.com");

        unsafe {
            std::env::remove_var("MDXVIEW_TEST_SERVER_URL");
        }
    }

    #[test]
    fn test_expand_env_vars_missing_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("MDXVIEW_TEST_MISSING_URL");
        }
        let file = write_config("[diagrams]\nserver_url = \"${MDXVIEW_TEST_MISSING_URL}\"\n");

        let err = Config::load(Some(file.path()), None).unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }), "{err:?}");
        assert!(err.to_string().contains("MDXVIEW_TEST_MISSING_URL"));
    }

    #[test]
    fn test_expand_env_default_when_unset() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("MDXVIEW_TEST_UNSET_HOST");
        }
        let url = expand_env("https://${MDXVIEW_TEST_UNSET_HOST:-kroki.io}", "diagrams.server_url")
            .unwrap();
        assert_eq!(url, "https://kroki.io");
    }

    #[test]
    fn test_expand_env_missing_var_message() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("MDXVIEW_TEST_NO_SUCH_VAR");
        }
        let err = expand_env("${MDXVIEW_TEST_NO_SUCH_VAR}", "diagrams.server_url").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Environment variable error in diagrams.server_url: ${MDXVIEW_TEST_NO_SUCH_VAR}: environment variable not found"
        );
    }

    #[test]
    fn test_expand_env_keeps_bare_dollar() {
        let url = expand_env("https://example.com/$path", "diagrams.server_url").unwrap();
        assert_eq!(url, "https://example.com/$path");
    }

    #[test]
    fn test_validate_timeout_zero() {
        let mut config = Config::default();
        config.diagrams.timeout_secs = Some(0);

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn test_validate_server_url_empty() {
        let mut config = Config::default();
        config.diagrams.server_url = String::new();

        let err = config.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: diagrams.server_url cannot be empty"
        );
    }
}
