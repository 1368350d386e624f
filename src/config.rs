//! Configuration file handling.
//!
//! This module provides loading and saving of secdb configuration
//! from a TOML file. Command-line flags override every value loaded here.
//!
//! # Configuration Location
//!
//! The configuration file is stored at:
//! - Linux: `~/.config/secdb/config.toml`
//! - macOS: `~/Library/Application Support/secdb/config.toml`
//! - Windows: `%APPDATA%\secdb\config.toml`
//!
//! # Example Configuration
//!
//! ```toml
//! repo_name = "os"
//! base_url = "https://packages.wolfi.dev"
//! archs = ["x86_64", "aarch64"]
//! output = "security.json"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, SecdbError};

pub const DEFAULT_BASE_URL: &str = "https://packages.wolfi.dev";
pub const DEFAULT_OUTPUT: &str = "security.json";
pub const DEFAULT_ARCH: &str = "x86_64";

/// Settings for generating a security database.
///
/// # Example
///
/// ```
/// use secdb::Config;
///
/// let config = Config::default()
///     .with_repo_name("os")
///     .with_archs(vec!["aarch64".to_string()]);
///
/// assert_eq!(config.base_url, "https://packages.wolfi.dev");
/// assert_eq!(config.archs, ["aarch64"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Repository name written to `reponame`. Required, no default.
    pub repo_name: String,

    /// Base URL written to `urlprefix`.
    ///
    /// Default: `https://packages.wolfi.dev`
    pub base_url: String,

    /// Architectures the database is published for.
    ///
    /// Default: `["x86_64"]`
    pub archs: Vec<String>,

    /// Path of the generated JSON document.
    ///
    /// Default: `security.json`
    pub output: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repo_name: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            archs: vec![DEFAULT_ARCH.to_string()],
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

impl Config {
    pub fn with_repo_name(mut self, repo_name: impl Into<String>) -> Self {
        self.repo_name = repo_name.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_archs(mut self, archs: Vec<String>) -> Self {
        self.archs = archs;
        self
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    /// Loads configuration from the default config file.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Loads configuration from `path`, falling back to defaults when the
    /// file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| SecdbError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| SecdbError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Saves the configuration to the default config file.
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = self.to_toml()?;
        let write_err = |source| SecdbError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(write_err)?;
            }
        }

        fs::write(path, content).map_err(write_err)
    }

    /// Returns the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("secdb")
            .join("config.toml")
    }

    /// Generates a string containing the default configuration.
    pub fn generate_default_config() -> String {
        Config::default().to_toml().unwrap_or_default()
    }

    /// Renders this configuration in the config file format.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert!(config.repo_name.is_empty());
        assert_eq!(config.base_url, "https://packages.wolfi.dev");
        assert_eq!(config.archs, ["x86_64"]);
        assert_eq!(config.output, PathBuf::from("security.json"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str("repo_name = \"os\"\n").unwrap();

        assert_eq!(config.repo_name, "os");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.archs, [DEFAULT_ARCH]);
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "archs = \"x86_64\"\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, SecdbError::Config { .. }));
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config::default()
            .with_repo_name("extras")
            .with_base_url("https://mirror.example")
            .with_archs(vec!["x86_64".to_string(), "aarch64".to_string()])
            .with_output("out/security.json");

        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[cfg(unix)]
    #[test]
    fn test_unencodable_config_is_not_written() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let config = Config::default().with_output(OsStr::from_bytes(b"out\xff.json"));

        let err = config.save_to(&path).unwrap_err();

        assert!(matches!(err, SecdbError::ConfigEncode(_)));
        assert!(!path.exists());
    }

    #[test]
    fn test_generate_default_config() {
        let rendered = Config::generate_default_config();
        assert!(rendered.contains("base_url = \"https://packages.wolfi.dev\""));
        assert!(rendered.contains("output = \"security.json\""));
    }
}
