//! Configuration management for the CLI.

use crate::error::ConfigError;
use attest_report::EngineConfig;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the project-local configuration file.
pub const LOCAL_CONFIG: &str = "attest.toml";

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Verification engine settings
    #[serde(default)]
    pub engine: EngineConfig,

    /// Structured report settings
    #[serde(default)]
    pub report: ReportSettings,
}

/// Global CLI settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Structured report settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReportSettings {
    /// Where `export` writes the structured document
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
}

impl Config {
    /// Path of the per-user configuration file.
    pub fn user_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".attest").join("config.toml"))
    }

    /// Pick the configuration file to load.
    ///
    /// An explicit path must exist. Otherwise the first existing file among
    /// `./attest.toml` and the per-user file wins; `None` means defaults.
    pub fn locate(
        explicit: Option<&Path>,
        local: &Path,
        user: Option<&Path>,
    ) -> Result<Option<PathBuf>, ConfigError> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            return Ok(Some(path.to_path_buf()));
        }

        Ok(std::iter::once(local)
            .chain(user)
            .find(|path| path.exists())
            .map(Path::to_path_buf))
    }

    /// Load configuration following the lookup order.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let user = Self::user_path();
        match Self::locate(explicit, Path::new(LOCAL_CONFIG), user.as_deref())? {
            Some(path) => Self::from_file(&path),
            None => {
                tracing::debug!("No configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from a file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_output_path() -> PathBuf {
    PathBuf::from("attest-report.json")
}
