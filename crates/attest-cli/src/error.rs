//! Error types for the CLI application.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// Exit status when the run completed and every hard check passed.
pub const EXIT_PASS: i32 = 0;

/// Exit status when the run completed with violations or failed witnesses.
pub const EXIT_FAIL: i32 = 1;

/// Exit status for fatal errors other than registry loading.
pub const EXIT_ERROR: i32 = 2;

/// Exit status when the registry could not be loaded.
pub const EXIT_REGISTRY: i32 = 3;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The registry definition could not be parsed
    #[error("Registry error: {0}")]
    Registry(#[from] attest_domain::RegistryError),

    /// The registry definition could not be read
    #[error("Could not read registry {}: {source}", .path.display())]
    RegistryRead {
        /// Path that was read
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Report rendering or export error
    #[error("Report error: {0}")]
    Report(#[from] attest_report::ReportError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Process exit status for this error.
    pub fn exit_status(&self) -> i32 {
        match self {
            CliError::Registry(_) | CliError::RegistryRead { .. } => EXIT_REGISTRY,
            _ => EXIT_ERROR,
        }
    }
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested configuration file does not exist
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The configuration file could not be read
    #[error("Could not read {}: {source}", .path.display())]
    Read {
        /// Path that was read
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// The configuration file is not valid
    #[error("Invalid configuration in {}: {source}", .path.display())]
    Parse {
        /// Path that was parsed
        path: PathBuf,
        /// Underlying error
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_errors_exit_with_three() {
        let err = attest_domain::Registry::from_toml_str("claims = 3").unwrap_err();
        assert_eq!(CliError::from(err).exit_status(), EXIT_REGISTRY);

        let err = CliError::RegistryRead {
            path: PathBuf::from("missing.toml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(err.exit_status(), EXIT_REGISTRY);
    }

    #[test]
    fn test_other_errors_exit_with_two() {
        let err = CliError::from(ConfigError::NotFound(PathBuf::from("attest.toml")));
        assert_eq!(err.exit_status(), EXIT_ERROR);
        assert!(err.to_string().contains("attest.toml"));
    }
}
