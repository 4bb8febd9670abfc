//! Command implementations.

pub mod audit;
pub mod export;
pub mod run;

pub use self::audit::execute_audit;
pub use self::export::execute_export;
pub use self::run::execute_run;

use crate::error::{CliError, Result};
use attest_domain::{builtin_registry, Registry};
use attest_report::{Engine, EngineConfig, RunReport};
use std::path::Path;

/// Load the registry from `path`, or the built-in registry.
pub fn load_registry(path: Option<&Path>) -> Result<Registry> {
    let Some(path) = path else {
        tracing::debug!("Using built-in registry");
        return Ok(builtin_registry()?);
    };

    let definition = std::fs::read_to_string(path).map_err(|source| CliError::RegistryRead {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "Loaded registry definition");
    Ok(Registry::from_toml_str(&definition)?)
}

/// Load the registry and run every check over it.
pub fn verify(registry: Option<&Path>, config: &EngineConfig) -> Result<RunReport> {
    let registry = load_registry(registry)?;
    Ok(Engine::new(config.clone()).run(&registry))
}
