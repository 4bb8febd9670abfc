//! Registry loading errors

use thiserror::Error;

/// Errors that prevent a registry from being loaded at all
///
/// Missing or invalid field values are not load errors; they are reported by
/// the schema validator. Only a definition that cannot be read as a registry
/// ends up here.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The definition is not valid TOML or has wrongly-typed fields
    #[error("Failed to parse registry definition: {0}")]
    Parse(#[from] toml::de::Error),
}
