//! Attest CLI library.
//!
//! Configuration loading, command execution and text rendering for the
//! `attest` binary. The binary itself only parses arguments, installs logging
//! and maps the outcome to an exit status.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, ConfigError, Result};
pub use output::Formatter;
