//! TOML configuration file support for the `dump` command.
//!
//! Settings that are tedious to repeat on every invocation can live in a file:
//!
//! ```toml
//! # jtl.toml
//! [dump]
//! output = "tsv"
//! limit = 1000
//! fields = ["ts", "lb", "t", "lt", "rc", "s"]
//! ```
//!
//! Command-line flags take precedence over the file.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use super::OutputFormat;

/// Root configuration structure for jtl.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Dump-specific settings.
    #[serde(default)]
    pub dump: DumpConfig,
}

/// Configuration for the dump command.
#[derive(Debug, Default, Deserialize)]
pub struct DumpConfig {
    /// Output format (json or tsv).
    pub output: Option<OutputFormat>,

    /// Maximum number of samples to print.
    pub limit: Option<usize>,

    /// Field codes to print, in order.
    pub fields: Option<Vec<String>>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}
