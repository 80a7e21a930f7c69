//! # habitat-cli: Command-Line Front End
//!
//! Provides the `habitat` binary for checking documents offline, the same
//! way the store checks them on write.
//!
//! ## Subcommands
//!
//! - `habitat validate`: run a candidate document through the gate.
//! - `habitat estimate`: consensus receive time for a telemetry document
//!   or a bare `{receiver: time}` map.
//!
//! ```bash
//! habitat validate flight.json --user alice --previous stored.json
//! habitat validate flight.json --user root --role _admin --config habitat.yaml
//! habitat estimate telemetry.json
//! ```
//!
//! Exit codes: 0 accepted, 1 rejected, 2 operational error.

pub mod estimate;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use habitat_validator::ValidatorConfig;

/// Read and parse a JSON file.
pub fn read_json(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid JSON in {}", path.display()))
}

/// Load the validator configuration from `path`, or from the environment
/// when no file is given.
pub fn load_config(path: Option<&Path>) -> Result<ValidatorConfig> {
    match path {
        Some(path) => ValidatorConfig::from_yaml_file(path)
            .with_context(|| format!("failed to load configuration from {}", path.display())),
        None => ValidatorConfig::from_env().context("invalid configuration in environment"),
    }
}
