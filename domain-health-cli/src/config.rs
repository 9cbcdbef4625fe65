//! Config file loading.
//!
//! Order: `--config` path, else `<config dir>/domain-health/config.toml` when it
//! exists, else defaults. CLI flags are applied on top.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use domain_health_core::CheckerConfig;

use crate::args::Cli;

fn default_config_file() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("domain-health")
        .join("config.toml")
}

/// Parse a TOML config file.
pub fn read_config_file(path: &Path) -> Result<CheckerConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("Invalid config file {}", path.display()))
}

/// Resolve the effective configuration for this run.
pub fn load(cli: &Cli) -> Result<CheckerConfig> {
    let mut config = match &cli.config {
        Some(path) => read_config_file(path)?,
        None => {
            let path = default_config_file();
            if path.is_file() {
                read_config_file(&path)?
            } else {
                tracing::debug!("No config file at {}, using defaults", path.display());
                CheckerConfig::default()
            }
        }
    };

    apply_overrides(&mut config, cli);
    Ok(config)
}

fn apply_overrides(config: &mut CheckerConfig, cli: &Cli) {
    if let Some(ns) = cli.nameserver {
        config.dns.nameserver = Some(ns);
    }
    if let Some(secs) = cli.timeout {
        config.dns.timeout_secs = secs;
        config.whois.timeout_secs = secs;
    }
}
