//! Exporter config loader (strict parsing) plus command-line overrides.

pub mod ceph_conf;
pub mod cli;
pub mod endpoint;
pub mod schema;

use std::fs;

use cephprom_core::error::{Error, Result};

pub use cli::Cli;
pub use endpoint::parse_endpoint;
pub use schema::{CephSection, CollectorConfig, ExporterConfig, ExporterSection};

pub fn load_from_file(path: &str) -> Result<ExporterConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ExporterConfig> {
    let cfg: ExporterConfig = serde_yaml::from_str(s)
        .map_err(|e| Error::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Build the effective config: optional YAML file first, then CLI flags on top.
pub fn resolve(cli: &Cli) -> Result<ExporterConfig> {
    let mut cfg = match &cli.exporter_config {
        Some(path) => load_from_file(path)?,
        None => ExporterConfig::default(),
    };
    cli.apply(&mut cfg);
    cfg.validate()?;
    Ok(cfg)
}
