use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;
use cephprom_core::error::{Error, Result};

use super::endpoint::parse_endpoint;
use crate::ceph::COLLECTOR_NAMES;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterConfig {
    pub version: u32,

    #[serde(default)]
    pub exporter: ExporterSection,

    #[serde(default)]
    pub ceph: CephSection,

    /// Per-collector overrides keyed by collector name (`df`, `osd_dump`, ...).
    #[serde(default)]
    pub collectors: BTreeMap<String, CollectorConfig>,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            version: 1,
            exporter: ExporterSection::default(),
            ceph: CephSection::default(),
            collectors: BTreeMap::new(),
        }
    }
}

impl ExporterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(Error::Config(format!("unsupported config version {}", self.version)));
        }
        self.exporter.validate()?;
        for (name, c) in &self.collectors {
            if !COLLECTOR_NAMES.contains(&name.as_str()) {
                return Err(Error::Config(format!(
                    "unknown collector {name:?} (expected one of: {})",
                    COLLECTOR_NAMES.join(", ")
                )));
            }
            c.validate(name)?;
        }
        Ok(())
    }

    /// Override for one collector, if any.
    pub fn collector(&self, name: &str) -> Option<&CollectorConfig> {
        self.collectors.get(name)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterSection {
    /// Listen endpoint, e.g. `tcp:9999` or `tcp:port=9999:interface=127.0.0.1`.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_metrics_path")]
    pub metrics_path: String,
}

impl Default for ExporterSection {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            metrics_path: default_metrics_path(),
        }
    }
}

impl ExporterSection {
    pub fn validate(&self) -> Result<()> {
        parse_endpoint(&self.endpoint)?;
        if !self.metrics_path.starts_with('/') || self.metrics_path == "/" {
            return Err(Error::Config(
                "exporter.metrics_path must start with '/' and must not be the root path".into(),
            ));
        }
        Ok(())
    }
}

fn default_endpoint() -> String {
    "tcp:9999".into()
}
fn default_metrics_path() -> String {
    "/metrics".into()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CephSection {
    /// Ceph config file; `fsid` is read from its `[global]` section.
    #[serde(default = "default_conf")]
    pub conf: String,

    /// Client name used to authenticate to the cluster.
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_keyring")]
    pub keyring: String,

    #[serde(default = "default_executable")]
    pub executable: String,

    /// Skip reading the ceph config when set.
    #[serde(default)]
    pub fsid: Option<String>,
}

impl Default for CephSection {
    fn default() -> Self {
        Self {
            conf: default_conf(),
            name: default_name(),
            keyring: default_keyring(),
            executable: default_executable(),
            fsid: None,
        }
    }
}

fn default_conf() -> String {
    "/etc/ceph/ceph.conf".into()
}
fn default_name() -> String {
    "client.admin".into()
}
fn default_keyring() -> String {
    "/etc/ceph/ceph.client.admin.keyring".into()
}
fn default_executable() -> String {
    "/usr/bin/ceph".into()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollectorConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Run interval; the collector's own default applies when absent.
    #[serde(default)]
    pub interval_secs: Option<u64>,
}

impl CollectorConfig {
    pub fn validate(&self, name: &str) -> Result<()> {
        if let Some(secs) = self.interval_secs {
            if !(1..=3600).contains(&secs) {
                return Err(Error::Config(format!(
                    "collectors.{name}.interval_secs must be between 1 and 3600"
                )));
            }
        }
        Ok(())
    }

    pub fn interval(&self) -> Option<Duration> {
        self.interval_secs.map(Duration::from_secs)
    }
}

fn default_enabled() -> bool {
    true
}
