use clap::Parser;

use super::schema::ExporterConfig;

/// Prometheus exporter for Ceph clusters.
#[derive(Debug, Default, Parser)]
#[command(name = "cephprom", version, about)]
pub struct Cli {
    /// Exporter YAML config file.
    #[arg(long)]
    pub exporter_config: Option<String>,

    /// Ceph config file location [default: /etc/ceph/ceph.conf]
    #[arg(long)]
    pub config: Option<String>,

    /// Ceph client name used to authenticate to the cluster [default: client.admin]
    #[arg(long)]
    pub name: Option<String>,

    /// File that contains the key for authentication with the cluster
    /// [default: /etc/ceph/ceph.client.admin.keyring]
    #[arg(long)]
    pub keyring: Option<String>,

    /// Listen endpoint [default: tcp:9999]
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Path to the ceph command line client [default: /usr/bin/ceph]
    #[arg(long)]
    pub executable: Option<String>,

    /// Cluster fsid; read from the ceph config when omitted.
    #[arg(long)]
    pub fsid: Option<String>,
}

impl Cli {
    /// Flags given on the command line win over the config file.
    pub fn apply(&self, cfg: &mut ExporterConfig) {
        if let Some(v) = &self.config {
            cfg.ceph.conf = v.clone();
        }
        if let Some(v) = &self.name {
            cfg.ceph.name = v.clone();
        }
        if let Some(v) = &self.keyring {
            cfg.ceph.keyring = v.clone();
        }
        if let Some(v) = &self.endpoint {
            cfg.exporter.endpoint = v.clone();
        }
        if let Some(v) = &self.executable {
            cfg.ceph.executable = v.clone();
        }
        if let Some(v) = &self.fsid {
            cfg.ceph.fsid = Some(v.clone());
        }
    }
}
