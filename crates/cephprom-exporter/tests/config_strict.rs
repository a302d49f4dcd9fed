//! Config loading: strict schema, defaults, validation and CLI overrides.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::io::Write;
use std::time::Duration;

use clap::Parser;

use cephprom_core::ErrorKind;
use cephprom_exporter::ceph::COLLECTOR_NAMES;
use cephprom_exporter::config::{load_from_file, load_from_str, parse_endpoint, resolve, Cli};

#[test]
fn minimal_config_gets_defaults() {
    let cfg = load_from_str("version: 1\n").unwrap();
    assert_eq!(cfg.exporter.endpoint, "tcp:9999");
    assert_eq!(cfg.exporter.metrics_path, "/metrics");
    assert_eq!(cfg.ceph.conf, "/etc/ceph/ceph.conf");
    assert_eq!(cfg.ceph.name, "client.admin");
    assert_eq!(cfg.ceph.executable, "/usr/bin/ceph");
    assert!(cfg.ceph.fsid.is_none());
    assert!(cfg.collectors.is_empty());
}

#[test]
fn unknown_fields_are_rejected() {
    let err = load_from_str("version: 1\nexporter:\n  listen: 0.0.0.0:9999\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);

    let err = load_from_str("version: 1\ncollectors:\n  df: { every: 5 }\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
}

#[test]
fn invalid_values_are_rejected() {
    for yaml in [
        "version: 2\n",
        "version: 1\nexporter:\n  metrics_path: metrics\n",
        "version: 1\nexporter:\n  metrics_path: /\n",
        "version: 1\nexporter:\n  endpoint: udp:9999\n",
        "version: 1\ncollectors:\n  df: { interval_secs: 0 }\n",
    ] {
        let err = load_from_str(yaml).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config, "{yaml}");
    }
}

#[test]
fn unknown_collector_names_are_rejected() {
    let err = load_from_str("version: 1\ncollectors:\n  pg_dmp: { enabled: false }\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
    assert!(err.to_string().contains("pg_dmp"));

    for name in COLLECTOR_NAMES {
        let yaml = format!("version: 1\ncollectors:\n  {name}: {{ enabled: false }}\n");
        assert!(load_from_str(&yaml).is_ok(), "{name}");
    }
}

#[test]
fn collector_overrides() {
    let cfg = load_from_str(
        "version: 1\ncollectors:\n  df: { interval_secs: 60 }\n  pg_dump: { enabled: false }\n",
    )
    .unwrap();
    assert_eq!(cfg.collector("df").unwrap().interval(), Some(Duration::from_secs(60)));
    assert!(cfg.collector("df").unwrap().enabled);
    assert!(!cfg.collector("pg_dump").unwrap().enabled);
    assert!(cfg.collector("status").is_none());
}

#[test]
fn cli_flags_win_over_file() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    writeln!(f, "version: 1\nexporter:\n  endpoint: tcp:9100\nceph:\n  name: client.file").unwrap();
    let path = f.path().to_str().unwrap().to_string();

    let cli = Cli::parse_from(["cephprom", "--exporter-config", &path, "--name", "client.cli"]);
    let cfg = resolve(&cli).unwrap();
    assert_eq!(cfg.ceph.name, "client.cli");
    assert_eq!(cfg.exporter.endpoint, "tcp:9100");
    assert_eq!(parse_endpoint(&cfg.exporter.endpoint).unwrap().port(), 9100);
}

#[test]
fn missing_file_is_a_config_error() {
    let err = load_from_file("/nonexistent/cephprom.yaml").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
}
