//! cephprom: Prometheus exporter for Ceph clusters.
//!
//! Polls `ceph ... --format json` subcommands on their own intervals and
//! serves the collected samples over HTTP.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use cephprom_core::error::Result;
use cephprom_core::Registry;
use cephprom_exporter::ceph::{self, catalog, CephOptions};
use cephprom_exporter::command::ProcessRunner;
use cephprom_exporter::config::{self, ceph_conf, parse_endpoint, Cli};
use cephprom_exporter::{app_state, collect, router, sweep};

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(code = e.kind().as_str(), error = %e, "cephprom failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let cfg = config::resolve(&cli)?;
    let fsid = match &cfg.ceph.fsid {
        Some(fsid) => fsid.clone(),
        None => ceph_conf::read_fsid(&cfg.ceph.conf)?,
    };
    let listen = parse_endpoint(&cfg.exporter.endpoint)?;

    let registry = Arc::new(Registry::new());
    catalog::declare_all(&registry)?;
    let _sweepers = sweep::spawn_sweepers(Arc::clone(&registry));

    let opts = Arc::new(CephOptions::from_config(&cfg, fsid));
    let runner = Arc::new(ProcessRunner::new(cfg.ceph.executable.clone()));
    let collectors = ceph::collectors(&cfg, Arc::clone(&opts), runner);
    tracing::info!(fsid = %opts.fsid, collectors = collectors.len(), "starting collectors");
    let _collectors: Vec<_> = collectors
        .into_iter()
        .map(|c| collect::spawn_collector(Arc::clone(&registry), c))
        .collect();

    let state = app_state::AppState::new(registry, cfg);
    let app = router::build_router(state);

    tracing::info!(%listen, "cephprom listening");
    let listener = tokio::net::TcpListener::bind(listen).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
