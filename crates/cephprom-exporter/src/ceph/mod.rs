//! Ceph collectors.
//!
//! Every collector runs one `ceph ... --format json` subcommand, decodes the
//! payload into a typed report and turns it into samples. All samples of a run
//! carry the `fsid` label and the midpoint of the command's execution window.

pub mod catalog;
pub mod df;
pub mod mds_dump;
pub mod osd_dump;
pub mod osd_pool_stats;
pub mod pg_dump;
pub mod quorum_status;
pub mod states;
pub mod status;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;

use cephprom_core::error::{Error, Result};
use cephprom_core::Label;

use crate::collect::{Batch, Collector, DEFAULT_INTERVAL};
use crate::command::CommandRunner;
use crate::config::ExporterConfig;

/// Every collector name accepted under `collectors:` in the config file.
pub const COLLECTOR_NAMES: &[&str] = &[
    df::Df::NAME,
    mds_dump::MdsDump::NAME,
    osd_dump::OsdDump::NAME,
    osd_pool_stats::OsdPoolStats::NAME,
    pg_dump::PgDump::NAME,
    quorum_status::QuorumStatus::NAME,
    status::Status::NAME,
];

/// Longest slice of raw output kept in a decode error.
const MAX_OUTPUT_IN_ERROR: usize = 4096;

/// Connection flags shared by every ceph invocation.
#[derive(Debug, Clone)]
pub struct CephOptions {
    pub fsid: String,
    pub conf: String,
    pub name: String,
    pub keyring: String,
}

impl CephOptions {
    pub fn from_config(cfg: &ExporterConfig, fsid: String) -> Self {
        Self {
            fsid,
            conf: cfg.ceph.conf.clone(),
            name: cfg.ceph.name.clone(),
            keyring: cfg.ceph.keyring.clone(),
        }
    }
}

/// One ceph subcommand and its mapping to samples.
pub trait Report: Send + Sync + 'static {
    /// Key under `collectors:` in the config file.
    const NAME: &'static str;
    const SUBCOMMAND: &'static [&'static str];
    const INTERVAL: Duration = DEFAULT_INTERVAL;

    type Data: DeserializeOwned + Send;

    fn emit(&self, data: &Self::Data, out: &mut Emitter<'_>) -> Result<()>;
}

/// Sample sink handed to [`Report::emit`]; prepends the `fsid` label and
/// stamps the run's timestamp.
pub struct Emitter<'a> {
    batch: &'a mut Batch,
    fsid: &'a str,
    command: &'a str,
    at: DateTime<Utc>,
}

impl<'a> Emitter<'a> {
    pub fn new(batch: &'a mut Batch, fsid: &'a str, command: &'a str, at: DateTime<Utc>) -> Self {
        Self {
            batch,
            fsid,
            command,
            at,
        }
    }

    pub fn sample(&mut self, metric: &str, labels: &[(&str, &str)], value: f64) {
        let mut all = Vec::with_capacity(labels.len() + 1);
        all.push(Label::new("fsid", self.fsid));
        all.extend(labels.iter().map(|(k, v)| Label::new(*k, *v)));
        self.batch.push(metric, all, value, self.at);
    }

    /// Timestamp of the current run.
    pub fn at(&self) -> DateTime<Utc> {
        self.at
    }

    /// Error for a payload that decoded but makes no sense.
    pub fn malformed(&self, reason: impl Into<String>, output: impl Into<String>) -> Error {
        Error::MalformedOutput {
            command: self.command.to_string(),
            reason: reason.into(),
            output: output.into(),
        }
    }
}

/// Collector running one [`Report`].
pub struct CephCommand<R> {
    report: R,
    opts: Arc<CephOptions>,
    runner: Arc<dyn CommandRunner>,
    interval: Duration,
}

impl<R: Report> CephCommand<R> {
    pub fn new(report: R, opts: Arc<CephOptions>, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            report,
            opts,
            runner,
            interval: R::INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Full argv, `ceph` first.
    pub fn argv(&self) -> Vec<String> {
        let mut argv: Vec<String> = vec![
            "ceph".into(),
            "--conf".into(),
            self.opts.conf.clone(),
            "--keyring".into(),
            self.opts.keyring.clone(),
            "--name".into(),
            self.opts.name.clone(),
        ];
        argv.extend(R::SUBCOMMAND.iter().map(|s| s.to_string()));
        argv.extend(["--format".to_string(), "json".to_string()]);
        argv
    }

    /// `ceph <subcommand>`, used as the `command` label.
    pub fn short_command(&self) -> String {
        std::iter::once("ceph")
            .chain(R::SUBCOMMAND.iter().copied())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[async_trait]
impl<R: Report> Collector for CephCommand<R> {
    fn name(&self) -> &str {
        R::NAME
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    async fn collect(&self, batch: &mut Batch) -> Result<()> {
        let argv = self.argv();
        let command = argv.join(" ");
        let output = self.runner.run(&argv).await?;
        let data: R::Data = decode(&command, &output.stdout)?;

        let runtime = output.runtime().to_std().unwrap_or_default().as_secs_f64();
        let short = self.short_command();

        let mut out = Emitter::new(batch, &self.opts.fsid, &command, output.midpoint());
        out.sample("ceph", &[], 1.0);
        out.sample("ceph_command_runtime", &[("command", short.as_str())], runtime);
        self.report.emit(&data, &mut out)
    }
}

fn decode<T: DeserializeOwned>(command: &str, stdout: &[u8]) -> Result<T> {
    let malformed = |reason: String, output: &str| Error::MalformedOutput {
        command: command.to_string(),
        reason,
        output: output.chars().take(MAX_OUTPUT_IN_ERROR).collect(),
    };
    let text = std::str::from_utf8(stdout)
        .map_err(|e| malformed(format!("invalid utf-8: {e}"), &String::from_utf8_lossy(stdout)))?;
    serde_json::from_str(text).map_err(|e| malformed(format!("invalid json: {e}"), text))
}

/// Build every enabled ceph collector, applying per-collector config overrides.
pub fn collectors(
    cfg: &ExporterConfig,
    opts: Arc<CephOptions>,
    runner: Arc<dyn CommandRunner>,
) -> Vec<Arc<dyn Collector>> {
    let mut out: Vec<Arc<dyn Collector>> = Vec::new();
    add(&mut out, cfg, df::Df, &opts, &runner);
    add(&mut out, cfg, mds_dump::MdsDump, &opts, &runner);
    add(&mut out, cfg, osd_dump::OsdDump, &opts, &runner);
    add(&mut out, cfg, osd_pool_stats::OsdPoolStats, &opts, &runner);
    add(&mut out, cfg, pg_dump::PgDump, &opts, &runner);
    add(&mut out, cfg, quorum_status::QuorumStatus, &opts, &runner);
    add(&mut out, cfg, status::Status, &opts, &runner);
    out
}

fn add<R: Report>(
    out: &mut Vec<Arc<dyn Collector>>,
    cfg: &ExporterConfig,
    report: R,
    opts: &Arc<CephOptions>,
    runner: &Arc<dyn CommandRunner>,
) {
    let overrides = cfg.collector(R::NAME);
    if overrides.is_some_and(|c| !c.enabled) {
        tracing::info!(collector = R::NAME, "collector disabled by config");
        return;
    }
    let mut c = CephCommand::new(report, Arc::clone(opts), Arc::clone(runner));
    if let Some(interval) = overrides.and_then(|c| c.interval()) {
        c = c.with_interval(interval);
    }
    out.push(Arc::new(c));
}
