//! Collector contract and periodic scheduling.
//!
//! A collector fills a [`Batch`] per run. The batch reaches the registry only
//! when the whole run succeeded, so a failed command or a payload that does
//! not decode never leaves half a run's samples behind.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::Instrument;

use cephprom_core::error::Result;
use cephprom_core::{Label, Registry, Sample};

/// Run interval used when a collector does not ask for another one.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(30);

/// Samples produced by one collector run, in the order they were pushed.
#[derive(Debug, Default)]
pub struct Batch {
    samples: Vec<(String, Sample)>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, metric: &str, labels: Vec<Label>, value: f64, timestamp: DateTime<Utc>) {
        self.push_sample(metric, Sample::new(labels, value, Some(timestamp)));
    }

    pub fn push_sample(&mut self, metric: &str, sample: Sample) {
        self.samples.push((metric.to_string(), sample));
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> impl Iterator<Item = (&str, &Sample)> {
        self.samples.iter().map(|(m, s)| (m.as_str(), s))
    }

    /// Hand every sample to the registry in one step, so a scrape sees the
    /// whole run or none of it. Individually bad samples are logged and
    /// dropped there; returns how many were accepted.
    pub fn commit(self, registry: &Registry) -> usize {
        registry.record_batch(self.samples)
    }
}

/// A periodic task producing samples for the registry.
#[async_trait]
pub trait Collector: Send + Sync {
    fn name(&self) -> &str;

    fn interval(&self) -> Duration {
        DEFAULT_INTERVAL
    }

    /// One run. Returning an error discards everything pushed to `batch`.
    async fn collect(&self, batch: &mut Batch) -> Result<()>;
}

/// Execute a single run and commit its batch on success. Failures are logged
/// here and also returned for callers that care.
pub async fn run_once(registry: &Registry, collector: &dyn Collector) -> Result<usize> {
    let mut batch = Batch::new();
    match collector.collect(&mut batch).await {
        Ok(()) => {
            let produced = batch.len();
            let accepted = batch.commit(registry);
            tracing::debug!(collector = collector.name(), produced, accepted, "run complete");
            Ok(accepted)
        }
        Err(e) => {
            tracing::error!(
                collector = collector.name(),
                code = e.kind().as_str(),
                error = %e,
                discarded = batch.len(),
                "collector run failed"
            );
            Err(e)
        }
    }
}

/// Run `collector` now and then every `collector.interval()`, forever.
///
/// Each run is spawned as its own task after the next tick is already armed,
/// so a slow command never delays the schedule. Runs may overlap when a
/// command outlives its interval.
pub fn spawn_collector(registry: Arc<Registry>, collector: Arc<dyn Collector>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let period = collector.interval();
        tracing::info!(collector = collector.name(), ?period, "collector scheduled");

        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let registry = Arc::clone(&registry);
            let collector = Arc::clone(&collector);
            let span = tracing::info_span!("collect", collector = collector.name());
            tokio::spawn(
                async move {
                    let _ = run_once(&registry, collector.as_ref()).await;
                }
                .instrument(span),
            );
        }
    })
}
