//! Metric family table shared by collectors, the sweeper, and the renderer.
//!
//! The registry is built once at startup and handed out as `Arc<Registry>`.
//! Every family lives behind its `DashMap` shard lock, so appends, sweeps and
//! renders of one family never interleave mid-mutation.
//!
//! On top of that, a registry-wide gate makes a render atomic: writers hold
//! it shared, `render_all` holds it exclusively. A scrape therefore sees a
//! collector batch either completely or not at all.

use std::collections::HashSet;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::error::{Error, Result};
use crate::exposition::{
    is_valid_label_name, is_valid_metric_name, Label, Metric, MetricType, Sample,
};

/// Samples older than this are dropped by the sweeper.
pub const STALENESS_WINDOW: Duration = Duration::from_secs(500);

/// Period of the per-family expiry sweep.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Default)]
pub struct Registry {
    metrics: DashMap<String, Metric>,
    gate: RwLock<()>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            metrics: DashMap::new(),
            gate: RwLock::new(()),
        }
    }

    // The gate guards no data, so a poisoned lock is still usable.
    fn shared(&self) -> RwLockReadGuard<'_, ()> {
        self.gate.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn exclusive(&self) -> RwLockWriteGuard<'_, ()> {
        self.gate.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Declare a metric family. A second declaration of the same name replaces
    /// the first (and drops its pending samples).
    pub fn declare(&self, name: &str, help: Option<&str>, kind: Option<MetricType>) -> Result<()> {
        if !is_valid_metric_name(name) {
            return Err(Error::InvalidMetricName(name.to_string()));
        }
        let metric = Metric::new(name, help.map(str::to_string), kind);
        let _gate = self.shared();
        if self.metrics.insert(name.to_string(), metric).is_some() {
            tracing::warn!(metric = %name, "metric declared twice; last declaration wins");
        }
        Ok(())
    }

    /// Record one observation. Never fails: a bad sample is logged and dropped.
    pub fn record_sample(
        &self,
        name: &str,
        labels: Vec<Label>,
        value: f64,
        timestamp: Option<DateTime<Utc>>,
    ) {
        self.record(name, Sample::new(labels, value, timestamp));
    }

    /// Same as [`Registry::record_sample`] for an already built sample.
    pub fn record(&self, name: &str, sample: Sample) {
        if let Err(e) = self.try_record(name, sample) {
            tracing::error!(metric = %name, code = e.kind().as_str(), error = %e, "sample dropped");
        }
    }

    /// Strict variant of [`Registry::record`] that reports why a sample was refused.
    pub fn try_record(&self, name: &str, sample: Sample) -> Result<()> {
        let _gate = self.shared();
        self.insert(name, sample)
    }

    /// Record every sample of one collector run under a single gate
    /// acquisition, so no render can observe part of the run. Bad samples are
    /// logged and dropped; returns how many were accepted.
    pub fn record_batch(&self, samples: impl IntoIterator<Item = (String, Sample)>) -> usize {
        let _gate = self.shared();
        let mut accepted = 0;
        for (name, sample) in samples {
            match self.insert(&name, sample) {
                Ok(()) => accepted += 1,
                Err(e) => tracing::error!(
                    metric = %name,
                    code = e.kind().as_str(),
                    error = %e,
                    "sample dropped"
                ),
            }
        }
        accepted
    }

    fn insert(&self, name: &str, sample: Sample) -> Result<()> {
        validate_labels(name, sample.labels())?;
        let mut metric = self
            .metrics
            .get_mut(name)
            .ok_or_else(|| Error::UnknownMetric(name.to_string()))?;
        metric.add_sample(sample);
        Ok(())
    }

    /// Render every family in lexicographic name order. Families without
    /// samples still emit their headers. Rendered samples are removed.
    ///
    /// No sample can be recorded while a render is in progress.
    pub fn render_all(&self) -> String {
        let _gate = self.exclusive();
        let mut out = String::new();
        for name in self.names() {
            if let Some(mut metric) = self.metrics.get_mut(&name) {
                metric.render(&mut out);
            }
        }
        out
    }

    /// Sweep one family. Returns the number of samples discarded.
    pub fn expire(&self, name: &str, now: DateTime<Utc>) -> usize {
        let _gate = self.shared();
        self.metrics
            .get_mut(name)
            .map(|mut m| m.expire_samples(now))
            .unwrap_or(0)
    }

    /// Sweep every family.
    pub fn expire_all(&self, now: DateTime<Utc>) -> usize {
        let _gate = self.shared();
        self.metrics
            .iter_mut()
            .map(|mut m| m.expire_samples(now))
            .sum()
    }

    /// Declared names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.metrics.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Number of samples waiting for the next render, `None` if undeclared.
    pub fn pending(&self, name: &str) -> Option<usize> {
        self.metrics.get(name).map(|m| m.samples().len())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.metrics.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

fn validate_labels(metric: &str, labels: &[Label]) -> Result<()> {
    let mut seen = HashSet::with_capacity(labels.len());
    for label in labels {
        if !is_valid_label_name(label.name()) {
            return Err(Error::InvalidLabelName {
                metric: metric.to_string(),
                label: label.name().to_string(),
            });
        }
        if !seen.insert(label.name()) {
            return Err(Error::DuplicateLabel {
                metric: metric.to_string(),
                label: label.name().to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use chrono::{Duration as TimeDelta, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.timestamp_opt(1_600_000_000, 0).unwrap()
    }

    #[test]
    fn declare_rejects_bad_names() {
        let reg = Registry::new();
        let err = reg.declare("ceph-osd", None, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidMetricName);
        assert!(reg.is_empty());
    }

    #[test]
    fn last_declaration_wins() {
        let reg = Registry::new();
        reg.declare("m", Some("first"), Some(MetricType::Counter)).unwrap();
        reg.declare("m", Some("second"), Some(MetricType::Gauge)).unwrap();
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.render_all(), "# HELP m second\n# TYPE m gauge\n");
    }

    #[test]
    fn unknown_metric_is_dropped() {
        let reg = Registry::new();
        reg.declare("known", None, Some(MetricType::Gauge)).unwrap();
        reg.record_sample("unknown", vec![], 1.0, Some(t0()));
        assert_eq!(reg.pending("known"), Some(0));
        assert_eq!(reg.pending("unknown"), None);

        let err = reg
            .try_record("unknown", Sample::new(vec![], 1.0, None))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownMetric);
        assert!(err.to_string().contains("unknown"));
    }

    #[test]
    fn bad_label_sets_are_dropped() {
        let reg = Registry::new();
        reg.declare("m", None, None).unwrap();

        let dup = Sample::new(vec![Label::new("a", "1"), Label::new("a", "2")], 1.0, None);
        assert_eq!(reg.try_record("m", dup).unwrap_err().kind(), ErrorKind::DuplicateLabel);

        let bad = Sample::new(vec![Label::new("a-b", "1")], 1.0, None);
        assert_eq!(reg.try_record("m", bad).unwrap_err().kind(), ErrorKind::InvalidLabelName);

        assert_eq!(reg.pending("m"), Some(0));
    }

    #[test]
    fn record_batch_counts_accepted_samples() {
        let reg = Registry::new();
        reg.declare("a", None, None).unwrap();
        let batch = vec![
            ("a".to_string(), Sample::new(vec![], 1.0, Some(t0()))),
            ("missing".to_string(), Sample::new(vec![], 2.0, Some(t0()))),
            (
                "a".to_string(),
                Sample::new(vec![Label::new("x", "1"), Label::new("x", "2")], 3.0, None),
            ),
            ("a".to_string(), Sample::new(vec![], 4.0, None)),
        ];
        assert_eq!(reg.record_batch(batch), 2);
        assert_eq!(reg.pending("a"), Some(2));
    }

    #[test]
    fn families_render_in_name_order() {
        let reg = Registry::new();
        reg.declare("zeta", None, Some(MetricType::Gauge)).unwrap();
        reg.declare("alpha", None, Some(MetricType::Counter)).unwrap();
        reg.declare("mid", None, None).unwrap();
        reg.record_sample("zeta", vec![], 1.0, None);
        reg.record_sample("alpha", vec![], 2.0, None);

        assert_eq!(
            reg.render_all(),
            "# TYPE alpha counter\nalpha 2\n# TYPE zeta gauge\nzeta 1\n"
        );
        assert_eq!(reg.names(), vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn render_all_clears_every_family() {
        let reg = Registry::new();
        reg.declare("a", None, None).unwrap();
        reg.declare("b", None, None).unwrap();
        reg.record_sample("a", vec![], 1.0, Some(t0()));
        reg.record_sample("b", vec![], 1.0, Some(t0()));
        let _ = reg.render_all();
        assert_eq!(reg.pending("a"), Some(0));
        assert_eq!(reg.pending("b"), Some(0));
        assert_eq!(reg.render_all(), "");
    }

    #[test]
    fn sweep_respects_window() {
        let reg = Registry::new();
        reg.declare("a", None, None).unwrap();
        reg.declare("b", None, None).unwrap();
        reg.record_sample("a", vec![], 1.0, Some(t0()));
        reg.record_sample("b", vec![], 1.0, Some(t0()));

        assert_eq!(reg.expire("a", t0() + TimeDelta::seconds(400)), 0);
        assert_eq!(reg.pending("a"), Some(1));
        assert_eq!(reg.expire("a", t0() + TimeDelta::seconds(600)), 1);
        assert_eq!(reg.pending("a"), Some(0));
        assert_eq!(reg.pending("b"), Some(1));

        assert_eq!(reg.expire_all(t0() + TimeDelta::seconds(600)), 1);
        assert_eq!(reg.expire("missing", t0()), 0);
    }
}
