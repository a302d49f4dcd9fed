use std::fmt;

use chrono::{DateTime, Utc};

use super::label::Label;
use crate::registry::STALENESS_WINDOW;

/// One labeled observation. Has no identity beyond its fields; identical
/// samples are never merged.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    labels: Vec<Label>,
    value: f64,
    timestamp: Option<DateTime<Utc>>,
    recorded_at: DateTime<Utc>,
}

impl Sample {
    pub fn new(labels: Vec<Label>, value: f64, timestamp: Option<DateTime<Utc>>) -> Self {
        Self::recorded_at(labels, value, timestamp, Utc::now())
    }

    /// Build a sample with an explicit arrival time. Retention of samples
    /// without a timestamp is measured from this instant.
    pub fn recorded_at(
        labels: Vec<Label>,
        value: f64,
        timestamp: Option<DateTime<Utc>>,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            labels,
            value,
            timestamp,
            recorded_at,
        }
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }

    /// Milliseconds since the epoch, rounded half-up.
    pub fn timestamp_millis(&self) -> Option<i64> {
        self.timestamp.map(round_millis)
    }

    /// Retention predicate: true while the sample is younger than the
    /// staleness window. Samples stamped in the future count as fresh.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        let at = self.timestamp.unwrap_or(self.recorded_at);
        match (now - at).to_std() {
            Ok(age) => age < STALENESS_WINDOW,
            Err(_) => true,
        }
    }
}

fn round_millis(ts: DateTime<Utc>) -> i64 {
    ts.timestamp() * 1000 + (i64::from(ts.timestamp_subsec_nanos()) + 500_000) / 1_000_000
}

/// Prometheus spelling for non-finite values.
pub(crate) fn format_value(v: f64) -> String {
    if v.is_nan() {
        "NaN".into()
    } else if v.is_infinite() {
        if v > 0.0 { "+Inf".into() } else { "-Inf".into() }
    } else {
        v.to_string()
    }
}

impl fmt::Display for Sample {
    /// `{a="b",c="d"} value [timestamp_ms]`; the metric name is written by the family.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.labels.is_empty() {
            f.write_str("{")?;
            for (i, label) in self.labels.iter().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{label}")?;
            }
            f.write_str("}")?;
        }
        write!(f, " {}", format_value(self.value))?;
        if let Some(ms) = self.timestamp_millis() {
            write!(f, " {ms}")?;
        }
        Ok(())
    }
}
