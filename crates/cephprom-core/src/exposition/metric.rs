use std::fmt::{self, Write};
use std::str::FromStr;

use chrono::{DateTime, Utc};

use super::sample::Sample;
use crate::error::Error;

/// Metric family type as written on the `# TYPE` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricType {
    Counter,
    Gauge,
    Untyped,
}

impl MetricType {
    pub fn as_str(self) -> &'static str {
        match self {
            MetricType::Counter => "counter",
            MetricType::Gauge => "gauge",
            MetricType::Untyped => "untyped",
        }
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "counter" => Ok(MetricType::Counter),
            "gauge" => Ok(MetricType::Gauge),
            "untyped" => Ok(MetricType::Untyped),
            other => Err(Error::Config(format!("unknown metric type: {other}"))),
        }
    }
}

/// A named family and the samples recorded since the last render.
#[derive(Debug, Clone)]
pub struct Metric {
    name: String,
    help: Option<String>,
    kind: Option<MetricType>,
    samples: Vec<Sample>,
}

impl Metric {
    pub fn new(name: impl Into<String>, help: Option<String>, kind: Option<MetricType>) -> Self {
        Self {
            name: name.into(),
            help,
            kind,
            samples: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    pub fn kind(&self) -> Option<MetricType> {
        self.kind
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn add_sample(&mut self, sample: Sample) {
        self.samples.push(sample);
    }

    /// Keep only samples inside the staleness window. Returns how many were dropped.
    pub fn expire_samples(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.samples.len();
        self.samples.retain(|s| s.is_fresh(now));
        before - self.samples.len()
    }

    /// Write the family block and clear the samples.
    ///
    /// Scrapers reject repeated samples for the same series, so every render
    /// only carries what was recorded since the previous one.
    pub fn render(&mut self, out: &mut String) {
        if let Some(help) = &self.help {
            let _ = writeln!(out, "# HELP {} {}", self.name, escape_help(help));
        }
        if let Some(kind) = self.kind {
            let _ = writeln!(out, "# TYPE {} {}", self.name, kind);
        }

        let mut samples = std::mem::take(&mut self.samples);
        // None sorts first; stable sort keeps insertion order on ties.
        samples.sort_by_key(Sample::timestamp_millis);
        for sample in &samples {
            let _ = writeln!(out, "{}{}", self.name, sample);
        }
    }

    /// Convenience wrapper around [`Metric::render`].
    pub fn render_to_string(&mut self) -> String {
        let mut out = String::new();
        self.render(&mut out);
        out
    }
}

fn escape_help(v: &str) -> String {
    v.replace('\\', "\\\\").replace('\n', "\\n")
}
