//! cephprom core: the metrics registry and text exposition engine.
//!
//! This crate stores declared metric families, accepts timestamped labeled
//! samples from collectors, expires stale samples, and renders the current
//! state into the Prometheus text format (version 0.0.4). It carries no
//! runtime or transport dependencies; scheduling lives in the exporter crate.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here.
//! Recording a sample never fails loudly: an undeclared metric name or a bad
//! label set is logged and the sample is dropped, so a single bad collector
//! cannot take the process down.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod exposition;
pub mod registry;

pub use error::{Error, ErrorKind, Result};
pub use exposition::{Label, Metric, MetricType, Sample};
pub use registry::{Registry, STALENESS_WINDOW, SWEEP_INTERVAL};
