//! cephprom exporter library entry.
//!
//! Wires the ceph collectors, the expiry sweepers and the HTTP scrape endpoint
//! around a shared [`cephprom_core::Registry`]. Consumed by the binary
//! (`main.rs`) and by integration tests.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod app_state;
pub mod ceph;
pub mod collect;
pub mod command;
pub mod config;
pub mod ops;
pub mod router;
pub mod sweep;
