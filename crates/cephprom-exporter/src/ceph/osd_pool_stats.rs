//! `ceph osd pool stats`: client I/O rates per pool, polled every 5 seconds.

use std::time::Duration;

use serde::Deserialize;

use cephprom_core::error::Result;

use super::{Emitter, Report};

pub struct OsdPoolStats;

#[derive(Debug, Deserialize)]
pub struct PoolIo {
    pub pool_id: i64,
    pub pool_name: String,
    /// Empty object (or absent) while the pool is idle.
    #[serde(default)]
    pub client_io_rate: ClientIoRate,
}

#[derive(Debug, Default, Deserialize)]
pub struct ClientIoRate {
    #[serde(default)]
    pub read_bytes_sec: f64,
    #[serde(default)]
    pub write_bytes_sec: f64,
    #[serde(default)]
    pub op_per_sec: f64,
}

impl Report for OsdPoolStats {
    const NAME: &'static str = "osd_pool_stats";
    const SUBCOMMAND: &'static [&'static str] = &["osd", "pool", "stats"];
    const INTERVAL: Duration = Duration::from_secs(5);

    type Data = Vec<PoolIo>;

    fn emit(&self, data: &Vec<PoolIo>, out: &mut Emitter<'_>) -> Result<()> {
        for pool in data {
            let id = pool.pool_id.to_string();
            let (id, name) = (id.as_str(), pool.pool_name.as_str());
            let io = &pool.client_io_rate;

            out.sample("ceph_pool", &[("pool", id), ("name", name)], 1.0);
            out.sample(
                "ceph_pool_bytes_second",
                &[("pool", id), ("name", name), ("type", "read")],
                io.read_bytes_sec,
            );
            out.sample(
                "ceph_pool_bytes_second",
                &[("pool", id), ("name", name), ("type", "write")],
                io.write_bytes_sec,
            );
            out.sample(
                "ceph_pool_operations_second",
                &[("pool", id), ("name", name)],
                io.op_per_sec,
            );
        }
        Ok(())
    }
}
