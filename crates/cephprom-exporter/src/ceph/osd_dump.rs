//! `ceph osd dump`: pool replication settings and OSD up/in flags.

use serde::Deserialize;

use cephprom_core::error::Result;

use super::{Emitter, Report};

pub struct OsdDump;

#[derive(Debug, Deserialize)]
pub struct OsdDumpData {
    #[serde(default)]
    pub pools: Vec<Pool>,
    #[serde(default)]
    pub osds: Vec<Osd>,
}

#[derive(Debug, Deserialize)]
pub struct Pool {
    pub pool: i64,
    pub pool_name: String,
    pub size: f64,
    pub min_size: f64,
    pub pg_num: f64,
    pub pg_placement_num: f64,
}

#[derive(Debug, Deserialize)]
pub struct Osd {
    pub osd: i64,
    pub up: f64,
    #[serde(rename = "in")]
    pub in_: f64,
}

impl Report for OsdDump {
    const NAME: &'static str = "osd_dump";
    const SUBCOMMAND: &'static [&'static str] = &["osd", "dump"];

    type Data = OsdDumpData;

    fn emit(&self, data: &OsdDumpData, out: &mut Emitter<'_>) -> Result<()> {
        for pool in &data.pools {
            let id = pool.pool.to_string();
            let labels = [("pool", id.as_str()), ("name", pool.pool_name.as_str())];
            out.sample("ceph_pool", &labels, 1.0);
            out.sample("ceph_pool_size", &labels, pool.size);
            out.sample("ceph_pool_min_size", &labels, pool.min_size);
            out.sample("ceph_pool_pg_num", &labels, pool.pg_num);
            out.sample("ceph_pool_pgp_num", &labels, pool.pg_placement_num);
        }

        for osd in &data.osds {
            let id = osd.osd.to_string();
            let labels = [("osd", id.as_str())];
            out.sample("ceph_osd", &labels, 1.0);
            out.sample("ceph_osd_up", &labels, osd.up);
            out.sample("ceph_osd_down", &labels, 1.0 - osd.up);
            out.sample("ceph_osd_in", &labels, osd.in_);
            out.sample("ceph_osd_out", &labels, 1.0 - osd.in_);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ceph::testing::{emit, value};

    const JSON: &str = r#"{
        "epoch": 42,
        "pools": [
            {"pool": 1, "pool_name": "rbd", "size": 3, "min_size": 2, "pg_num": 128, "pg_placement_num": 64}
        ],
        "osds": [
            {"osd": 0, "uuid": "x", "up": 1, "in": 1},
            {"osd": 3, "uuid": "y", "up": 0, "in": 1}
        ]
    }"#;

    #[test]
    fn pools_and_osds() {
        let rows = emit(OsdDump, JSON);
        assert_eq!(rows.len(), 5 + 2 * 5);

        let pool = [("pool", "1"), ("name", "rbd")];
        assert_eq!(value(&rows, "ceph_pool_size", &pool), 3.0);
        assert_eq!(value(&rows, "ceph_pool_min_size", &pool), 2.0);
        assert_eq!(value(&rows, "ceph_pool_pg_num", &pool), 128.0);
        assert_eq!(value(&rows, "ceph_pool_pgp_num", &pool), 64.0);

        assert_eq!(value(&rows, "ceph_osd_up", &[("osd", "3")]), 0.0);
        assert_eq!(value(&rows, "ceph_osd_down", &[("osd", "3")]), 1.0);
        assert_eq!(value(&rows, "ceph_osd_in", &[("osd", "3")]), 1.0);
        assert_eq!(value(&rows, "ceph_osd_out", &[("osd", "0")]), 0.0);
    }

    #[test]
    fn missing_required_field_fails_decode() {
        let err = serde_json::from_str::<OsdDumpData>(r#"{"osds": [{"osd": 1, "up": 1}]}"#);
        assert!(err.is_err());
    }
}
