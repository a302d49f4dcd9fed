//! `ceph df`: cluster and per-pool storage usage.

use serde::Deserialize;

use cephprom_core::error::Result;

use super::{Emitter, Report};

pub struct Df;

#[derive(Debug, Deserialize)]
pub struct DfData {
    pub stats: ClusterStats,
    #[serde(default)]
    pub pools: Vec<Pool>,
}

#[derive(Debug, Deserialize)]
pub struct ClusterStats {
    #[serde(default)]
    pub total_bytes: Option<f64>,
    pub total_used_bytes: f64,
    pub total_avail_bytes: f64,
}

#[derive(Debug, Deserialize)]
pub struct Pool {
    pub id: i64,
    pub name: String,
    pub stats: PoolStats,
}

#[derive(Debug, Deserialize)]
pub struct PoolStats {
    pub bytes_used: f64,
    pub objects: f64,
}

impl Report for Df {
    const NAME: &'static str = "df";
    const SUBCOMMAND: &'static [&'static str] = &["df"];

    type Data = DfData;

    fn emit(&self, data: &DfData, out: &mut Emitter<'_>) -> Result<()> {
        let stats = &data.stats;
        if let Some(total) = stats.total_bytes {
            out.sample("ceph_storage_bytes", &[("scope", "cluster"), ("type", "total")], total);
        }
        out.sample(
            "ceph_storage_bytes",
            &[("scope", "cluster"), ("type", "used")],
            stats.total_used_bytes,
        );
        out.sample(
            "ceph_storage_bytes",
            &[("scope", "cluster"), ("type", "available")],
            stats.total_avail_bytes,
        );

        for pool in &data.pools {
            let id = pool.id.to_string();
            let id = id.as_str();
            let name = pool.name.as_str();
            out.sample("ceph_pool", &[("pool", id), ("name", name)], 1.0);
            out.sample(
                "ceph_storage_bytes",
                &[("scope", "pool"), ("pool", id), ("name", name), ("type", "used")],
                pool.stats.bytes_used,
            );
            out.sample(
                "ceph_objects",
                &[("scope", "pool"), ("pool", id), ("name", name), ("type", "objects")],
                pool.stats.objects,
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ceph::testing::{emit, value};

    const JSON: &str = r#"{
        "stats": {"total_bytes": 300, "total_used_bytes": 100, "total_avail_bytes": 200},
        "pools": [
            {"name": "rbd", "id": 0, "stats": {"kb_used": 1, "bytes_used": 1024, "max_avail": 9, "objects": 7}},
            {"name": "cephfs_data", "id": 3, "stats": {"bytes_used": 0, "objects": 0}}
        ]
    }"#;

    #[test]
    fn cluster_and_pool_usage() {
        let rows = emit(Df, JSON);
        assert_eq!(rows.len(), 3 + 2 * 3);
        let cluster = |kind| [("scope", "cluster"), ("type", kind)];
        assert_eq!(value(&rows, "ceph_storage_bytes", &cluster("total")), 300.0);
        assert_eq!(value(&rows, "ceph_storage_bytes", &cluster("available")), 200.0);
        assert_eq!(value(&rows, "ceph_pool", &[("pool", "3"), ("name", "cephfs_data")]), 1.0);
        assert_eq!(
            value(
                &rows,
                "ceph_storage_bytes",
                &[("scope", "pool"), ("pool", "0"), ("name", "rbd"), ("type", "used")]
            ),
            1024.0
        );
        assert_eq!(
            value(
                &rows,
                "ceph_objects",
                &[("scope", "pool"), ("pool", "0"), ("name", "rbd"), ("type", "objects")]
            ),
            7.0
        );
    }

    #[test]
    fn total_is_optional() {
        let rows = emit(Df, r#"{"stats": {"total_used_bytes": 1, "total_avail_bytes": 2}}"#);
        assert_eq!(rows.len(), 2);
    }
}
