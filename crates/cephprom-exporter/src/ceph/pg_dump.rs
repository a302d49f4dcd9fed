//! `ceph pg dump`: object counts, I/O totals and per-OSD / per-PG detail.
//!
//! Releases before Nautilus print the PG map at the top level; later ones nest
//! it under `pg_map`. Both shapes are accepted.

use std::collections::BTreeMap;

use serde::Deserialize;

use cephprom_core::error::Result;

use super::states::{is_known_pg_state, parse_ceph_time, pgid_to_pool, KNOWN_PG_STATES};
use super::{Emitter, Report};

pub struct PgDump;

/// `stat_sum` key -> `type` label of `ceph_objects`.
const OBJECT_STATS: &[(&str, &str)] = &[
    ("num_objects", "objects"),
    ("num_object_clones", "clones"),
    ("num_object_copies", "copies"),
    ("num_objects_missing_on_primary", "missing_on_primary"),
    ("num_objects_degraded", "degraded"),
    ("num_objects_misplaced", "misplaced"),
    ("num_objects_unfound", "unfound"),
    ("num_objects_dirty", "dirty"),
];

/// PG field -> `event` label of `ceph_pg_timestamp`.
const PG_EVENTS: &[(&str, &str)] = &[
    ("last_fresh", "last_fresh"),
    ("last_change", "last_change"),
    ("last_active", "last_active"),
    ("last_peered", "last_peered"),
    ("last_clean", "last_clean"),
    ("last_became_active", "last_became_active"),
    ("last_became_peered", "last_became_peered"),
    ("last_unstale", "last_unstale"),
    ("last_undegraded", "last_undegraded"),
    ("last_fullsized", "last_fullsized"),
    ("last_scrub_stamp", "last_scrub"),
    ("last_deep_scrub_stamp", "last_deep_scrub"),
    ("last_clean_scrub_stamp", "last_clean_scrub"),
];

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PgDumpData {
    Nested { pg_map: PgMap },
    Flat(PgMap),
}

impl PgDumpData {
    pub fn pg_map(&self) -> &PgMap {
        match self {
            PgDumpData::Nested { pg_map } => pg_map,
            PgDumpData::Flat(pg_map) => pg_map,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PgMap {
    pub pg_stats_sum: PgStatsSum,
    #[serde(default)]
    pub osd_stats: Vec<OsdStat>,
    #[serde(default)]
    pub pg_stats: Vec<PgStat>,
}

#[derive(Debug, Deserialize)]
pub struct PgStatsSum {
    pub stat_sum: StatSum,
}

/// Flat map of integer counters; only the keys we know about are exported.
#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct StatSum(BTreeMap<String, f64>);

impl StatSum {
    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }
}

#[derive(Debug, Deserialize)]
pub struct OsdStat {
    pub osd: i64,
    pub kb_avail: f64,
    pub kb_used: f64,
    #[serde(default)]
    pub snap_trim_queue_len: f64,
    #[serde(default)]
    pub num_snap_trimming: f64,
    #[serde(default, alias = "perf_stat")]
    pub fs_perf_stat: Option<PerfStat>,
}

#[derive(Debug, Deserialize)]
pub struct PerfStat {
    pub apply_latency_ms: f64,
    pub commit_latency_ms: f64,
}

#[derive(Debug, Deserialize)]
pub struct PgStat {
    pub pgid: String,
    pub state: String,
    pub stat_sum: StatSum,
    /// Event timestamps (`last_fresh`, `last_scrub_stamp`, ...) and anything else.
    #[serde(flatten)]
    pub rest: BTreeMap<String, serde_json::Value>,
}

impl Report for PgDump {
    const NAME: &'static str = "pg_dump";
    const SUBCOMMAND: &'static [&'static str] = &["pg", "dump"];

    type Data = PgDumpData;

    fn emit(&self, data: &PgDumpData, out: &mut Emitter<'_>) -> Result<()> {
        let map = data.pg_map();
        let sum = &map.pg_stats_sum.stat_sum;

        for &(key, kind) in OBJECT_STATS {
            if let Some(v) = sum.get(key) {
                out.sample("ceph_objects", &[("scope", "cluster"), ("type", kind)], v);
            }
        }
        emit_io(out, sum, &[("scope", "cluster")]);

        for osd in &map.osd_stats {
            let id = osd.osd.to_string();
            let id = id.as_str();
            out.sample("ceph_osd", &[("osd", id)], 1.0);
            out.sample(
                "ceph_storage_bytes",
                &[("scope", "osd"), ("osd", id), ("type", "available")],
                osd.kb_avail * 1024.0,
            );
            out.sample(
                "ceph_storage_bytes",
                &[("scope", "osd"), ("osd", id), ("type", "used")],
                osd.kb_used * 1024.0,
            );
            out.sample("ceph_osd_snap_trim_queue_length", &[("osd", id)], osd.snap_trim_queue_len);
            out.sample("ceph_osd_number_snap_trimming", &[("osd", id)], osd.num_snap_trimming);
            if let Some(perf) = &osd.fs_perf_stat {
                out.sample(
                    "ceph_osd_latency_seconds",
                    &[("osd", id), ("type", "apply")],
                    perf.apply_latency_ms / 1000.0,
                );
                out.sample(
                    "ceph_osd_latency_seconds",
                    &[("osd", id), ("type", "commit")],
                    perf.commit_latency_ms / 1000.0,
                );
            }
        }

        for pg in &map.pg_stats {
            emit_pg(out, pg)?;
        }
        Ok(())
    }
}

fn emit_io(out: &mut Emitter<'_>, sum: &StatSum, labels: &[(&str, &str)]) {
    for direction in ["read", "write"] {
        if let Some(ops) = sum.get(&format!("num_{direction}")) {
            out.sample(&format!("ceph_{direction}_ops"), labels, ops);
        }
        if let Some(kb) = sum.get(&format!("num_{direction}_kb")) {
            out.sample(&format!("ceph_{direction}_bytes"), labels, kb * 1024.0);
        }
    }
}

fn emit_pg(out: &mut Emitter<'_>, pg: &PgStat) -> Result<()> {
    let pgid = pg.pgid.as_str();
    let pool = pgid_to_pool(pgid)
        .ok_or_else(|| out.malformed("unparseable pgid", pgid))?;
    let sum = &pg.stat_sum;

    out.sample("ceph_pg", &[("pool", pool), ("pgid", pgid)], 1.0);
    if let Some(bytes) = sum.get("num_bytes") {
        out.sample(
            "ceph_storage_bytes",
            &[("scope", "pg"), ("pool", pool), ("pgid", pgid), ("type", "used")],
            bytes,
        );
    }
    for &(key, kind) in OBJECT_STATS {
        if let Some(v) = sum.get(key) {
            out.sample(
                "ceph_objects",
                &[("scope", "pg"), ("pool", pool), ("pgid", pgid), ("type", kind)],
                v,
            );
        }
    }
    emit_io(out, sum, &[("scope", "pg"), ("pool", pool), ("pgid", pgid)]);
    for stat in ["objects", "bytes", "keys"] {
        if let Some(v) = sum.get(&format!("num_{stat}_recovered")) {
            out.sample(
                &format!("ceph_{stat}_recovered"),
                &[("scope", "pg"), ("pool", pool), ("pgid", pgid)],
                v,
            );
        }
    }

    for &(key, event) in PG_EVENTS {
        let Some(raw) = pg.rest.get(key).and_then(|v| v.as_str()) else {
            continue;
        };
        let secs = parse_ceph_time(raw)
            .ok_or_else(|| out.malformed(format!("unparseable {key} of pg {pgid}"), raw))?;
        out.sample(
            "ceph_pg_timestamp",
            &[("pool", pool), ("pgid", pgid), ("event", event)],
            secs,
        );
    }

    for &state in KNOWN_PG_STATES {
        let v = if pg.state == state { 1.0 } else { 0.0 };
        out.sample(
            "ceph_pg_state",
            &[("pool", pool), ("pgid", pgid), ("state", state)],
            v,
        );
    }
    if !is_known_pg_state(&pg.state) {
        tracing::debug!(state = %pg.state, %pgid, "unknown pg state");
        out.sample(
            "ceph_pg_state",
            &[("pool", pool), ("pgid", pgid), ("state", pg.state.as_str())],
            1.0,
        );
    }
    Ok(())
}
