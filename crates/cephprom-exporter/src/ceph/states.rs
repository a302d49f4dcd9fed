//! Placement group states and small parsing helpers shared by the reports.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};

/// PG states that always get a sample (0 when no PG is in them), so series
/// do not vanish when a state empties out.
pub const KNOWN_PG_STATES: &[&str] = &[
    "activating",
    "activating+degraded",
    "activating+degraded+remapped",
    "activating+remapped",
    "activating+undersized+degraded",
    "activating+undersized+degraded+remapped",
    "active",
    "active+clean",
    "active+clean+inconsistent",
    "active+clean+scrubbing",
    "active+clean+scrubbing+deep",
    "active+clean+scrubbing+deep+inconsistent+repair",
    "active+degraded",
    "active+degraded+remapped",
    "active+degraded+remapped+backfilling",
    "active+recovering+degraded",
    "active+recovering+degraded+remapped",
    "active+recovery_wait+degraded",
    "active+recovery_wait+degraded+remapped",
    "active+remapped",
    "active+remapped+backfill_toofull",
    "active+remapped+backfilling",
    "active+remapped+wait_backfill",
    "active+remapped+wait_backfill+backfill_toofull",
    "active+undersized+degraded",
    "active+undersized+degraded+remapped",
    "active+undersized+degraded+remapped+backfill_toofull",
    "active+undersized+degraded+remapped+backfilling",
    "active+undersized+degraded+remapped+wait_backfill",
    "active+undersized+degraded+remapped+wait_backfill+backfill_toofull",
    "active+undersized+remapped",
    "creating",
    "inactive",
    "peering",
    "remapped",
    "remapped+peering",
    "stale+active+clean",
    "stale+active+remapped+backfilling",
];

pub fn is_known_pg_state(state: &str) -> bool {
    KNOWN_PG_STATES.contains(&state)
}

/// Pool id of a PG id: `"1.2f"` -> `"1"`. Both halves must be hex.
pub fn pgid_to_pool(pgid: &str) -> Option<&str> {
    let (pool, seed) = pgid.split_once('.')?;
    let hex = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_hexdigit());
    (hex(pool) && hex(seed)).then_some(pool)
}

/// Seconds since the epoch for a ceph timestamp.
///
/// Older releases print local wall-clock time without an offset
/// (`2017-03-01 12:34:56.123456`); newer ones append one
/// (`2021-03-01T12:34:56.123456+0000`).
pub fn parse_ceph_time(s: &str) -> Option<f64> {
    let to_secs = |secs: i64, nanos: u32| secs as f64 + f64::from(nanos) / 1e9;

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"] {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(to_secs(dt.timestamp(), dt.timestamp_subsec_nanos()));
        }
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            let dt = Local.from_local_datetime(&naive).earliest()?;
            return Some(to_secs(dt.timestamp(), dt.timestamp_subsec_nanos()));
        }
    }
    None
}
