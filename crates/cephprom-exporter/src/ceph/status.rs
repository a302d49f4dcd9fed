//! `ceph status`: PG counts by state and the PG map version.

use std::collections::HashSet;

use serde::Deserialize;

use cephprom_core::error::Result;

use super::states::{is_known_pg_state, KNOWN_PG_STATES};
use super::{Emitter, Report};

pub struct Status;

#[derive(Debug, Deserialize)]
pub struct StatusData {
    pub pgmap: PgMapSummary,
}

#[derive(Debug, Deserialize)]
pub struct PgMapSummary {
    #[serde(default)]
    pub pgs_by_state: Vec<PgsByState>,
    /// Dropped from the output in newer releases.
    #[serde(default)]
    pub version: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct PgsByState {
    pub state_name: String,
    pub count: f64,
}

impl Report for Status {
    const NAME: &'static str = "status";
    const SUBCOMMAND: &'static [&'static str] = &["status"];

    type Data = StatusData;

    fn emit(&self, data: &StatusData, out: &mut Emitter<'_>) -> Result<()> {
        let mut seen = HashSet::new();
        for s in &data.pgmap.pgs_by_state {
            if !is_known_pg_state(&s.state_name) {
                tracing::debug!(state = %s.state_name, "unknown pg state");
            }
            seen.insert(s.state_name.as_str());
            out.sample("ceph_pg_states", &[("state", s.state_name.as_str())], s.count);
        }
        for &state in KNOWN_PG_STATES {
            if !seen.contains(state) {
                out.sample("ceph_pg_states", &[("state", state)], 0.0);
            }
        }

        if let Some(version) = data.pgmap.version {
            out.sample("ceph_pgmap_version", &[], version);
        }
        Ok(())
    }
}
