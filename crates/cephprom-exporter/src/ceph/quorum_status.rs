//! `ceph quorum_status`: monitor count, quorum size and epochs.

use serde::Deserialize;

use cephprom_core::error::Result;

use super::{Emitter, Report};

pub struct QuorumStatus;

#[derive(Debug, Deserialize)]
pub struct QuorumStatusData {
    pub election_epoch: f64,
    pub quorum: Vec<serde_json::Value>,
    pub monmap: MonMap,
}

#[derive(Debug, Deserialize)]
pub struct MonMap {
    pub epoch: f64,
    pub mons: Vec<serde_json::Value>,
}

impl Report for QuorumStatus {
    const NAME: &'static str = "quorum_status";
    const SUBCOMMAND: &'static [&'static str] = &["quorum_status"];

    type Data = QuorumStatusData;

    fn emit(&self, data: &QuorumStatusData, out: &mut Emitter<'_>) -> Result<()> {
        out.sample("ceph_mon_count", &[], data.monmap.mons.len() as f64);
        out.sample("ceph_mon_quorum", &[], data.quorum.len() as f64);
        out.sample("ceph_epoch", &[("type", "mon")], data.monmap.epoch);
        out.sample("ceph_epoch", &[("type", "mon_election")], data.election_epoch);
        Ok(())
    }
}
