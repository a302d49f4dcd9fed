//! `ceph mds dump`: MDS map epoch and per-daemon state.

use std::collections::BTreeMap;

use serde::Deserialize;

use cephprom_core::error::Result;

use super::states::parse_ceph_time;
use super::{Emitter, Report};

/// States that always get a sample per daemon.
const MDS_STATES: &[&str] = &["up:active", "up:replay", "up:rejoin"];

pub struct MdsDump;

#[derive(Debug, Deserialize)]
pub struct MdsDumpData {
    pub epoch: f64,
    #[serde(default)]
    pub info: BTreeMap<String, MdsInfo>,
}

#[derive(Debug, Deserialize)]
pub struct MdsInfo {
    pub gid: i64,
    pub rank: i64,
    pub name: String,
    pub state: String,
    #[serde(default)]
    pub laggy_since: Option<String>,
}

impl Report for MdsDump {
    const NAME: &'static str = "mds_dump";
    const SUBCOMMAND: &'static [&'static str] = &["mds", "dump"];

    type Data = MdsDumpData;

    fn emit(&self, data: &MdsDumpData, out: &mut Emitter<'_>) -> Result<()> {
        out.sample("ceph_epoch", &[("type", "mds")], data.epoch);

        for info in data.info.values() {
            let gid = info.gid.to_string();
            let rank = info.rank.to_string();
            let (gid, rank, name) = (gid.as_str(), rank.as_str(), info.name.as_str());

            for &state in MDS_STATES {
                let v = if info.state == state { 1.0 } else { 0.0 };
                out.sample(
                    "ceph_mds_state",
                    &[("gid", gid), ("rank", rank), ("name", name), ("state", state)],
                    v,
                );
            }
            if !MDS_STATES.contains(&info.state.as_str()) {
                out.sample(
                    "ceph_mds_state",
                    &[("gid", gid), ("rank", rank), ("name", name), ("state", info.state.as_str())],
                    1.0,
                );
            }

            // a daemon that is not laggy reports "laggy since now"
            let laggy_since = match &info.laggy_since {
                Some(raw) => parse_ceph_time(raw).ok_or_else(|| {
                    out.malformed(format!("unparseable laggy_since of {name}"), raw.as_str())
                })?,
                None => {
                    let at = out.at();
                    at.timestamp() as f64 + f64::from(at.timestamp_subsec_nanos()) / 1e9
                }
            };
            out.sample(
                "ceph_mds_laggy_since",
                &[("gid", gid), ("rank", rank), ("name", name)],
                laggy_since,
            );
        }
        Ok(())
    }
}
