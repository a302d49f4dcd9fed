//! Every metric family the ceph collectors emit, with help text and type.
//!
//! Families must be declared before the first collector run; samples for an
//! undeclared name are dropped by the registry.

use cephprom_core::error::Result;
use cephprom_core::{MetricType, Registry};

use MetricType::{Counter, Gauge};

pub const METRICS: &[(&str, &str, MetricType)] = &[
    ("ceph", "Always 1 while the cluster answers", Gauge),
    ("ceph_bytes_recovered", "Bytes recovered", Counter),
    ("ceph_command_runtime", "Runtime of the ceph command in seconds", Gauge),
    ("ceph_epoch", "Epoch of a cluster map", Gauge),
    ("ceph_keys_recovered", "Keys recovered", Counter),
    ("ceph_mds_laggy_since", "Unix time since which the MDS is laggy", Gauge),
    ("ceph_mds_state", "Is the MDS in this state (1) or not (0)", Gauge),
    ("ceph_mon_count", "Number of monitors in the monmap", Gauge),
    ("ceph_mon_quorum", "Number of monitors in quorum", Gauge),
    ("ceph_objects", "Number of objects", Gauge),
    ("ceph_objects_recovered", "Objects recovered", Counter),
    ("ceph_osd", "OSD info, always 1", Gauge),
    ("ceph_osd_down", "Is the OSD down (1) or up (0)", Gauge),
    ("ceph_osd_in", "Is the OSD in (1) or out (0)", Gauge),
    ("ceph_osd_latency_seconds", "OSD latency in seconds", Gauge),
    ("ceph_osd_number_snap_trimming", "Number of PGs snap trimming on the OSD", Gauge),
    ("ceph_osd_out", "Is the OSD out (1) or in (0)", Gauge),
    ("ceph_osd_snap_trim_queue_length", "Snap trim queue length of the OSD", Gauge),
    ("ceph_osd_up", "Is the OSD up (1) or down (0)", Gauge),
    ("ceph_pg", "PG info, always 1", Gauge),
    ("ceph_pg_state", "Is the PG in this state (1) or not (0)", Gauge),
    ("ceph_pg_states", "Number of PGs in each state", Gauge),
    ("ceph_pg_timestamp", "Unix time of a PG event", Gauge),
    ("ceph_pgmap_version", "Version of the PG map", Gauge),
    ("ceph_pool", "Pool info, always 1", Gauge),
    ("ceph_pool_bytes_second", "Client I/O of the pool in bytes per second", Gauge),
    ("ceph_pool_min_size", "Minimum number of replicas for I/O", Gauge),
    ("ceph_pool_operations_second", "Client operations of the pool per second", Gauge),
    ("ceph_pool_pg_num", "Number of PGs in the pool", Gauge),
    ("ceph_pool_pgp_num", "Number of PGs used for placement", Gauge),
    ("ceph_pool_size", "Number of replicas", Gauge),
    ("ceph_read_bytes", "Bytes read", Counter),
    ("ceph_read_ops", "Read operations", Counter),
    ("ceph_storage_bytes", "Storage capacity in bytes", Gauge),
    ("ceph_write_bytes", "Bytes written", Counter),
    ("ceph_write_ops", "Write operations", Counter),
];

pub fn declare_all(registry: &Registry) -> Result<()> {
    for &(name, help, kind) in METRICS {
        registry.declare(name, Some(help), Some(kind))?;
    }
    Ok(())
}
