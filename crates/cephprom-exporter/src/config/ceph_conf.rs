//! Minimal reader for the ceph INI config: only the cluster `fsid` is needed.

use std::fs;

use cephprom_core::error::{Error, Result};

pub fn read_fsid(path: &str) -> Result<String> {
    let s = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("read ceph config {path} failed: {e}")))?;
    fsid_from_str(&s).ok_or_else(|| Error::Config(format!("no fsid in [global] section of {path}")))
}

pub fn fsid_from_str(s: &str) -> Option<String> {
    let mut in_global = false;
    for line in s.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if let Some(section) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            in_global = section.trim() == "global";
            continue;
        }
        if !in_global {
            continue;
        }
        if let Some((key, value)) = line.split_once('=').or_else(|| line.split_once(':')) {
            if key.trim() == "fsid" {
                let value = value.trim();
                if !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
    }
    None
}
