//! Prometheus text exposition primitives.
//!
//! - `label`  : name/value pairs and value escaping
//! - `sample` : one labeled observation with an optional timestamp
//! - `metric` : a typed, documented family that owns its live samples

pub mod label;
pub mod metric;
pub mod sample;

pub use label::{escape, Label};
pub use metric::{Metric, MetricType};
pub use sample::Sample;

/// `[a-zA-Z_:][a-zA-Z0-9_:]*`
pub fn is_valid_metric_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}

/// `[a-zA-Z_][a-zA-Z0-9_]*`
pub fn is_valid_label_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_names() {
        assert!(is_valid_metric_name("ceph_osd_up"));
        assert!(is_valid_metric_name("job:ceph_up:sum"));
        assert!(is_valid_metric_name("_hidden"));
        assert!(!is_valid_metric_name(""));
        assert!(!is_valid_metric_name("9lives"));
        assert!(!is_valid_metric_name("ceph-osd"));
    }

    #[test]
    fn label_names() {
        assert!(is_valid_label_name("fsid"));
        assert!(is_valid_label_name("_x1"));
        assert!(!is_valid_label_name("a:b"));
        assert!(!is_valid_label_name("1a"));
        assert!(!is_valid_label_name(""));
    }
}
