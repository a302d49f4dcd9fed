//! A render never observes part of a batch recorded concurrently.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use cephprom_core::{MetricType, Registry, Sample};

const RENDERS: usize = 20_000;

fn count(text: &str, metric: &str) -> usize {
    text.lines()
        .filter(|l| l.strip_prefix(metric).is_some_and(|rest| rest.starts_with(' ')))
        .count()
}

#[test]
fn concurrent_batches_render_whole() {
    let reg = Registry::new();
    // first and last in render order, so a torn batch would split across scrapes
    reg.declare("a_first", None, Some(MetricType::Gauge)).unwrap();
    reg.declare("z_last", None, Some(MetricType::Gauge)).unwrap();
    let stop = AtomicBool::new(false);

    let torn = thread::scope(|s| {
        s.spawn(|| {
            while !stop.load(Ordering::Relaxed) {
                reg.record_batch(vec![
                    ("a_first".to_string(), Sample::new(vec![], 1.0, None)),
                    ("z_last".to_string(), Sample::new(vec![], 1.0, None)),
                ]);
            }
        });

        let torn = (0..RENDERS)
            .filter(|_| {
                let text = reg.render_all();
                count(&text, "a_first") != count(&text, "z_last")
            })
            .count();
        stop.store(true, Ordering::Relaxed);
        torn
    });
    assert_eq!(torn, 0, "{torn} of {RENDERS} renders split a batch");

    let tail = reg.render_all();
    assert_eq!(count(&tail, "a_first"), count(&tail, "z_last"));
}
