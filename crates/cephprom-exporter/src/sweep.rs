//! Background expiry of stale samples.
//!
//! Independent of scraping: a family that nobody renders for a while still
//! sheds samples older than the staleness window.

use std::sync::Arc;

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use cephprom_core::{Registry, SWEEP_INTERVAL};

/// One sweeper task per declared family; the first sweep runs one interval
/// after startup. The tasks live for the rest of the process.
pub fn spawn_sweepers(registry: Arc<Registry>) -> Vec<JoinHandle<()>> {
    registry
        .names()
        .into_iter()
        .map(|name| spawn_sweeper(Arc::clone(&registry), name))
        .collect()
}

fn spawn_sweeper(registry: Arc<Registry>, name: String) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = time::interval_at(Instant::now() + SWEEP_INTERVAL, SWEEP_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let dropped = registry.expire(&name, Utc::now());
            if dropped > 0 {
                tracing::debug!(metric = %name, dropped, "expired stale samples");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use cephprom_core::MetricType;

    #[tokio::test(start_paused = true)]
    async fn sweeper_drops_old_samples_only() {
        let reg = Arc::new(Registry::new());
        reg.declare("m", None, Some(MetricType::Gauge)).unwrap();
        reg.declare("n", None, None).unwrap();

        let old = Utc::now() - chrono::Duration::seconds(600);
        let fresh = Utc::now() - chrono::Duration::seconds(400);
        reg.record_sample("m", vec![], 1.0, Some(old));
        reg.record_sample("m", vec![], 2.0, Some(fresh));
        reg.record_sample("n", vec![], 3.0, Some(old));

        let handles = spawn_sweepers(Arc::clone(&reg));
        assert_eq!(handles.len(), 2);

        // nothing happens before the first interval
        tokio::time::sleep(Duration::from_secs(29)).await;
        assert_eq!(reg.pending("m"), Some(2));

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(reg.pending("m"), Some(1));
        assert_eq!(reg.pending("n"), Some(0));

        for h in handles {
            h.abort();
        }
    }
}
