use std::sync::Arc;

use tokio::time::{interval, Duration, MissedTickBehavior};

use crate::cache::TagCache;

/// Periodically drops cache entries whose TTL has passed.
pub async fn start_purge_task(cache: Arc<TagCache>, every: Duration) {
    let mut interval = interval(every);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        let purged = cache.purge_expired();
        if purged > 0 {
            tracing::info!("Purged {} expired cache entries", purged);
        }
    }
}
