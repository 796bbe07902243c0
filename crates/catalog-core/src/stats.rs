//! Stats cache invalidated by the store file's modification time
//!
//! The check and the recompute are separate steps: two callers that both see a
//! changed fingerprint will both recompute. Recomputation is pure, so the only
//! cost is wasted work. The mutex is never held across I/O.

use crate::error::CoreError;
use crate::models::Stats;
use crate::store::{ItemStore, StoreFingerprint};
use parking_lot::Mutex;
use tracing::debug;

#[derive(Debug, Clone, Copy)]
struct CachedStats {
    fingerprint: StoreFingerprint,
    stats: Stats,
}

/// Process-wide memo of the last computed [`Stats`]
#[derive(Debug, Default)]
pub struct StatsCache {
    cached: Mutex<Option<CachedStats>>,
}

impl StatsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stats for the store's current contents, recomputed only when the file changed
    pub async fn get(&self, store: &ItemStore) -> Result<Stats, CoreError> {
        let fingerprint = store.fingerprint().await?;

        let cached = *self.cached.lock();
        if let Some(cached) = cached {
            if cached.fingerprint == fingerprint {
                debug!("Serving cached stats");
                return Ok(cached.stats);
            }
        }

        let items = store.read_all().await?;
        let stats = Stats::from_items(&items);

        *self.cached.lock() = Some(CachedStats { fingerprint, stats });
        debug!(total = stats.total, "Stats recomputed");

        Ok(stats)
    }

    /// Drop the cached snapshot so the next call recomputes
    pub fn invalidate(&self) {
        *self.cached.lock() = None;
    }

    /// Whether a snapshot is currently held
    pub fn is_warm(&self) -> bool {
        self.cached.lock().is_some()
    }
}
