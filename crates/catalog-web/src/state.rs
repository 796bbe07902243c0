//! Shared handler state

use catalog_core::{ItemStore, StatsCache};
use std::sync::Arc;

/// State injected into every handler.
///
/// The stats cache lives here rather than in a global so each router owns
/// its own cache lifecycle: empty at construction, dropped with the router.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ItemStore>,
    pub stats: Arc<StatsCache>,
}

impl AppState {
    pub fn new(store: ItemStore) -> Self {
        Self {
            store: Arc::new(store),
            stats: Arc::new(StatsCache::new()),
        }
    }
}
