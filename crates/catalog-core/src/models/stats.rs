//! Aggregate statistics over the item collection

use super::Item;
use serde::{Deserialize, Serialize};

/// Stats snapshot served by `/api/stats`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total: usize,
    pub average_price: f64,
}

impl Stats {
    /// Compute from a full collection.
    ///
    /// An empty collection averages to 0 so the value stays representable in JSON.
    pub fn from_items(items: &[Item]) -> Self {
        let total = items.len();
        if total == 0 {
            return Self::default();
        }

        let sum: f64 = items.iter().map(|item| item.price).sum();
        Self {
            total,
            average_price: sum / total as f64,
        }
    }
}
