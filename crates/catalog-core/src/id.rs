//! Item id assignment
//!
//! Ids are milliseconds since the Unix epoch, bumped past the largest existing id
//! when two creations land in the same millisecond (or the clock steps back).

use crate::models::Item;
use chrono::Utc;

/// Next id for a collection, given the current wall-clock time in milliseconds
pub fn next_id_at(items: &[Item], now_ms: u64) -> u64 {
    let floor = items
        .iter()
        .map(|item| item.id)
        .max()
        .map_or(0, |max| max.saturating_add(1));
    now_ms.max(floor)
}

/// Next id for a collection using the system clock
pub fn next_id(items: &[Item]) -> u64 {
    let now_ms = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
    next_id_at(items, now_ms)
}
