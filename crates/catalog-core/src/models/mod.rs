//! Data models for catalog

pub mod item;
pub mod stats;

pub use item::{Item, ItemsPage, NewItem};
pub use stats::Stats;
