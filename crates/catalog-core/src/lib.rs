//! catalog-core - Core library for catalog
//!
//! Provides the item model, JSON file store, query engine and stats cache.

pub mod error;
pub mod id;
pub mod models;
pub mod query;
pub mod stats;
pub mod store;

pub use error::CoreError;
pub use models::{Item, ItemsPage, NewItem, Stats};
pub use query::{query, QueryParams};
pub use stats::StatsCache;
pub use store::{ItemStore, StoreFingerprint};
