//! catalog-client - Client data layer for the catalog API
//!
//! [`ApiClient`] talks HTTP; [`ItemsBrowser`] drives a paginated, searchable list on
//! top of any [`ItemsSource`], debouncing keystrokes and cancelling superseded fetches.

pub mod api;
pub mod browser;
pub mod error;

pub use api::{ApiClient, FetchParams, ItemsSource};
pub use browser::{ItemsBrowser, ListState, DEBOUNCE, PAGE_SIZE};
pub use error::ClientError;
