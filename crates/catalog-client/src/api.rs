//! HTTP client for the catalog API

use crate::error::ClientError;
use catalog_core::{Item, ItemsPage, NewItem, Stats};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::future::Future;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Parameters for one page fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchParams {
    /// Search text; empty means no filter
    pub q: String,
    pub page: usize,
    pub limit: usize,
}

impl Default for FetchParams {
    fn default() -> Self {
        Self {
            q: String::new(),
            page: 1,
            limit: 10,
        }
    }
}

/// Something that can produce pages of items
///
/// Implementations should give up promptly once `cancel` fires; the browser
/// also races every fetch against the token, so slow ones are dropped anyway.
pub trait ItemsSource: Send + Sync + 'static {
    fn fetch_items(
        &self,
        params: FetchParams,
        cancel: CancellationToken,
    ) -> impl Future<Output = Result<ItemsPage, ClientError>> + Send;
}

/// Paginated list body; missing page numbers fall back to page 1 of 1
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageResponse {
    items: Vec<Item>,
    #[serde(default = "first_page")]
    page: usize,
    #[serde(default = "first_page")]
    total_pages: usize,
}

fn first_page() -> usize {
    1
}

fn single_page(items: Vec<Item>) -> ItemsPage {
    ItemsPage {
        items,
        page: 1,
        total_pages: 1,
    }
}

/// Decode a list response body
///
/// Accepts a paginated object, a bare array of items, or an object without
/// `items` (an empty page). Anything else, including an `items` list that does
/// not hold valid items, is a [`ClientError::Decode`].
pub fn decode_items_page(body: &[u8]) -> Result<ItemsPage, ClientError> {
    let value: Value = serde_json::from_slice(body)?;

    match value {
        Value::Array(_) => Ok(single_page(serde_json::from_value(value)?)),
        Value::Object(ref fields) if !fields.contains_key("items") => {
            debug!("List response has no items; treating as empty");
            Ok(single_page(Vec::new()))
        }
        Value::Object(_) => {
            let response: PageResponse = serde_json::from_value(value)?;
            Ok(ItemsPage {
                items: response.items,
                page: response.page,
                total_pages: response.total_pages,
            })
        }
        other => Err(ClientError::Decode(serde::de::Error::custom(format!(
            "expected an object or array of items, got {other}"
        )))),
    }
}

/// Thin wrapper around `reqwest` for the catalog endpoints
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetch one page of items, aborting as soon as `cancel` fires
    pub async fn fetch_items(
        &self,
        params: &FetchParams,
        cancel: &CancellationToken,
    ) -> Result<ItemsPage, ClientError> {
        let mut query: Vec<(&str, String)> = Vec::with_capacity(3);
        if !params.q.is_empty() {
            query.push(("q", params.q.clone()));
        }
        query.push(("page", params.page.to_string()));
        query.push(("limit", params.limit.to_string()));

        let request = async {
            let response = self
                .http
                .get(self.url("/api/items"))
                .query(&query)
                .send()
                .await?;
            let body = check_status(response).await?.bytes().await?;
            decode_items_page(&body)
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(q = %params.q, page = params.page, "Items fetch cancelled");
                Err(ClientError::Cancelled)
            }
            result = request => result,
        }
    }

    /// Fetch a single item
    pub async fn fetch_item(&self, id: u64) -> Result<Item, ClientError> {
        let response = self
            .http
            .get(self.url(&format!("/api/items/{id}")))
            .send()
            .await?;
        decode(response).await
    }

    /// Create an item; returns it with its server-assigned id
    pub async fn create_item(&self, item: &NewItem) -> Result<Item, ClientError> {
        let response = self
            .http
            .post(self.url("/api/items"))
            .json(item)
            .send()
            .await?;
        decode(response).await
    }

    /// Fetch aggregate stats
    pub async fn fetch_stats(&self) -> Result<Stats, ClientError> {
        let response = self.http.get(self.url("/api/stats")).send().await?;
        decode(response).await
    }
}

impl ItemsSource for ApiClient {
    async fn fetch_items(
        &self,
        params: FetchParams,
        cancel: CancellationToken,
    ) -> Result<ItemsPage, ClientError> {
        ApiClient::fetch_items(self, &params, &cancel).await
    }
}

/// Turn a non-2xx response into [`ClientError::Http`], using the API's `error` field when present
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or(body);

    Err(ClientError::Http {
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let body = check_status(response).await?.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}
