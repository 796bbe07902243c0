//! Web router using Axum

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use catalog_core::{query, CoreError, Item, ItemsPage, NewItem, QueryParams, Stats};
use serde::Deserialize;
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

use crate::error::ApiError;
use crate::state::AppState;

/// Create the web router
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/items", get(list_items_handler).post(create_item_handler))
        .route("/api/items/{id}", get(get_item_handler))
        .route("/api/stats", get(stats_handler))
        .route("/api/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Raw query string for `GET /api/items`; numbers are parsed leniently
#[derive(Debug, Default, Deserialize)]
struct ListQuery {
    q: Option<String>,
    page: Option<String>,
    limit: Option<String>,
}

async fn list_items_handler(
    State(state): State<AppState>,
    Query(raw): Query<ListQuery>,
) -> Result<Json<ItemsPage>, ApiError> {
    let params = QueryParams::from_raw(
        raw.q.as_deref(),
        raw.page.as_deref(),
        raw.limit.as_deref(),
    );

    let items = state.store.read_all().await?;
    let page = query(&items, &params);

    debug!(
        search = ?params.search,
        page = page.page,
        total_pages = page.total_pages,
        returned = page.items.len(),
        "Items queried"
    );

    Ok(Json(page))
}

async fn get_item_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Item>, ApiError> {
    // A non-numeric id can never match a stored item
    let id: u64 = id.parse().map_err(|_| CoreError::not_found(&id))?;
    let item = state.store.find(id).await?;
    Ok(Json(item))
}

async fn create_item_handler(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Item>), ApiError> {
    let Json(payload) = payload?;
    let new_item = NewItem::from_json(&payload)?;
    let item = state.store.create(new_item).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

async fn stats_handler(State(state): State<AppState>) -> Result<Json<Stats>, ApiError> {
    let stats = state.stats.get(&state.store).await?;
    Ok(Json(stats))
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.read_all().await {
        Ok(items) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "healthy",
                "items": items.len(),
            })),
        ),
        Err(e) => {
            error!(error = %e, source = ?std::error::Error::source(&e), "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({
                    "status": "degraded",
                    "error": "Item store unavailable",
                })),
            )
        }
    }
}
