//! Search API routes

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use super::state::{GuardedCatalogStore, ServerState};
use crate::catalog_store::SearchHit;

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
}

async fn search(
    State(catalog_store): State<GuardedCatalogStore>,
    Query(params): Query<SearchParams>,
) -> Json<Vec<SearchHit>> {
    Json(catalog_store.search(&params.q))
}

pub fn make_search_routes(state: ServerState) -> Router {
    Router::new()
        .route("/search", get(search))
        .with_state(state)
}
