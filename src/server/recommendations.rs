use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::{debug, error};

use super::state::{GuardedRecommendationEngine, ServerState};

/// Upper bound for `count`, pools are small and this keeps responses sane.
const MAX_COUNT: usize = 200;

#[derive(Deserialize)]
struct RecommendationParams {
    count: Option<usize>,
}

async fn get_recommendations(
    State(engine): State<GuardedRecommendationEngine>,
    Path(user): Path<String>,
    Query(params): Query<RecommendationParams>,
) -> Response {
    let count = params.count.map(|c| c.min(MAX_COUNT));
    // Activity and pool documents are read from disk on every request.
    let outcome =
        tokio::task::spawn_blocking(move || engine.recommend_for(&user, count)).await;
    match outcome {
        Ok(Ok(songs)) => Json(songs).into_response(),
        Ok(Err(err)) => {
            debug!("Rejected recommendation request: {}", err);
            StatusCode::BAD_REQUEST.into_response()
        }
        Err(err) => {
            error!("Recommendation task failed: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub fn make_recommendation_routes(state: ServerState) -> Router {
    Router::new()
        .route("/recommendations/{user}", get(get_recommendations))
        .with_state(state)
}
