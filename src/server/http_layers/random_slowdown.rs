//! Delays every response by a random amount, to see how clients cope with a
//! slow server. Only compiled with the `slowdown` feature.

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use rand::Rng;
use std::time::Duration;

const MAX_DELAY_MS: u64 = 1500;

pub async fn slowdown_request(request: Request<Body>, next: Next) -> Response {
    let delay = rand::rng().random_range(0..=MAX_DELAY_MS);
    tokio::time::sleep(Duration::from_millis(delay)).await;
    next.run(request).await
}
