//! Audio streaming endpoint

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use super::metrics;
use super::state::GuardedStreamProxy;
use crate::streaming::StreamError;

pub async fn stream_song(
    State(stream_proxy): State<GuardedStreamProxy>,
    Path((artist, song)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    let range = headers.get(header::RANGE).and_then(|v| v.to_str().ok());

    let upstream = match stream_proxy.open_stream(&artist, &song, range).await {
        Ok(upstream) => upstream,
        Err(err @ StreamError::NotFound { .. }) => {
            debug!("{}", err);
            metrics::record_stream_request("not_found");
            return StatusCode::NOT_FOUND.into_response();
        }
        Err(err @ StreamError::Unavailable { .. }) => {
            warn!("{}", err);
            metrics::record_stream_request("unavailable");
            return StatusCode::NOT_FOUND.into_response();
        }
    };
    metrics::record_stream_request("ok");
    debug!("Streaming {}/{}", artist, song);

    let status = StatusCode::from_u16(upstream.status).unwrap_or(StatusCode::OK);
    let mut response = Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, upstream.content_type);
    if let Some(length) = upstream.content_length {
        response = response.header(header::CONTENT_LENGTH, length);
    }
    if let Some(range) = upstream.content_range {
        response = response.header(header::CONTENT_RANGE, range);
    }
    if let Some(accept_ranges) = upstream.accept_ranges {
        response = response.header(header::ACCEPT_RANGES, accept_ranges);
    }

    match response.body(Body::from_stream(upstream.body)) {
        Ok(response) => response,
        Err(err) => {
            warn!("Could not build stream response for {}/{}: {}", artist, song, err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
