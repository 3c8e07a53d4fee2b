//! HTTP client for end-to-end tests
//!
//! Wraps reqwest with one method per server endpoint. When routes or query
//! parameters change, update only this file.

use super::constants::*;
use reqwest::Response;
use std::time::Duration;

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    async fn get(&self, path: &str) -> Response {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .expect("Request failed")
    }

    // ========================================================================
    // Status
    // ========================================================================

    pub async fn home(&self) -> Response {
        self.get("/").await
    }

    // ========================================================================
    // Search
    // ========================================================================

    pub async fn search(&self, query: &str) -> Response {
        self.client
            .get(format!("{}/v1/search", self.base_url))
            .query(&[("q", query)])
            .send()
            .await
            .expect("Search request failed")
    }

    // ========================================================================
    // Streaming
    // ========================================================================

    pub async fn stream(&self, artist_slug: &str, song_slug: &str) -> Response {
        self.get(&format!("/stream/{}/{}", artist_slug, song_slug))
            .await
    }

    pub async fn stream_range(&self, artist_slug: &str, song_slug: &str, range: &str) -> Response {
        self.client
            .get(format!(
                "{}/stream/{}/{}",
                self.base_url, artist_slug, song_slug
            ))
            .header(reqwest::header::RANGE, range)
            .send()
            .await
            .expect("Stream request failed")
    }

    // ========================================================================
    // Recommendations
    // ========================================================================

    pub async fn recommendations(&self, user: &str) -> Response {
        self.get(&format!("/v1/recommendations/{}", user)).await
    }

    pub async fn recommendations_with_count(&self, user: &str, count: usize) -> Response {
        self.get(&format!("/v1/recommendations/{}?count={}", user, count))
            .await
    }
}
