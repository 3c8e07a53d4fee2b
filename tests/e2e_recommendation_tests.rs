//! End-to-end tests for recommendations
//!
//! The listener has played SONG_1 and liked SONG_3; both pools are seeded
//! with overlapping entries so exclusion and de-duplication show up.

mod common;

use common::*;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::collections::HashSet;

async fn recommended_ids(response: reqwest::Response) -> Vec<String> {
    assert_eq!(response.status(), StatusCode::OK);
    let songs: Vec<Value> = response.json().await.unwrap();
    songs
        .iter()
        .map(|s| s["id"].as_str().unwrap().to_string())
        .collect()
}

fn as_set(ids: &[String]) -> HashSet<&str> {
    ids.iter().map(String::as_str).collect()
}

#[tokio::test]
async fn test_excludes_played_and_liked_songs() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let ids = recommended_ids(client.recommendations(LISTENER_USER).await).await;

    assert_eq!(ids.len(), 4);
    assert_eq!(
        as_set(&ids),
        HashSet::from([
            "other/popular_one",
            "other/popular_two",
            "other/chart_one",
            SONG_2_ID,
        ])
    );
}

#[tokio::test]
async fn test_new_user_gets_each_pool_song_once() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let ids = recommended_ids(client.recommendations(NEW_USER).await).await;

    assert_eq!(ids.len(), 6, "duplicate across pools must appear once");
    assert_eq!(as_set(&ids).len(), 6);
}

#[tokio::test]
async fn test_count_limits_results() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let ids = recommended_ids(client.recommendations_with_count(NEW_USER, 2).await).await;
    assert_eq!(ids.len(), 2);
    assert_ne!(ids[0], ids[1]);

    let ids = recommended_ids(client.recommendations_with_count(NEW_USER, 0).await).await;
    assert!(ids.is_empty());
}

#[tokio::test]
async fn test_pool_fields_are_passed_through() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.recommendations(LISTENER_USER).await;
    let songs: Vec<Value> = response.json().await.unwrap();
    let chart_one = songs
        .iter()
        .find(|s| s["id"] == "other/chart_one")
        .expect("chart entry missing");
    assert_eq!(chart_one["cover"], "https://img.example/chart_one");
}

#[tokio::test]
async fn test_missing_pools_give_empty_list() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());
    std::fs::remove_file(&server.paths.popular_file).unwrap();
    std::fs::remove_file(&server.paths.chart_file).unwrap();

    let ids = recommended_ids(client.recommendations(LISTENER_USER).await).await;
    assert!(ids.is_empty());
}

#[tokio::test]
async fn test_pools_are_reread_on_every_request() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());
    std::fs::write(
        &server.paths.chart_file,
        json!({ "songs": [{ "id": "fresh/entry", "title": "Fresh", "artist": "New" }] })
            .to_string(),
    )
    .unwrap();

    let ids = recommended_ids(client.recommendations(LISTENER_USER).await).await;
    assert!(ids.contains(&"fresh/entry".to_string()));
    assert!(!ids.contains(&"other/chart_one".to_string()));
}

#[tokio::test]
async fn test_corrupt_activity_counts_as_none() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());
    let history = server
        .paths
        .users_dir
        .join(LISTENER_USER)
        .join(format!("{}.json", LISTENER_USER));
    std::fs::write(history, "{ not json").unwrap();

    let ids = recommended_ids(client.recommendations(LISTENER_USER).await).await;
    assert!(ids.contains(&SONG_1_ID.to_string()));
    assert!(!ids.contains(&SONG_3_ID.to_string()));
}

#[tokio::test]
async fn test_path_like_user_names_are_rejected() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.recommendations("a%5Cb").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client.recommendations("bad%00name").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
