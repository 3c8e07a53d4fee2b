//! Test server lifecycle management
//!
//! Each test gets an isolated server with its own data directory, a scripted
//! provider and a local media host.

use super::constants::*;
use super::fixtures::{seed_data_dir, spawn_media_host, FakeProvider, MediaHost};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use streamcat_server::artists::TrackedArtists;
use streamcat_server::config::DataPaths;
use streamcat_server::ingestion::IngestionReport;
use streamcat_server::recommendation::{RecommendationEngine, RecommendationSources};
use streamcat_server::server::{make_app, RequestsLoggingLevel, ServerConfig, ServerState};
use streamcat_server::{CatalogStore, IngestionManager, StreamProxy};
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

/// Test server instance with an isolated data directory
///
/// When dropped, the server shuts down and the data directory is removed.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    pub provider: Arc<FakeProvider>,
    pub media_host: MediaHost,
    pub catalog_store: Arc<CatalogStore>,
    pub ingestion_manager: Arc<IngestionManager>,
    pub paths: DataPaths,

    data_dir: TempDir,
    shutdown: CancellationToken,
}

impl TestServer {
    /// Spawns a server whose catalog has been filled by one ingestion run.
    pub async fn spawn() -> Self {
        let server = Self::spawn_empty().await;
        let report = server.ingest().await;
        assert_eq!(report.songs_added(), SEEDED_SONGS);
        server
    }

    /// Spawns a server with seeded data files but no catalog yet.
    pub async fn spawn_empty() -> Self {
        let data_dir = TempDir::new().expect("Failed to create data dir");
        let paths = seed_data_dir(data_dir.path()).expect("Failed to seed data dir");

        let media_host = spawn_media_host().await;
        let provider = Arc::new(FakeProvider::new(media_host.base_url.clone()));

        let catalog_store = Arc::new(CatalogStore::open(paths.catalog_file.clone()));
        let ingestion_manager = Arc::new(IngestionManager::new(
            provider.clone(),
            catalog_store.clone(),
            TrackedArtists::new(paths.artists_file.clone()),
        ));
        let stream_proxy = Arc::new(
            StreamProxy::new(catalog_store.clone(), provider.clone(), 5)
                .expect("Failed to build stream proxy"),
        );
        let recommendation_engine = Arc::new(RecommendationEngine::new(
            RecommendationSources::new(
                paths.users_dir.clone(),
                paths.popular_file.clone(),
                paths.chart_file.clone(),
            ),
            20,
        ));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();
        let base_url = format!("http://127.0.0.1:{}", port);

        let config = ServerConfig {
            requests_logging_level: RequestsLoggingLevel::None,
            port,
            frontend_dir_path: None,
        };
        let state = ServerState::new(
            config,
            catalog_store.clone(),
            stream_proxy,
            recommendation_engine,
        );
        let app = make_app(state);

        let shutdown = CancellationToken::new();
        let server_shutdown = shutdown.clone();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move { server_shutdown.cancelled().await })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            provider,
            media_host,
            catalog_store,
            ingestion_manager,
            paths,
            data_dir,
            shutdown,
        };
        server.wait_for_ready().await;
        server
    }

    pub fn data_dir(&self) -> &Path {
        self.data_dir.path()
    }

    /// Runs one ingestion pass, the same the scheduled job runs.
    pub async fn ingest(&self) -> IngestionReport {
        self.ingestion_manager
            .run_once(&CancellationToken::new())
            .await
            .expect("Ingestion run failed")
    }

    /// Waits for the server to become ready by polling the status endpoint
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => return,
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
