use axum::extract::FromRef;

use crate::catalog_store::CatalogStore;
use crate::recommendation::RecommendationEngine;
use crate::streaming::StreamProxy;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedCatalogStore = Arc<CatalogStore>;
pub type GuardedStreamProxy = Arc<StreamProxy>;
pub type GuardedRecommendationEngine = Arc<RecommendationEngine>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub catalog_store: GuardedCatalogStore,
    pub stream_proxy: GuardedStreamProxy,
    pub recommendation_engine: GuardedRecommendationEngine,
    pub hash: String,
}

impl ServerState {
    pub fn new(
        config: ServerConfig,
        catalog_store: GuardedCatalogStore,
        stream_proxy: GuardedStreamProxy,
        recommendation_engine: GuardedRecommendationEngine,
    ) -> Self {
        Self {
            config,
            start_time: Instant::now(),
            catalog_store,
            stream_proxy,
            recommendation_engine,
            hash: env!("GIT_HASH").to_string(),
        }
    }
}

impl FromRef<ServerState> for GuardedCatalogStore {
    fn from_ref(input: &ServerState) -> Self {
        input.catalog_store.clone()
    }
}

impl FromRef<ServerState> for GuardedStreamProxy {
    fn from_ref(input: &ServerState) -> Self {
        input.stream_proxy.clone()
    }
}

impl FromRef<ServerState> for GuardedRecommendationEngine {
    fn from_ref(input: &ServerState) -> Self {
        input.recommendation_engine.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
