use crate::ingestion::IngestionManager;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

/// Context provided to jobs during execution.
#[derive(Clone)]
pub struct JobContext {
    /// Token to check for cancellation/shutdown requests.
    pub cancellation_token: CancellationToken,

    /// Runtime the scheduler lives on. Jobs run on the blocking pool and use
    /// it to drive async work to completion.
    pub runtime: Handle,

    pub ingestion_manager: Arc<IngestionManager>,
}

impl JobContext {
    pub fn new(
        cancellation_token: CancellationToken,
        runtime: Handle,
        ingestion_manager: Arc<IngestionManager>,
    ) -> Self {
        Self {
            cancellation_token,
            runtime,
            ingestion_manager,
        }
    }

    /// Same context with a different token, used to give each run its own.
    pub fn with_token(&self, cancellation_token: CancellationToken) -> Self {
        Self {
            cancellation_token,
            runtime: self.runtime.clone(),
            ingestion_manager: Arc::clone(&self.ingestion_manager),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation_token.is_cancelled()
    }
}
