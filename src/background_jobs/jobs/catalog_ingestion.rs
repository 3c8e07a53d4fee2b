//! Periodic catalog ingestion.
//!
//! Runs once at startup and then every `interval_hours`, pulling songs for
//! every tracked artist into the catalog.

use crate::background_jobs::{
    context::JobContext,
    job::{BackgroundJob, HookEvent, JobError, JobSchedule},
};
use crate::ingestion::IngestionError;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_INTERVAL_HOURS: u64 = 3;

pub struct CatalogIngestionJob {
    interval_hours: u64,
}

impl CatalogIngestionJob {
    pub fn new(interval_hours: u64) -> Self {
        Self { interval_hours }
    }
}

impl Default for CatalogIngestionJob {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL_HOURS)
    }
}

impl BackgroundJob for CatalogIngestionJob {
    fn id(&self) -> &'static str {
        "catalog_ingestion"
    }

    fn description(&self) -> &'static str {
        "Fetch songs of tracked artists into the catalog"
    }

    fn schedule(&self) -> JobSchedule {
        JobSchedule::Combined {
            interval: Some(Duration::from_secs(self.interval_hours * 60 * 60)),
            hooks: vec![HookEvent::OnStartup],
        }
    }

    fn execute(&self, ctx: &JobContext) -> Result<(), JobError> {
        let report = ctx
            .runtime
            .block_on(ctx.ingestion_manager.run_once(&ctx.cancellation_token))
            .map_err(|e| match e {
                IngestionError::Cancelled => JobError::Cancelled,
                other => JobError::ExecutionFailed(other.to_string()),
            })?;

        if let Ok(json) = serde_json::to_string(&report) {
            debug!("Ingestion report: {}", json);
        }
        Ok(())
    }
}
