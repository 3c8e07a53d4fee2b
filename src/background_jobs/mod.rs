//! Background job scheduling and execution.
//!
//! Jobs run on tokio's blocking pool, triggered by hooks (startup) or on a
//! fixed interval, and observe a cancellation token at shutdown.

mod context;
mod job;
pub mod jobs;
mod scheduler;

pub use context::JobContext;
pub use job::{BackgroundJob, HookEvent, JobError, JobSchedule};
pub use scheduler::JobScheduler;
