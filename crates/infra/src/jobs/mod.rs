//! Scheduled background jobs.
//!
//! ## Design
//!
//! - A fixed set of jobs (heartbeat, restock, order reminders, report), each
//!   on its own interval and thread
//! - Jobs talk to a [`CrmBackend`]: the services in-process, or the HTTP API
//!   when the service runs elsewhere
//! - Every run appends exactly one record to the job's own log through a
//!   [`JobLogSink`] owned by the scheduler
//! - Failures and panics end the run, never the scheduler
//!
//! ## Components
//!
//! - `types`: run lifecycle, log records and errors
//! - `backend`: in-process and HTTP backends
//! - `sink`: file and in-memory log sinks
//! - `crm_jobs`: the four jobs
//! - `scheduler`: periodic runner with shutdown handle and statistics

pub mod backend;
pub mod crm_jobs;
pub mod scheduler;
pub mod sink;
pub mod types;

pub use backend::{CrmBackend, HttpBackend, InProcessBackend};
pub use crm_jobs::{GenerateReport, Heartbeat, OrderReminders, RestockLowStock};
pub use scheduler::{JobScheduler, JobSchedulerHandle, JobStats, SchedulerConfig};
pub use sink::{FileJobLog, JobLogSink, MemoryJobLog};
pub use types::{JobError, JobRecord, JobRun, JobRunState, ScheduledJob, TIMESTAMP_FORMAT};
