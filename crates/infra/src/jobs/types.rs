//! Core job types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crm_core::CrmError;

use super::backend::CrmBackend;

/// Timestamp prefix of every job log record (`DD/MM/YYYY-HH:MM:SS`).
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y-%H:%M:%S";

/// Why a job run failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JobError {
    #[error("service unreachable: {0}")]
    TransportUnreachable(String),
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("service returned status {0}")]
    Status(u16),
    #[error("invalid response: {0}")]
    Decode(String),
    #[error(transparent)]
    Backend(#[from] CrmError),
    #[error("job panicked: {0}")]
    Panicked(String),
    #[error("failed to write job log: {0}")]
    LogWrite(String),
}

impl JobError {
    /// Timeouts and connection failures, as opposed to a reachable service
    /// answering badly.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, JobError::TransportUnreachable(_) | JobError::Timeout(_))
    }
}

/// What a run appends to its log: one headline plus optional detail lines.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JobRecord {
    pub headline: String,
    pub details: Vec<String>,
}

impl JobRecord {
    pub fn line(headline: impl Into<String>) -> Self {
        Self {
            headline: headline.into(),
            details: Vec::new(),
        }
    }

    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }

    /// Render as appended text: `"{timestamp} - {headline}\n"` followed by
    /// one indented line per detail.
    pub fn render(&self, timestamp: &str) -> String {
        let mut out = format!("{timestamp} - {}\n", self.headline);
        for d in &self.details {
            out.push_str("  ");
            out.push_str(d);
            out.push('\n');
        }
        out
    }
}

/// A fixed, named unit of work run by the scheduler.
pub trait ScheduledJob: Send + Sync {
    fn name(&self) -> &'static str;

    /// Log file name, relative to the sink's location.
    fn log_file(&self) -> &'static str;

    fn run(&self, backend: &dyn CrmBackend) -> Result<JobRecord, JobError>;

    /// Record appended when `run` fails (or panics).
    fn failure_record(&self, error: &JobError) -> JobRecord {
        JobRecord::line(format!("Error: {error}"))
    }
}

/// State of one job run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum JobRunState {
    Scheduled,
    Running,
    Succeeded,
    /// Terminal for this run only; the job stays scheduled.
    Failed { error: String },
}

impl JobRunState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobRunState::Succeeded | JobRunState::Failed { .. })
    }
}

/// One execution of a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRun {
    pub job: String,
    pub state: JobRunState,
    pub scheduled_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub duration_ms: Option<u64>,
}

impl JobRun {
    pub fn scheduled(job: impl Into<String>) -> Self {
        Self {
            job: job.into(),
            state: JobRunState::Scheduled,
            scheduled_at: Utc::now(),
            started_at: None,
            finished_at: None,
            duration_ms: None,
        }
    }

    /// Mark run as running.
    pub fn mark_running(&mut self) {
        self.state = JobRunState::Running;
        self.started_at = Some(Utc::now());
    }

    /// Mark run as succeeded.
    pub fn mark_succeeded(&mut self) {
        self.finish(JobRunState::Succeeded);
    }

    /// Mark run as failed.
    pub fn mark_failed(&mut self, error: impl Into<String>) {
        self.finish(JobRunState::Failed {
            error: error.into(),
        });
    }

    pub fn succeeded(&self) -> bool {
        self.state == JobRunState::Succeeded
    }

    fn finish(&mut self, state: JobRunState) {
        let now = Utc::now();
        let started = self.started_at.unwrap_or(now);
        self.state = state;
        self.finished_at = Some(now);
        self.duration_ms = Some((now - started).num_milliseconds().max(0) as u64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_renders_headline_and_indented_details() {
        let record = JobRecord::line("Restocked 2 low-stock products").with_details(vec![
            "Tablet (Stock: 15)".to_string(),
            "Pen (Stock: 12)".to_string(),
        ]);
        assert_eq!(
            record.render("01/02/2025-10:00:00"),
            "01/02/2025-10:00:00 - Restocked 2 low-stock products\n  Tablet (Stock: 15)\n  Pen (Stock: 12)\n"
        );
    }

    #[test]
    fn run_lifecycle() {
        let mut run = JobRun::scheduled("heartbeat");
        assert_eq!(run.state, JobRunState::Scheduled);
        assert!(!run.state.is_terminal());

        run.mark_running();
        assert_eq!(run.state, JobRunState::Running);
        assert!(run.started_at.is_some());

        run.mark_failed("boom");
        assert!(run.state.is_terminal());
        assert!(!run.succeeded());
        assert!(run.duration_ms.is_some());
    }

    #[test]
    fn timeouts_count_as_unreachable() {
        assert!(JobError::Timeout("10s".to_string()).is_unreachable());
        assert!(!JobError::Status(500).is_unreachable());
    }

    #[test]
    fn run_state_is_tagged() {
        let json = serde_json::to_value(JobRunState::Failed {
            error: "timeout".to_string(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({ "state": "failed", "error": "timeout" }));
    }
}
