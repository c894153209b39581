//! Job records and the job state machine.
//!
//! Transitions are one-directional and terminal states are sticky:
//! once a job is `Done` or `Error`, only expiry bookkeeping changes.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque unique job identifier, generated at submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(Uuid);

impl JobId {
    /// Generate a fresh id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Job processing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Accepted, pipeline not yet started.
    #[default]
    Queued,
    /// Pipeline is running.
    Running,
    /// Completed successfully, output available.
    Done,
    /// Failed; `error` carries the reason.
    Error,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Running => "running",
            JobStatus::Done => "done",
            JobStatus::Error => "error",
        }
    }

    /// Whether no further state transition is possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Done | JobStatus::Error)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One in-flight or completed processing request.
///
/// Owned exclusively by the job registry; pipeline stages report back
/// through callbacks, never by holding a reference to this record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub status: JobStatus,
    /// Percent 0-100, monotonically non-decreasing while running.
    pub progress: u8,
    /// Latest human-readable stage description.
    pub message: String,
    pub input_path: PathBuf,
    /// Set only when status is `Done` and the output still exists.
    pub output_path: Option<PathBuf>,
    /// Set only when status is `Error`.
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    /// The retention window has elapsed and the output was purged.
    pub expired: bool,
}

impl Job {
    /// Create a freshly queued job.
    pub fn new(id: JobId, input_path: PathBuf) -> Self {
        Self {
            id,
            status: JobStatus::Queued,
            progress: 0,
            message: "queued".to_string(),
            input_path,
            output_path: None,
            error: None,
            created_at: Utc::now(),
            completed_at: None,
            expired: false,
        }
    }

    /// Transition `Queued -> Running`.
    pub fn start(&mut self) {
        if self.status == JobStatus::Queued {
            self.status = JobStatus::Running;
            self.message = "processing started".to_string();
        }
    }

    /// Record a progress update. Progress never decreases and terminal
    /// states are not touched.
    pub fn set_progress(&mut self, progress: u8, message: impl Into<String>) {
        if self.status.is_terminal() {
            return;
        }
        self.progress = self.progress.max(progress.min(100));
        self.message = message.into();
    }

    /// Transition to `Done` with the final output path.
    pub fn complete(&mut self, output_path: PathBuf) {
        if self.status.is_terminal() {
            return;
        }
        self.status = JobStatus::Done;
        self.progress = 100;
        self.message = "complete".to_string();
        self.output_path = Some(output_path);
        self.completed_at = Some(Utc::now());
    }

    /// Transition to `Error` with a user-visible reason.
    pub fn fail(&mut self, error: impl Into<String>) {
        if self.status.is_terminal() {
            return;
        }
        self.status = JobStatus::Error;
        self.error = Some(error.into());
        self.message = "processing failed".to_string();
        self.completed_at = Some(Utc::now());
    }

    /// Mark the output as purged after the retention window.
    pub fn expire(&mut self) {
        if self.status == JobStatus::Done {
            self.expired = true;
            self.output_path = None;
        }
    }

    /// Snapshot for status queries.
    pub fn snapshot(&self) -> JobSnapshot {
        JobSnapshot {
            status: self.status,
            progress: self.progress,
            message: self.message.clone(),
            error: self.error.clone(),
        }
    }
}

/// Point-in-time view served to polling clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSnapshot {
    pub status: JobStatus,
    pub progress: u8,
    pub message: String,
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_job() -> Job {
        Job::new(JobId::new(), PathBuf::from("input.mp4"))
    }

    #[test]
    fn test_new_job_is_queued() {
        let job = make_job();
        assert_eq!(job.status, JobStatus::Queued);
        assert_eq!(job.progress, 0);
        assert!(!job.status.is_terminal());
    }

    #[test]
    fn test_lifecycle_transitions() {
        let mut job = make_job();
        job.start();
        assert_eq!(job.status, JobStatus::Running);

        job.set_progress(40, "extracting");
        assert_eq!(job.progress, 40);

        job.complete(PathBuf::from("out.mp4"));
        assert_eq!(job.status, JobStatus::Done);
        assert_eq!(job.progress, 100);
        assert!(job.completed_at.is_some());
        assert!(job.status.is_terminal());
    }

    #[test]
    fn test_progress_is_monotone() {
        let mut job = make_job();
        job.start();
        job.set_progress(50, "halfway");
        job.set_progress(30, "stale update");
        assert_eq!(job.progress, 50);
    }

    #[test]
    fn test_terminal_states_are_sticky() {
        let mut job = make_job();
        job.start();
        job.fail("decode failed");
        assert_eq!(job.status, JobStatus::Error);

        job.set_progress(90, "late update");
        job.complete(PathBuf::from("out.mp4"));
        assert_eq!(job.status, JobStatus::Error);
        assert_eq!(job.output_path, None);
    }

    #[test]
    fn test_expire_clears_output() {
        let mut job = make_job();
        job.start();
        job.complete(PathBuf::from("out.mp4"));
        job.expire();
        assert!(job.expired);
        assert_eq!(job.output_path, None);
        assert_eq!(job.status, JobStatus::Done);
    }

    #[test]
    fn test_expire_ignores_errored_jobs() {
        let mut job = make_job();
        job.start();
        job.fail("boom");
        job.expire();
        assert!(!job.expired);
    }
}
