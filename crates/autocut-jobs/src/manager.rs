//! Job manager: submission, status queries, output retrieval.

use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use autocut_models::{is_supported_container, Job, JobId, JobSnapshot, JobStatus, SubmitParams};

use crate::backend::MediaBackend;
use crate::config::JobConfig;
use crate::error::{JobError, JobResult};
use crate::pipeline::{self, PipelineContext};
use crate::registry::JobRegistry;

/// Owns the registry and spawns one pipeline task per accepted job.
///
/// Jobs are in-memory only; a restart forgets all of them. There is no
/// mid-job cancellation: an abandoned job runs to completion and its
/// output is reaped by the expiry timer.
pub struct JobManager {
    config: JobConfig,
    registry: JobRegistry,
    backend: Arc<dyn MediaBackend>,
}

impl JobManager {
    /// Create the manager and its working directories.
    pub async fn new(config: JobConfig, backend: Arc<dyn MediaBackend>) -> JobResult<Self> {
        tokio::fs::create_dir_all(&config.work_dir)
            .await
            .map_err(|e| JobError::Internal(format!("cannot create work dir: {e}")))?;
        tokio::fs::create_dir_all(&config.output_dir)
            .await
            .map_err(|e| JobError::Internal(format!("cannot create output dir: {e}")))?;

        Ok(Self {
            config,
            registry: JobRegistry::new(),
            backend,
        })
    }

    /// Validate a request and start processing it.
    ///
    /// All validation is synchronous; a failed submission never creates
    /// a job record. The returned id is live immediately.
    pub fn submit(&self, input_path: PathBuf, params: &SubmitParams) -> JobResult<JobId> {
        if !is_supported_container(&input_path) {
            let ext = input_path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| format!(".{e}"))
                .unwrap_or_else(|| "no extension".to_string());
            return Err(JobError::UnsupportedFormat(ext));
        }

        let policy = params.validate()?;

        let id = JobId::new();
        self.registry.insert(Job::new(id, input_path.clone()));
        info!(job_id = %id, mode = %params.mode, "Job accepted");

        let ctx = PipelineContext {
            id,
            input: input_path,
            policy,
            vad_level: params.vad_level,
            registry: self.registry.clone(),
            backend: Arc::clone(&self.backend),
            config: self.config.clone(),
        };
        tokio::spawn(pipeline::run(ctx));

        Ok(id)
    }

    /// Status snapshot for polling clients.
    ///
    /// Expired jobs report `NotFound`, same as unknown ids.
    pub fn get_status(&self, id: JobId) -> JobResult<JobSnapshot> {
        match self.registry.get(id) {
            Some(job) if job.expired => Err(JobError::NotFound),
            Some(job) => Ok(job.snapshot()),
            None => Err(JobError::NotFound),
        }
    }

    /// Path of a finished output, while it is still retained.
    pub fn get_output_path(&self, id: JobId) -> JobResult<PathBuf> {
        let job = self.registry.get(id).ok_or(JobError::NotFound)?;
        if job.expired {
            return Err(JobError::Expired);
        }
        match (job.status, job.output_path) {
            (JobStatus::Done, Some(path)) => Ok(path),
            _ => Err(JobError::NotReady),
        }
    }

    /// The configured retention window.
    pub fn retention(&self) -> std::time::Duration {
        self.config.retention
    }

    /// Number of tracked jobs, including terminal ones.
    pub fn job_count(&self) -> usize {
        self.registry.len()
    }
}
