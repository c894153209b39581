//! In-memory job registry.
//!
//! Shared between the manager and the pipeline tasks; every mutation
//! goes through `update` so a status read never observes a half-applied
//! transition. Records survive output expiry so `get_output_path` can
//! distinguish "expired" from "never existed".

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use autocut_models::{Job, JobId};

#[derive(Debug, Clone, Default)]
pub struct JobRegistry {
    jobs: Arc<RwLock<HashMap<JobId, Job>>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a freshly created job.
    pub fn insert(&self, job: Job) {
        let mut jobs = self.jobs.write().unwrap_or_else(PoisonError::into_inner);
        jobs.insert(job.id, job);
    }

    /// Apply a mutation to one job, if it exists.
    pub fn update<F>(&self, id: JobId, f: F)
    where
        F: FnOnce(&mut Job),
    {
        let mut jobs = self.jobs.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(job) = jobs.get_mut(&id) {
            f(job);
        }
    }

    /// Clone one job record, if it exists.
    pub fn get(&self, id: JobId) -> Option<Job> {
        let jobs = self.jobs.read().unwrap_or_else(PoisonError::into_inner);
        jobs.get(&id).cloned()
    }

    /// Number of tracked jobs.
    pub fn len(&self) -> usize {
        let jobs = self.jobs.read().unwrap_or_else(PoisonError::into_inner);
        jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
