//! In-memory job table.
//!
//! The table lock is held to look up, insert or remove an entry, and across a
//! single job snapshot in `take_if_ready`. Each job carries its own lock, so
//! status reads on one job never wait on another job's row processing.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::reconcile::{ReconcileError, Reconciled};

use super::types::{JobFailure, JobId, UploadResult, UploadStatus};

#[derive(Debug, Default)]
struct JobState {
    ready: bool,
    result: UploadResult,
    failure: Option<JobFailure>,
}

/// Shared handle to one job's state.
///
/// The background task is the only writer. Every update happens under the
/// job's write lock, so readers see either the previous or the new state.
#[derive(Debug, Clone, Default)]
pub struct JobHandle {
    state: Arc<RwLock<JobState>>,
}

impl JobHandle {
    pub async fn snapshot(&self) -> UploadStatus {
        let state = self.state.read().await;
        if !state.ready {
            return UploadStatus::not_found();
        }
        match &state.failure {
            Some(failure) => UploadStatus {
                ready: true,
                result: None,
                failure: Some(failure.clone()),
            },
            None => UploadStatus {
                ready: true,
                result: Some(state.result),
                failure: None,
            },
        }
    }

    pub async fn record(&self, outcome: &Result<Reconciled, ReconcileError>) {
        self.state.write().await.result.record(outcome);
    }

    pub async fn record_decode_error(&self) {
        self.state.write().await.result.record_decode_error();
    }

    /// Mark the job done. Returns false if it already was.
    pub async fn complete(&self) -> bool {
        let mut state = self.state.write().await;
        if state.ready {
            return false;
        }
        state.ready = true;
        true
    }

    /// Mark the job done with a failure. Returns false if it already was done.
    pub async fn fail(&self, failure: JobFailure) -> bool {
        let mut state = self.state.write().await;
        if state.ready {
            return false;
        }
        state.failure = Some(failure);
        state.ready = true;
        true
    }
}

/// Registry of jobs that have been started and not yet finished.
///
/// No eviction: an unfinished job stays until someone finishes it.
#[derive(Debug, Default)]
pub struct JobTable {
    jobs: RwLock<HashMap<JobId, JobHandle>>,
}

impl JobTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fresh pending job under a new id.
    pub async fn register(&self) -> (JobId, JobHandle) {
        let mut jobs = self.jobs.write().await;
        let mut id = JobId::new();
        while jobs.contains_key(&id) {
            id = JobId::new();
        }
        let handle = JobHandle::default();
        jobs.insert(id, handle.clone());
        (id, handle)
    }

    pub async fn get(&self, id: &JobId) -> Option<JobHandle> {
        self.jobs.read().await.get(id).cloned()
    }

    /// Snapshot a job and remove it if it is ready, as one step.
    ///
    /// The table write lock is held across the snapshot, so a ready job is
    /// handed out exactly once. Pending and unknown jobs report not-found.
    pub async fn take_if_ready(&self, id: &JobId) -> UploadStatus {
        let mut jobs = self.jobs.write().await;
        let Some(handle) = jobs.get(id) else {
            return UploadStatus::not_found();
        };
        let status = handle.snapshot().await;
        if status.ready {
            jobs.remove(id);
        }
        status
    }

    /// Remove a job. Returns whether it was present.
    pub async fn remove(&self, id: &JobId) -> bool {
        self.jobs.write().await.remove(id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
