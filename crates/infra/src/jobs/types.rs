//! Upload job identity, counters and status snapshots.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::reconcile::{ReconcileError, Reconciled};

use super::source::SourceError;
use super::workbook::WorkbookError;

/// Unique upload job identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
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

impl FromStr for JobId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Per-job counters. Only ever incremented while the job runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    #[serde(rename = "created_sales")]
    pub created: u64,
    #[serde(rename = "updated_sales")]
    pub updated: u64,
    #[serde(rename = "deleted_sales")]
    pub deleted: u64,
    #[serde(rename = "query_errors")]
    pub decode_errors: u64,
    pub internal_errors: u64,
}

impl UploadResult {
    /// Fold one reconciliation outcome into the counters.
    pub fn record(&mut self, outcome: &Result<Reconciled, ReconcileError>) {
        match outcome {
            Ok(Reconciled::Created(rows)) => self.created += rows,
            Ok(Reconciled::Updated(rows)) => self.updated += rows,
            Ok(Reconciled::Deleted(rows)) => self.deleted += rows,
            Err(_) => self.internal_errors += 1,
        }
    }

    pub fn record_decode_error(&mut self) {
        self.decode_errors += 1;
    }
}

/// Why a job stopped before processing any rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobFailure {
    pub code: u16,
    pub message: String,
}

impl JobFailure {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Point-in-time view of a job.
///
/// `result` and `failure` are only ever set once `ready` is true, and never
/// both at once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadStatus {
    pub ready: bool,
    #[serde(
        rename = "upload_result",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub result: Option<UploadResult>,
    #[serde(rename = "error", default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<JobFailure>,
}

impl UploadStatus {
    /// What unknown and already finished jobs look like.
    pub fn not_found() -> Self {
        Self::default()
    }
}

/// Terminal job error.
#[derive(Debug, Error)]
pub enum JobError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Workbook(#[from] WorkbookError),

    #[error("upload job aborted")]
    Aborted,
}

impl JobError {
    /// HTTP-flavoured status code for the failure descriptor.
    pub fn code(&self) -> u16 {
        match self {
            JobError::Source(err) => err.code(),
            JobError::Workbook(_) | JobError::Aborted => 500,
        }
    }

    /// The descriptor stored on the job.
    pub fn failure(&self) -> JobFailure {
        let message = match self {
            JobError::Workbook(_) => WorkbookError::FAILURE_MESSAGE.to_string(),
            other => other.to_string(),
        };
        JobFailure::new(self.code(), message)
    }
}
