//! Upload job engine.
//!
//! `start` registers a job and hands the work to its own tokio task; the
//! caller gets the id back immediately. The task fetches the workbook, parses
//! it on the blocking pool and reconciles rows one by one in source order.
//! Row errors are counted and never stop the job.

use std::sync::Arc;

use tracing::{Instrument, debug, error, info, info_span, warn};

use salesync_core::SellerId;
use salesync_sales::ReconciliationInstruction;

use crate::reconcile::Reconciler;
use crate::store::SaleStore;

use super::source::SourceFetcher;
use super::table::{JobHandle, JobTable};
use super::types::{JobError, JobId, UploadStatus};
use super::workbook::parse_workbook;

/// Starts, reports on and finishes upload jobs.
pub struct UploadEngine<S, F> {
    reconciler: Arc<Reconciler<S>>,
    fetcher: Arc<F>,
    jobs: Arc<JobTable>,
}

impl<S, F> Clone for UploadEngine<S, F> {
    fn clone(&self) -> Self {
        Self {
            reconciler: self.reconciler.clone(),
            fetcher: self.fetcher.clone(),
            jobs: self.jobs.clone(),
        }
    }
}

impl<S, F> UploadEngine<S, F>
where
    S: SaleStore + 'static,
    F: SourceFetcher + 'static,
{
    pub fn new(store: S, fetcher: F) -> Self {
        Self {
            reconciler: Arc::new(Reconciler::new(store)),
            fetcher: Arc::new(fetcher),
            jobs: Arc::new(JobTable::new()),
        }
    }

    /// The store jobs reconcile into.
    pub fn store(&self) -> &S {
        self.reconciler.store()
    }

    pub fn jobs(&self) -> &JobTable {
        &self.jobs
    }

    /// Register a job for `locator` and run it in the background.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn start(&self, locator: impl Into<String>, seller_id: SellerId) -> JobId {
        let locator = locator.into();
        let (job_id, handle) = self.jobs.register().await;

        info!(%job_id, %seller_id, source = %locator, "upload job started");

        let span = info_span!("upload_job", %job_id, %seller_id);
        let work = tokio::spawn(
            run_job(
                self.reconciler.clone(),
                self.fetcher.clone(),
                handle.clone(),
                locator,
                seller_id,
            )
            .instrument(span.clone()),
        );

        // Supervisor: whatever happens to the worker, the job ends up ready.
        tokio::spawn(
            async move {
                let outcome = match work.await {
                    Ok(outcome) => outcome,
                    Err(join_error) => {
                        error!(error = %join_error, "upload job task aborted");
                        Err(JobError::Aborted)
                    }
                };

                match outcome {
                    Ok(()) => {
                        handle.complete().await;
                        if let UploadStatus {
                            result: Some(result),
                            ..
                        } = handle.snapshot().await
                        {
                            info!(
                                created = result.created,
                                updated = result.updated,
                                deleted = result.deleted,
                                decode_errors = result.decode_errors,
                                internal_errors = result.internal_errors,
                                "upload job finished"
                            );
                        }
                    }
                    Err(err) => {
                        warn!(error = %err, "upload job failed");
                        handle.fail(err.failure()).await;
                    }
                }
            }
            .instrument(span),
        );

        job_id
    }

    /// Snapshot of a job. Unknown and finished jobs report not-found.
    pub async fn status(&self, job_id: &JobId) -> UploadStatus {
        match self.jobs.get(job_id).await {
            Some(handle) => handle.snapshot().await,
            None => UploadStatus::not_found(),
        }
    }

    /// Snapshot of a job, removing it from the table if it is ready.
    ///
    /// Of any number of concurrent callers, exactly one sees the ready status.
    pub async fn take_status(&self, job_id: &JobId) -> UploadStatus {
        let status = self.jobs.take_if_ready(job_id).await;
        if status.ready {
            debug!(%job_id, "upload job delivered and removed");
        }
        status
    }

    /// Forget a job. Finishing an unknown job is a no-op.
    pub async fn finish(&self, job_id: &JobId) {
        if self.jobs.remove(job_id).await {
            debug!(%job_id, "upload job removed");
        }
    }
}

async fn run_job<S, F>(
    reconciler: Arc<Reconciler<S>>,
    fetcher: Arc<F>,
    handle: JobHandle,
    locator: String,
    seller_id: SellerId,
) -> Result<(), JobError>
where
    S: SaleStore,
    F: SourceFetcher,
{
    let bytes = fetcher.fetch(&locator).await?;
    debug!(bytes = bytes.len(), "source fetched");

    let workbook = tokio::task::spawn_blocking(move || parse_workbook(bytes))
        .await
        .map_err(|join_error| {
            error!(error = %join_error, "workbook parser aborted");
            JobError::Aborted
        })??;
    debug!(
        sheets = workbook.sheets.len(),
        rows = workbook.row_count(),
        "workbook parsed"
    );

    for sheet in &workbook.sheets {
        for row in &sheet.rows {
            match ReconciliationInstruction::from_row(&row.cells, seller_id) {
                Err(err) => {
                    debug!(sheet = %sheet.name, row = row.number, error = %err, "row skipped");
                    handle.record_decode_error().await;
                }
                Ok(instruction) => {
                    let outcome = reconciler.apply(&instruction).await;
                    if let Err(err) = &outcome {
                        warn!(
                            sheet = %sheet.name,
                            row = row.number,
                            error = %err,
                            "row not reconciled"
                        );
                    }
                    handle.record(&outcome).await;
                }
            }
        }
    }

    Ok(())
}
