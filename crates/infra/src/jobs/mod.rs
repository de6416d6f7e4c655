//! Asynchronous spreadsheet upload jobs.
//!
//! ## Components
//!
//! - `UploadEngine`: starts jobs, serves status snapshots, finishes jobs
//! - `JobTable`: in-memory registry of unfinished jobs
//! - `SourceFetcher`: fetches the workbook bytes (HTTP in production)
//! - `parse_workbook`: bytes to sheets of cells

pub mod engine;
pub mod source;
pub mod table;
pub mod types;
pub mod workbook;

pub use engine::UploadEngine;
pub use source::{HttpSourceFetcher, SourceError, SourceFetcher};
pub use table::{JobHandle, JobTable};
pub use types::{JobError, JobFailure, JobId, UploadResult, UploadStatus};
pub use workbook::{Sheet, SheetRow, Workbook, WorkbookError, parse_workbook};
