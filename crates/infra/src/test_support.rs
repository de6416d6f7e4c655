//! Shared test fixtures.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rust_xlsxwriter::Workbook;

use salesync_sales::Cell;

use crate::jobs::{JobId, SourceError, SourceFetcher, UploadEngine, UploadStatus};
use crate::store::SaleStore;

/// Build an xlsx file in memory, one worksheet per entry.
pub(crate) fn xlsx(sheets: &[(&str, Vec<Vec<Cell>>)]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    for (name, rows) in sheets {
        let sheet = workbook.add_worksheet();
        sheet.set_name(*name).unwrap();
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                let (r, c) = (r as u32, c as u16);
                match cell {
                    Cell::Empty => {}
                    Cell::Int(v) => {
                        sheet.write_number(r, c, *v as f64).unwrap();
                    }
                    Cell::Float(f) => {
                        sheet.write_number(r, c, *f).unwrap();
                    }
                    Cell::Text(s) => {
                        sheet.write_string(r, c, s).unwrap();
                    }
                    Cell::Bool(b) => {
                        sheet.write_boolean(r, c, *b).unwrap();
                    }
                }
            }
        }
    }
    workbook.save_to_buffer().unwrap()
}

/// Single-sheet workbook of five-cell upload rows.
pub(crate) fn upload_xlsx(rows: Vec<Vec<Cell>>) -> Vec<u8> {
    xlsx(&[("Sheet1", rows)])
}

pub(crate) fn sale_row(
    offer: Cell,
    name: &str,
    price: i64,
    quantity: i64,
    available: bool,
) -> Vec<Cell> {
    vec![
        offer,
        Cell::Text(name.to_string()),
        Cell::Int(price),
        Cell::Int(quantity),
        Cell::Bool(available),
    ]
}

/// Serves fixed byte payloads by locator; unknown locators are unreachable.
#[derive(Debug, Default, Clone)]
pub(crate) struct StaticSource {
    files: Arc<HashMap<String, Vec<u8>>>,
}

impl StaticSource {
    pub(crate) fn new(files: impl IntoIterator<Item = (String, Vec<u8>)>) -> Self {
        Self {
            files: Arc::new(files.into_iter().collect()),
        }
    }
}

#[async_trait]
impl SourceFetcher for StaticSource {
    async fn fetch(&self, locator: &str) -> Result<Vec<u8>, SourceError> {
        match self.files.get(locator) {
            Some(bytes) => Ok(bytes.clone()),
            None => Err(SourceError::Status(reqwest::StatusCode::NOT_FOUND)),
        }
    }
}

/// Poll until the job reports ready.
pub(crate) async fn wait_ready<S, F>(engine: &UploadEngine<S, F>, id: &JobId) -> UploadStatus
where
    S: SaleStore + 'static,
    F: SourceFetcher + 'static,
{
    for _ in 0..200 {
        let status = engine.status(id).await;
        if status.ready {
            return status;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job {id} did not become ready in time");
}
