//! Acquisition of source spreadsheet bytes.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

/// Why the source bytes could not be obtained.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("couldn't download spreadsheet from the given link")]
    Unreachable(#[source] reqwest::Error),

    #[error("source answered with HTTP status {0}")]
    Status(StatusCode),

    #[error("error downloading spreadsheet")]
    Body(#[source] reqwest::Error),

    #[error("http client setup failed")]
    Client(#[source] reqwest::Error),
}

impl SourceError {
    /// 400 for problems with the link itself, 500 for everything after a
    /// successful response started.
    pub fn code(&self) -> u16 {
        match self {
            SourceError::Unreachable(_) | SourceError::Status(_) => 400,
            SourceError::Body(_) | SourceError::Client(_) => 500,
        }
    }
}

/// Turns a source locator into raw workbook bytes.
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    async fn fetch(&self, locator: &str) -> Result<Vec<u8>, SourceError>;
}

#[async_trait]
impl<F> SourceFetcher for Arc<F>
where
    F: SourceFetcher + ?Sized,
{
    async fn fetch(&self, locator: &str) -> Result<Vec<u8>, SourceError> {
        (**self).fetch(locator).await
    }
}

/// Fetches workbooks with a plain HTTP GET.
#[derive(Debug, Clone)]
pub struct HttpSourceFetcher {
    client: reqwest::Client,
}

impl HttpSourceFetcher {
    /// Client with a whole-request timeout, so a hung remote cannot keep a job
    /// pending forever.
    pub fn new(timeout: Duration) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(SourceError::Client)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl SourceFetcher for HttpSourceFetcher {
    async fn fetch(&self, locator: &str) -> Result<Vec<u8>, SourceError> {
        let response = self
            .client
            .get(locator)
            .send()
            .await
            .map_err(SourceError::Unreachable)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status));
        }

        let body = response.bytes().await.map_err(SourceError::Body)?;
        Ok(body.to_vec())
    }
}
