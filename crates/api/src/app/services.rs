use std::sync::Arc;

use thiserror::Error;

use salesync_infra::config::{AppConfig, StoreConfig};
use salesync_infra::jobs::{HttpSourceFetcher, SourceError, SourceFetcher, UploadEngine};
use salesync_infra::store::{InMemorySaleStore, PostgresSaleStore, SaleStore, StoreError};

/// Upload engine over type-erased store and fetcher.
pub type Engine = UploadEngine<Arc<dyn SaleStore>, Arc<dyn SourceFetcher>>;

#[derive(Debug, Error)]
pub enum ServicesError {
    #[error("sale store unavailable: {0}")]
    Store(#[from] StoreError),

    #[error("source fetcher unavailable: {0}")]
    Source(#[from] SourceError),
}

/// Everything the handlers need, shared behind an `Arc`.
#[derive(Clone)]
pub struct AppServices {
    store: Arc<dyn SaleStore>,
    engine: Engine,
}

impl AppServices {
    pub fn new(store: Arc<dyn SaleStore>, fetcher: Arc<dyn SourceFetcher>) -> Self {
        Self {
            engine: UploadEngine::new(store.clone(), fetcher),
            store,
        }
    }

    pub fn store(&self) -> &Arc<dyn SaleStore> {
        &self.store
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }
}

/// Connect the configured store and build the HTTP fetcher.
pub async fn build_services(config: &AppConfig) -> Result<AppServices, ServicesError> {
    let store: Arc<dyn SaleStore> = match &config.store {
        StoreConfig::Postgres {
            url,
            max_connections,
        } => {
            let store = PostgresSaleStore::connect(url, *max_connections).await?;
            store.ensure_schema().await?;
            tracing::info!(max_connections, "using postgres sale store");
            Arc::new(store)
        }
        StoreConfig::InMemory => {
            tracing::warn!("no database configured; sale records are kept in memory only");
            Arc::new(InMemorySaleStore::new())
        }
    };

    let fetcher = HttpSourceFetcher::new(config.fetch_timeout)?;
    Ok(AppServices::new(store, Arc::new(fetcher)))
}
