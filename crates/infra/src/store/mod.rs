//! Sale record storage.
//!
//! The catalog is a keyed store of [`SaleRecord`]s addressed by
//! `(seller_id, offer_id)`. Reconciliation only needs point operations; the
//! filtered bulk read serves the catalog query endpoint.

pub mod in_memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use salesync_sales::{SaleFilter, SaleKey, SaleRecord};

pub use in_memory::InMemorySaleStore;
pub use postgres::PostgresSaleStore;

/// Storage operation error.
///
/// "Not found" is not an error: lookups return `Ok(None)` for absent keys and
/// mutations report zero rows affected.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sale already exists: {0}")]
    Conflict(SaleKey),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("storage error: {0}")]
    Storage(String),
}

/// Keyed store of sale records.
///
/// Implementations serialize conflicting writes to the same key themselves;
/// callers issue independent point operations with no cross-call transaction.
#[async_trait]
pub trait SaleStore: Send + Sync {
    /// Point lookup by composite key.
    async fn find_by_key(&self, key: SaleKey) -> Result<Option<SaleRecord>, StoreError>;

    /// Insert a new record. Returns rows affected.
    async fn insert(&self, sale: &SaleRecord) -> Result<u64, StoreError>;

    /// Overwrite name, price and quantity of the record with the same key.
    /// Returns rows affected (0 when the key is absent).
    async fn update(&self, sale: &SaleRecord) -> Result<u64, StoreError>;

    /// Delete by key. Returns rows affected (0 when the key is absent).
    async fn delete_by_key(&self, key: SaleKey) -> Result<u64, StoreError>;

    /// Filtered bulk read, ordered by `(seller_id, offer_id)`.
    async fn find_by_filter(&self, filter: &SaleFilter) -> Result<Vec<SaleRecord>, StoreError>;
}

#[async_trait]
impl<S> SaleStore for Arc<S>
where
    S: SaleStore + ?Sized,
{
    async fn find_by_key(&self, key: SaleKey) -> Result<Option<SaleRecord>, StoreError> {
        (**self).find_by_key(key).await
    }

    async fn insert(&self, sale: &SaleRecord) -> Result<u64, StoreError> {
        (**self).insert(sale).await
    }

    async fn update(&self, sale: &SaleRecord) -> Result<u64, StoreError> {
        (**self).update(sale).await
    }

    async fn delete_by_key(&self, key: SaleKey) -> Result<u64, StoreError> {
        (**self).delete_by_key(key).await
    }

    async fn find_by_filter(&self, filter: &SaleFilter) -> Result<Vec<SaleRecord>, StoreError> {
        (**self).find_by_filter(filter).await
    }
}
