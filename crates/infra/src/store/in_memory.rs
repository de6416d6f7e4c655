use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use salesync_sales::{SaleFilter, SaleKey, SaleRecord};

use super::{SaleStore, StoreError};

/// In-memory sale store for tests/dev.
///
/// Keyed by `(seller_id, offer_id)` in a `BTreeMap`, so filtered reads come
/// back in key order like the Postgres store.
#[derive(Debug, Default)]
pub struct InMemorySaleStore {
    sales: RwLock<BTreeMap<SaleKey, SaleRecord>>,
}

impl InMemorySaleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.sales.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BTreeMap<SaleKey, SaleRecord>>, StoreError> {
        self.sales
            .read()
            .map_err(|_| StoreError::Storage("sale store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BTreeMap<SaleKey, SaleRecord>>, StoreError> {
        self.sales
            .write()
            .map_err(|_| StoreError::Storage("sale store lock poisoned".to_string()))
    }
}

#[async_trait]
impl SaleStore for InMemorySaleStore {
    async fn find_by_key(&self, key: SaleKey) -> Result<Option<SaleRecord>, StoreError> {
        Ok(self.read()?.get(&key).cloned())
    }

    async fn insert(&self, sale: &SaleRecord) -> Result<u64, StoreError> {
        let mut sales = self.write()?;
        let key = sale.key();
        if sales.contains_key(&key) {
            return Err(StoreError::Conflict(key));
        }
        sales.insert(key, sale.clone());
        Ok(1)
    }

    async fn update(&self, sale: &SaleRecord) -> Result<u64, StoreError> {
        let mut sales = self.write()?;
        match sales.get_mut(&sale.key()) {
            Some(existing) => {
                existing.name = sale.name.clone();
                existing.price = sale.price;
                existing.quantity = sale.quantity;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_by_key(&self, key: SaleKey) -> Result<u64, StoreError> {
        Ok(self.write()?.remove(&key).map_or(0, |_| 1))
    }

    async fn find_by_filter(&self, filter: &SaleFilter) -> Result<Vec<SaleRecord>, StoreError> {
        Ok(self
            .read()?
            .values()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect())
    }
}
