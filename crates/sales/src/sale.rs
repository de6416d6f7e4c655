use serde::{Deserialize, Serialize};

use salesync_core::{DomainError, DomainResult, OfferId, SellerId};

/// Composite identity of a sale: one offer of one seller.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SaleKey {
    pub seller_id: SellerId,
    pub offer_id: OfferId,
}

impl SaleKey {
    pub fn new(seller_id: SellerId, offer_id: OfferId) -> Self {
        Self {
            seller_id,
            offer_id,
        }
    }
}

impl core::fmt::Display for SaleKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}", self.seller_id, self.offer_id)
    }
}

/// A seller's offer as kept in the catalog.
///
/// Price is in the smallest currency unit. No history is kept: every
/// reconciliation overwrites the previous state for the same key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub offer_id: OfferId,
    pub seller_id: SellerId,
    pub name: String,
    pub price: i64,
    pub quantity: i64,
}

impl SaleRecord {
    /// Build a record, rejecting negative price or quantity.
    pub fn new(
        key: SaleKey,
        name: impl Into<String>,
        price: i64,
        quantity: i64,
    ) -> DomainResult<Self> {
        if price < 0 {
            return Err(DomainError::validation(format!("price must be >= 0, got {price}")));
        }
        if quantity < 0 {
            return Err(DomainError::validation(format!(
                "quantity must be >= 0, got {quantity}"
            )));
        }

        Ok(Self {
            offer_id: key.offer_id,
            seller_id: key.seller_id,
            name: name.into(),
            price,
            quantity,
        })
    }

    pub fn key(&self) -> SaleKey {
        SaleKey::new(self.seller_id, self.offer_id)
    }
}

/// Filter for catalog reads. Omitted fields are unconstrained; present fields
/// are AND-combined.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaleFilter {
    pub seller_id: Option<SellerId>,
    pub offer_id: Option<OfferId>,
    /// Case-insensitive substring of the sale name.
    pub name_query: Option<String>,
}

impl SaleFilter {
    pub fn with_seller(mut self, seller_id: SellerId) -> Self {
        self.seller_id = Some(seller_id);
        self
    }

    pub fn with_offer(mut self, offer_id: OfferId) -> Self {
        self.offer_id = Some(offer_id);
        self
    }

    pub fn with_name_query(mut self, query: impl Into<String>) -> Self {
        self.name_query = Some(query.into());
        self
    }

    pub fn matches(&self, sale: &SaleRecord) -> bool {
        if self.seller_id.is_some_and(|s| s != sale.seller_id) {
            return false;
        }
        if self.offer_id.is_some_and(|o| o != sale.offer_id) {
            return false;
        }
        match &self.name_query {
            Some(q) => sale.name.to_lowercase().contains(&q.to_lowercase()),
            None => true,
        }
    }
}
