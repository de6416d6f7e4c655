//! Row-level reconciliation of upload instructions against the sale store.
//!
//! Each instruction is applied on its own: a lookup by key, then at most one
//! mutation. There is no transaction across instructions, so a job that hits
//! errors part-way leaves every earlier row applied.

use thiserror::Error;

use salesync_sales::{ReconciliationInstruction, SaleKey};

use crate::store::{SaleStore, StoreError};

/// What a successfully applied instruction did, with the rows the store
/// reported as affected (normally 0 or 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciled {
    Created(u64),
    Updated(u64),
    Deleted(u64),
}

/// Store failure while reconciling one instruction. The row is dropped.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("lookup of sale {key} failed: {source}")]
    Lookup {
        key: SaleKey,
        #[source]
        source: StoreError,
    },

    #[error("{action} of sale {key} failed: {source}")]
    Mutation {
        action: &'static str,
        key: SaleKey,
        #[source]
        source: StoreError,
    },
}

/// Applies create/update/delete semantics for decoded rows.
#[derive(Debug, Clone)]
pub struct Reconciler<S> {
    store: S,
}

impl<S: SaleStore> Reconciler<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Apply one instruction.
    ///
    /// - available, key present: update name/price/quantity
    /// - available, key absent: insert
    /// - not available: delete by key whether or not it was found
    ///
    /// Zero rows affected is a successful no-op, never an error.
    pub async fn apply(
        &self,
        instruction: &ReconciliationInstruction,
    ) -> Result<Reconciled, ReconcileError> {
        let key = instruction.key();

        let existing = self
            .store
            .find_by_key(key)
            .await
            .map_err(|source| ReconcileError::Lookup { key, source })?;

        if !instruction.available {
            return self
                .store
                .delete_by_key(key)
                .await
                .map(Reconciled::Deleted)
                .map_err(|source| ReconcileError::Mutation {
                    action: "delete",
                    key,
                    source,
                });
        }

        match existing {
            Some(_) => self
                .store
                .update(&instruction.sale)
                .await
                .map(Reconciled::Updated)
                .map_err(|source| ReconcileError::Mutation {
                    action: "update",
                    key,
                    source,
                }),
            None => self
                .store
                .insert(&instruction.sale)
                .await
                .map(Reconciled::Created)
                .map_err(|source| ReconcileError::Mutation {
                    action: "insert",
                    key,
                    source,
                }),
        }
    }
}
