//! In-memory ledger store for testing without a database or file.

use super::{LedgerStore, StoreError};
use crate::domain::TransactionRow;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

#[derive(Debug, Default)]
pub struct MemoryLedgerStore {
    rows: RwLock<Vec<TransactionRow>>,
    unavailable: AtomicBool,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing rows.
    pub fn with_rows(rows: Vec<TransactionRow>) -> Self {
        Self {
            rows: RwLock::new(rows),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Make every subsequent call fail with `StoreError::Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.rows.read().map(|rows| rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    async fn read_all(&self) -> Result<Vec<TransactionRow>, StoreError> {
        self.check_available()?;
        let rows = self
            .rows
            .read()
            .map_err(|_| StoreError::Unavailable("memory store poisoned".to_string()))?;
        Ok(rows.clone())
    }

    async fn append(&self, row: &TransactionRow) -> Result<(), StoreError> {
        self.append_batch(std::slice::from_ref(row)).await
    }

    async fn append_batch(&self, rows: &[TransactionRow]) -> Result<(), StoreError> {
        self.check_available()?;
        let mut stored = self
            .rows
            .write()
            .map_err(|_| StoreError::Unavailable("memory store poisoned".to_string()))?;
        stored.extend_from_slice(rows);
        Ok(())
    }
}
