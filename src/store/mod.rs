//! Ledger store abstraction: the append-only table the engine reads from.

use crate::domain::TransactionRow;
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

pub mod csv;
pub mod memory;

pub use self::csv::CsvLedgerStore;
pub use memory::MemoryLedgerStore;

/// Append-only table of ledger rows.
///
/// Implementations must return rows in the order they were appended and
/// exclude any header row.
#[async_trait]
pub trait LedgerStore: Send + Sync + fmt::Debug {
    /// Read every row in append order.
    async fn read_all(&self) -> Result<Vec<TransactionRow>, StoreError>;

    /// Append a single row.
    async fn append(&self, row: &TransactionRow) -> Result<(), StoreError>;

    /// Append several rows, all or nothing.
    ///
    /// The default appends one row at a time and is only atomic if the
    /// backend never fails halfway; backends that can do better override it.
    async fn append_batch(&self, rows: &[TransactionRow]) -> Result<(), StoreError> {
        for row in rows {
            self.append(row).await?;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Ledger store unavailable: {0}")]
    Unavailable(String),
    #[error("Ledger I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Ledger parse error: {0}")]
    Parse(String),
    #[error("Ledger database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<::csv::Error> for StoreError {
    fn from(err: ::csv::Error) -> Self {
        StoreError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::Unavailable("connection refused".to_string());
        assert_eq!(err.to_string(), "Ledger store unavailable: connection refused");

        let err = StoreError::Parse("bad row".to_string());
        assert_eq!(err.to_string(), "Ledger parse error: bad row");
    }
}
