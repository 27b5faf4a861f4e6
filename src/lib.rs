pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod engine;
pub mod error;
pub mod orchestration;
pub mod store;

pub use config::{Config, LedgerBackend};
pub use db::{init_db, Repository};
pub use domain::{Allocation, Decimal, InventoryCode, Reason, Transaction, TransactionRow};
pub use error::AppError;
pub use orchestration::{DeskError, HedgeDesk};
pub use store::{CsvLedgerStore, LedgerStore, MemoryLedgerStore, StoreError};
