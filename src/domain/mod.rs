//! Domain types for the hedge ledger.
//!
//! This module provides:
//! - Lossless numeric handling via Decimal wrapper
//! - Domain primitives: Reason, InventoryCode
//! - Ledger rows and the sheet column layout
//! - Transaction submissions with their lot allocations

pub mod decimal;
pub mod primitives;
pub mod row;
pub mod transaction;

pub use decimal::Decimal;
pub use primitives::{InventoryCode, Reason, ReasonParseError};
pub use row::{RowParseError, TransactionRow, LEDGER_HEADER};
pub use transaction::{Allocation, Transaction};
