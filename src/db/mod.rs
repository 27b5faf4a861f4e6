//! SQLite persistence for the hedge ledger.
//!
//! This module provides:
//! - Database initialization and schema setup
//! - SQLite pragma configuration
//! - `Repository`, the SQLite implementation of `LedgerStore`

pub mod migrations;
pub mod repo;

pub use migrations::init_db;
pub use repo::Repository;
