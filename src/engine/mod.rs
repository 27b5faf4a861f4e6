//! Pure computation engine for the hedge ledger.
//!
//! Nothing here performs I/O: callers read the ledger, hand the rows in, and
//! append whatever rows come back.

pub mod allocation;
pub mod calculator;
pub mod codegen;
pub mod dashboard;
pub mod error;
pub mod positions;

pub use allocation::validate_and_build_rows;
pub use calculator::{next_contract_months, weighted_average, PriceEntry, WeightedAverage};
pub use codegen::generate_inventory_code;
pub use dashboard::{build_dashboard, Dashboard, HedgeStatus};
pub use error::EngineError;
pub use positions::{
    aggregate_positions, compute_inventory_prices, compute_open_positions, existing_codes,
    InventoryPrice, Position, PositionFilter,
};
