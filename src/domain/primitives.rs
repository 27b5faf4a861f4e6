//! Domain primitives: Reason, InventoryCode.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Transaction kind recorded in the `Reason` column of the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reason {
    /// Opens a new position (the hedge sale).
    Sell,
    /// Closes lots of one or more open positions.
    Buy,
    /// Closes and reopens a position under a new contract month.
    Rollover,
}

impl Reason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Reason::Sell => "Sell",
            Reason::Buy => "Buy",
            Reason::Rollover => "Rollover",
        }
    }

    /// True for rows that reduce a position's open lots.
    pub fn is_closing(&self) -> bool {
        matches!(self, Reason::Buy | Reason::Rollover)
    }
}

impl std::fmt::Display for Reason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown reason '{0}'")]
pub struct ReasonParseError(pub String);

impl FromStr for Reason {
    type Err = ReasonParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Sell" => Ok(Reason::Sell),
            "Buy" => Ok(Reason::Buy),
            "Rollover" => Ok(Reason::Rollover),
            other => Err(ReasonParseError(other.to_string())),
        }
    }
}

/// Lineage key linking a Sell to its closing Buy and Rollover legs,
/// e.g. `ACM-CO-RA-Mar-150124-001`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InventoryCode(pub String);

impl InventoryCode {
    pub fn new(code: impl Into<String>) -> Self {
        InventoryCode(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Display for InventoryCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::borrow::Borrow<str> for InventoryCode {
    fn borrow(&self) -> &str {
        &self.0
    }
}
