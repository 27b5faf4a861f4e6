//! Transaction submission as entered on the hedge form.

use crate::domain::{Decimal, InventoryCode};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A proposed Buy, Sell, or Rollover before it has been validated.
///
/// `reason` stays a raw string so unknown kinds can be rejected with a
/// structured error instead of a deserialization failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub date: NaiveDate,
    #[serde(default)]
    pub commodity: String,
    #[serde(default)]
    pub product_type: String,
    pub lots: Decimal,
    pub reason: String,
    #[serde(default)]
    pub trader: String,
    #[serde(default)]
    pub contract: String,
    #[serde(default)]
    pub supplier_name: Option<String>,
    #[serde(default)]
    pub buyer_name: Option<String>,
    #[serde(default)]
    pub avg_price: Option<Decimal>,
    /// Target contract month of a Rollover.
    #[serde(default)]
    pub next_contract: Option<String>,
    /// Signed price adjustment applied to the reopened leg of a Rollover.
    #[serde(default)]
    pub rollover_gains: Option<Decimal>,
    #[serde(default)]
    pub selected_allocations: Vec<Allocation>,
}

/// Lots taken from one open position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub code: InventoryCode,
    pub quantity: Decimal,
}

impl Allocation {
    pub fn new(code: impl Into<String>, quantity: Decimal) -> Self {
        Allocation {
            code: InventoryCode::new(code),
            quantity,
        }
    }
}

/// Trimmed value of an optional text field, `None` when blank.
pub(crate) fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
