//! Ledger row: one line of the append-only transaction table.

use crate::domain::{Decimal, InventoryCode, Reason};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Column titles of the ledger sheet, in storage order.
pub const LEDGER_HEADER: [&str; 10] = [
    "Date",
    "Commodity",
    "Product Type",
    "Number of Lots",
    "Reason",
    "Trader Name",
    "Supplier/Buyer",
    "Contract",
    "Inventory Code",
    "Avg Price",
];

/// A single ledger entry. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRow {
    pub date: NaiveDate,
    pub commodity: String,
    pub product_type: String,
    pub lots: Decimal,
    pub reason: Reason,
    pub trader: String,
    /// Supplier on a Sell, buyer on a Buy.
    pub counterparty: String,
    /// Contract month code, e.g. `Mar`.
    pub contract: String,
    pub inventory_code: InventoryCode,
    pub avg_price: Decimal,
}

impl TransactionRow {
    /// Render the row as the ten sheet cells, in `LEDGER_HEADER` order.
    pub fn to_record(&self) -> [String; 10] {
        [
            self.date.format("%Y-%m-%d").to_string(),
            self.commodity.clone(),
            self.product_type.clone(),
            self.lots.to_canonical_string(),
            self.reason.to_string(),
            self.trader.clone(),
            self.counterparty.clone(),
            self.contract.clone(),
            self.inventory_code.to_string(),
            self.avg_price.to_canonical_string(),
        ]
    }

    /// Parse a row from sheet cells in `LEDGER_HEADER` order.
    pub fn from_record<S: AsRef<str>>(cells: &[S]) -> Result<Self, RowParseError> {
        if cells.len() < LEDGER_HEADER.len() {
            return Err(RowParseError::ColumnCount(cells.len()));
        }
        let cell = |i: usize| cells[i].as_ref().trim();

        let date = NaiveDate::parse_from_str(cell(0), "%Y-%m-%d")
            .map_err(|_| RowParseError::Field("Date", cell(0).to_string()))?;
        let lots = cell(3)
            .parse()
            .map_err(|_| RowParseError::Field("Number of Lots", cell(3).to_string()))?;
        let reason = cell(4)
            .parse()
            .map_err(|_| RowParseError::Field("Reason", cell(4).to_string()))?;
        // Blank prices were written as 0 by the sheet form.
        let avg_price = if cell(9).is_empty() {
            Decimal::zero()
        } else {
            cell(9)
                .parse()
                .map_err(|_| RowParseError::Field("Avg Price", cell(9).to_string()))?
        };

        Ok(TransactionRow {
            date,
            commodity: cell(1).to_string(),
            product_type: cell(2).to_string(),
            lots,
            reason,
            trader: cell(5).to_string(),
            counterparty: cell(6).to_string(),
            contract: cell(7).to_string(),
            inventory_code: InventoryCode::new(cell(8)),
            avg_price,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RowParseError {
    #[error("expected 10 columns, found {0}")]
    ColumnCount(usize),
    #[error("invalid {0}: '{1}'")]
    Field(&'static str, String),
}
