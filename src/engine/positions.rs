use crate::domain::{Decimal, InventoryCode, Reason, TransactionRow};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Optional commodity/contract restriction applied row by row.
///
/// An absent or blank field matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionFilter {
    pub commodity: Option<String>,
    pub contract: Option<String>,
}

impl PositionFilter {
    pub fn new(commodity: Option<&str>, contract: Option<&str>) -> Self {
        let clean = |v: Option<&str>| {
            v.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        Self {
            commodity: clean(commodity),
            contract: clean(contract),
        }
    }

    pub fn all() -> Self {
        Self::default()
    }

    pub fn matches(&self, row: &TransactionRow) -> bool {
        self.commodity
            .as_deref()
            .map_or(true, |c| row.commodity == c)
            && self.contract.as_deref().map_or(true, |c| row.contract == c)
    }
}

/// Aggregate of every ledger row sharing one inventory code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub code: InventoryCode,
    pub commodity: String,
    pub product_type: String,
    /// Contract month of the latest Sell, i.e. where the position lives now.
    pub contract: String,
    /// Supplier of the latest Sell.
    pub counterparty: String,
    pub sold_lots: Decimal,
    pub bought_lots: Decimal,
    pub open_lots: Decimal,
    /// Price of the latest Sell, not a running average.
    pub avg_price: Decimal,
}

impl Position {
    fn seed(row: &TransactionRow) -> Self {
        Position {
            code: row.inventory_code.clone(),
            commodity: row.commodity.clone(),
            product_type: row.product_type.clone(),
            contract: row.contract.clone(),
            counterparty: String::new(),
            sold_lots: Decimal::zero(),
            bought_lots: Decimal::zero(),
            open_lots: Decimal::zero(),
            avg_price: Decimal::zero(),
        }
    }

    fn apply(&mut self, row: &TransactionRow) {
        match row.reason {
            Reason::Sell => {
                self.sold_lots = self.sold_lots.saturating_add(row.lots);
                self.product_type = row.product_type.clone();
                self.contract = row.contract.clone();
                self.counterparty = row.counterparty.clone();
                self.avg_price = row.avg_price;
            }
            Reason::Buy | Reason::Rollover => {
                self.bought_lots = self.bought_lots.saturating_add(row.lots);
            }
        }
        self.open_lots = self.sold_lots.saturating_sub(self.bought_lots);
    }

    pub fn is_open(&self) -> bool {
        self.open_lots.is_positive()
    }
}

/// Group matching rows by inventory code, keeping closed and over-closed
/// codes. Output follows first-seen storage order.
pub fn aggregate_positions(rows: &[TransactionRow], filter: &PositionFilter) -> Vec<Position> {
    let mut positions: Vec<Position> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for row in rows {
        if row.inventory_code.is_empty() || !filter.matches(row) {
            continue;
        }
        let slot = *index
            .entry(row.inventory_code.as_str())
            .or_insert_with(|| {
                positions.push(Position::seed(row));
                positions.len() - 1
            });
        positions[slot].apply(row);
    }

    positions
}

/// Positions with open lots remaining, in first-seen storage order.
pub fn compute_open_positions(rows: &[TransactionRow], filter: &PositionFilter) -> Vec<Position> {
    aggregate_positions(rows, filter)
        .into_iter()
        .filter(Position::is_open)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryPrice {
    pub code: InventoryCode,
    pub avg_price: Decimal,
}

/// Price of the first Sell recorded for each requested code.
///
/// Codes with no Sell in the ledger are left out.
pub fn compute_inventory_prices(
    rows: &[TransactionRow],
    codes: &HashSet<InventoryCode>,
) -> Vec<InventoryPrice> {
    let mut seen: HashSet<&str> = HashSet::new();
    rows.iter()
        .filter(|row| row.reason == Reason::Sell && codes.contains(row.inventory_code.as_str()))
        .filter(|row| seen.insert(row.inventory_code.as_str()))
        .map(|row| InventoryPrice {
            code: row.inventory_code.clone(),
            avg_price: row.avg_price,
        })
        .collect()
}

/// Every inventory code present in the ledger.
pub fn existing_codes(rows: &[TransactionRow]) -> HashSet<InventoryCode> {
    rows.iter()
        .filter(|row| !row.inventory_code.is_empty())
        .map(|row| row.inventory_code.clone())
        .collect()
}
