//! Report aggregation behind the hedge dashboard.
//!
//! Produces three views over the raw ledger: exposure per
//! commodity/product/contract, the state of every inventory code, and the
//! buy history of each code. Rendering is left to the client.

use super::calculator::lot_weighted_price;
use super::positions::{aggregate_positions, PositionFilter};
use crate::domain::{Decimal, InventoryCode, Reason, TransactionRow};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HedgeStatus {
    /// Sold and bought lots cancel out.
    Closed,
    /// Lots remain sold and unhedged.
    OpenShort,
    /// More lots bought back than were sold.
    OverHedged,
}

impl HedgeStatus {
    pub fn from_open_lots(open: Decimal) -> Self {
        if open.is_zero() {
            HedgeStatus::Closed
        } else if open.is_positive() {
            HedgeStatus::OpenShort
        } else {
            HedgeStatus::OverHedged
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractSummary {
    pub commodity: String,
    pub product_type: String,
    pub contract: String,
    pub sold_lots: Decimal,
    pub bought_lots: Decimal,
    pub open_lots: Decimal,
    pub status: HedgeStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryDetail {
    pub code: InventoryCode,
    pub commodity: String,
    pub product_type: String,
    pub contract: String,
    pub supplier: String,
    pub sold_lots: Decimal,
    pub bought_lots: Decimal,
    pub open_lots: Decimal,
    pub avg_price: Decimal,
    pub status: HedgeStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyRecord {
    pub date: NaiveDate,
    pub lots: Decimal,
    pub buyer: String,
    pub avg_price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyGroup {
    pub code: InventoryCode,
    pub supplier: String,
    pub total_lots: Decimal,
    /// Lot-weighted average of the buy prices, 2 dp.
    pub avg_buy_price: Decimal,
    pub buys: Vec<BuyRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub summary: Vec<ContractSummary>,
    pub inventory: Vec<InventoryDetail>,
    pub buys: Vec<BuyGroup>,
}

pub fn build_dashboard(rows: &[TransactionRow]) -> Dashboard {
    let rows: Vec<TransactionRow> = rows
        .iter()
        .filter(|row| !row.commodity.trim().is_empty())
        .cloned()
        .collect();

    let inventory: Vec<InventoryDetail> = aggregate_positions(&rows, &PositionFilter::all())
        .into_iter()
        .map(|p| InventoryDetail {
            status: HedgeStatus::from_open_lots(p.open_lots),
            code: p.code,
            commodity: p.commodity,
            product_type: p.product_type,
            contract: p.contract,
            supplier: p.counterparty,
            sold_lots: p.sold_lots,
            bought_lots: p.bought_lots,
            open_lots: p.open_lots,
            avg_price: p.avg_price,
        })
        .collect();

    let buys = {
        let suppliers: HashMap<&str, &str> = inventory
            .iter()
            .map(|i| (i.code.as_str(), i.supplier.as_str()))
            .collect();
        group_buys(&rows, &suppliers)
    };

    Dashboard {
        summary: summarize_contracts(&rows),
        inventory,
        buys,
    }
}

fn summarize_contracts(rows: &[TransactionRow]) -> Vec<ContractSummary> {
    let mut summary: Vec<ContractSummary> = Vec::new();
    let mut index: HashMap<(&str, &str, &str), usize> = HashMap::new();

    for row in rows {
        let key = (
            row.commodity.as_str(),
            row.product_type.as_str(),
            row.contract.as_str(),
        );
        let slot = *index.entry(key).or_insert_with(|| {
            summary.push(ContractSummary {
                commodity: row.commodity.clone(),
                product_type: row.product_type.clone(),
                contract: row.contract.clone(),
                sold_lots: Decimal::zero(),
                bought_lots: Decimal::zero(),
                open_lots: Decimal::zero(),
                status: HedgeStatus::Closed,
            });
            summary.len() - 1
        });

        let entry = &mut summary[slot];
        if row.reason.is_closing() {
            entry.bought_lots = entry.bought_lots.saturating_add(row.lots);
        } else {
            entry.sold_lots = entry.sold_lots.saturating_add(row.lots);
        }
        entry.open_lots = entry.sold_lots.saturating_sub(entry.bought_lots);
        entry.status = HedgeStatus::from_open_lots(entry.open_lots);
    }

    summary
}

fn group_buys(rows: &[TransactionRow], suppliers: &HashMap<&str, &str>) -> Vec<BuyGroup> {
    let mut groups: Vec<BuyGroup> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for row in rows
        .iter()
        .filter(|r| r.reason.is_closing() && !r.inventory_code.is_empty())
    {
        let code = row.inventory_code.as_str();
        let slot = *index.entry(code).or_insert_with(|| {
            groups.push(BuyGroup {
                code: row.inventory_code.clone(),
                supplier: suppliers.get(code).copied().unwrap_or_default().to_string(),
                total_lots: Decimal::zero(),
                avg_buy_price: Decimal::zero(),
                buys: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].buys.push(BuyRecord {
            date: row.date,
            lots: row.lots,
            buyer: row.counterparty.clone(),
            avg_price: row.avg_price,
        });
    }

    for group in &mut groups {
        let weighted = lot_weighted_price(group.buys.iter().map(|b| (b.lots, b.avg_price)));
        match weighted {
            Some((total_lots, avg_price)) => {
                group.total_lots = total_lots;
                group.avg_buy_price = avg_price;
            }
            // Stored buys too large to average: report the clamped lot total
            // and leave the price at zero.
            None => {
                group.total_lots = group
                    .buys
                    .iter()
                    .fold(Decimal::zero(), |acc, b| acc.saturating_add(b.lots));
            }
        }
    }

    groups
}
