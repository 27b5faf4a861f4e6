use super::{generate_inventory_code, EngineError, Position};
use crate::domain::transaction::non_blank;
use crate::domain::{Decimal, InventoryCode, Reason, Transaction, TransactionRow};
use std::collections::{HashMap, HashSet};

/// Validate a submission against freshly computed positions and build the
/// rows it would append.
///
/// `positions` must be the open positions for the transaction's
/// commodity/contract, computed from the same ledger read that produced
/// `existing_codes`. Nothing is built unless every check passes.
///
/// # Errors
/// Returns the first violated rule, checked in this order: reason, lots,
/// allocation presence, allocation sum, position lookup, open lots, the
/// required form fields, then whether the resulting rows fit a decimal.
pub fn validate_and_build_rows(
    tx: &Transaction,
    positions: &[Position],
    existing_codes: &HashSet<InventoryCode>,
) -> Result<Vec<TransactionRow>, EngineError> {
    let reason: Reason = tx
        .reason
        .parse()
        .map_err(|_| EngineError::InvalidReason(tx.reason.clone()))?;

    if !tx.lots.is_positive() {
        return Err(EngineError::InvalidQuantity(tx.lots));
    }

    let allocated = if reason.is_closing() {
        resolve_allocations(tx, positions)?
    } else {
        Vec::new()
    };

    check_required_fields(tx, reason)?;

    let rows = match reason {
        Reason::Sell => vec![build_sell(tx, existing_codes)?],
        Reason::Buy => build_buys(tx, &allocated),
        Reason::Rollover => build_rollovers(tx, &allocated)?,
    };
    check_representable(&rows, reason, &allocated)?;
    Ok(rows)
}

/// Reject rows whose notional, or whose effect on a position's running
/// totals, would not fit a decimal once stored.
fn check_representable(
    rows: &[TransactionRow],
    reason: Reason,
    allocated: &[(&InventoryCode, Decimal, &Position)],
) -> Result<(), EngineError> {
    if rows
        .iter()
        .any(|row| row.lots.checked_mul(row.avg_price).is_none())
    {
        return Err(EngineError::OutOfRange { field: "Avg Price" });
    }

    // A rollover reopens lots under the same code, growing its sold total.
    if reason == Reason::Rollover
        && allocated
            .iter()
            .any(|(_, quantity, position)| position.sold_lots.checked_add(*quantity).is_none())
    {
        return Err(EngineError::OutOfRange { field: "Number of Lots" });
    }
    Ok(())
}

/// Pair each allocation with the open position it draws from.
fn resolve_allocations<'a>(
    tx: &'a Transaction,
    positions: &'a [Position],
) -> Result<Vec<(&'a InventoryCode, Decimal, &'a Position)>, EngineError> {
    let allocations = &tx.selected_allocations;
    if allocations.is_empty() {
        return Err(EngineError::MissingAllocation);
    }

    if let Some(bad) = allocations.iter().find(|a| !a.quantity.is_positive()) {
        return Err(EngineError::InvalidQuantity(bad.quantity));
    }

    let allocated = Decimal::checked_sum(allocations.iter().map(|a| a.quantity))
        .ok_or(EngineError::OutOfRange { field: "Allocations" })?;
    if allocated != tx.lots {
        return Err(EngineError::AllocationMismatch {
            allocated,
            lots: tx.lots,
        });
    }

    let by_code: HashMap<&str, &Position> =
        positions.iter().map(|p| (p.code.as_str(), p)).collect();

    let mut resolved = Vec::with_capacity(allocations.len());
    for allocation in allocations {
        let position = by_code
            .get(allocation.code.as_str())
            .copied()
            .filter(|p| p.is_open())
            .ok_or_else(|| EngineError::UnknownPosition(allocation.code.clone()))?;
        resolved.push((&allocation.code, allocation.quantity, position));
    }

    // The same code may be listed twice; its entries share one open balance.
    let mut requested: HashMap<&str, Decimal> = HashMap::new();
    for (code, quantity, position) in &resolved {
        let total = requested.entry(code.as_str()).or_insert_with(Decimal::zero);
        *total = total
            .checked_add(*quantity)
            .ok_or(EngineError::OutOfRange { field: "Allocations" })?;
        if *total > position.open_lots {
            return Err(EngineError::OverAllocation {
                code: (*code).clone(),
                requested: *total,
                open: position.open_lots,
            });
        }
    }

    Ok(resolved)
}

fn check_required_fields(tx: &Transaction, reason: Reason) -> Result<(), EngineError> {
    let required = [
        ("Commodity", &tx.commodity),
        ("Product Type", &tx.product_type),
        ("Contract", &tx.contract),
        ("Trader", &tx.trader),
    ];
    if let Some((name, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
        return Err(EngineError::MissingField(*name));
    }

    let price_is_positive = tx.avg_price.map_or(false, |p| p.is_positive());
    match reason {
        Reason::Sell => {
            if non_blank(&tx.supplier_name).is_none() {
                return Err(EngineError::MissingField("Supplier Name"));
            }
            if !price_is_positive {
                return Err(EngineError::InvalidPrice { field: "Avg Price" });
            }
        }
        Reason::Buy => {
            if !price_is_positive {
                return Err(EngineError::InvalidPrice { field: "Avg Price" });
            }
        }
        Reason::Rollover => {
            if tx.rollover_gains.is_none() {
                return Err(EngineError::MissingField("Rollover Gains"));
            }
        }
    }
    Ok(())
}

/// Row skeleton carrying the fields every leg copies from the submission.
fn base_row(tx: &Transaction, reason: Reason, code: InventoryCode, lots: Decimal) -> TransactionRow {
    TransactionRow {
        date: tx.date,
        commodity: tx.commodity.trim().to_string(),
        product_type: tx.product_type.trim().to_string(),
        lots,
        reason,
        trader: tx.trader.trim().to_string(),
        counterparty: String::new(),
        contract: tx.contract.trim().to_string(),
        inventory_code: code,
        avg_price: Decimal::zero(),
    }
}

fn build_sell(
    tx: &Transaction,
    existing_codes: &HashSet<InventoryCode>,
) -> Result<TransactionRow, EngineError> {
    let supplier = non_blank(&tx.supplier_name).unwrap_or_default();
    let code = generate_inventory_code(
        supplier,
        tx.date,
        &tx.commodity,
        &tx.product_type,
        &tx.contract,
        existing_codes,
    )?;

    let mut row = base_row(tx, Reason::Sell, code, tx.lots);
    row.counterparty = supplier.to_string();
    row.avg_price = tx.avg_price.unwrap_or_default();
    Ok(row)
}

fn build_buys(
    tx: &Transaction,
    allocated: &[(&InventoryCode, Decimal, &Position)],
) -> Vec<TransactionRow> {
    let buyer = non_blank(&tx.buyer_name).unwrap_or_default();
    let price = tx.avg_price.unwrap_or_default();

    allocated
        .iter()
        .map(|(code, quantity, _)| {
            let mut row = base_row(tx, Reason::Buy, (*code).clone(), *quantity);
            row.counterparty = buyer.to_string();
            row.avg_price = price;
            row
        })
        .collect()
}

/// Close each allocated position at its own price, then reopen the same lots
/// under the next contract at that price plus the gain/loss adjustment.
fn build_rollovers(
    tx: &Transaction,
    allocated: &[(&InventoryCode, Decimal, &Position)],
) -> Result<Vec<TransactionRow>, EngineError> {
    let buyer = non_blank(&tx.buyer_name).unwrap_or_default();
    let supplier = non_blank(&tx.supplier_name);
    let next_contract = non_blank(&tx.next_contract).unwrap_or(tx.contract.trim());
    let gains = tx.rollover_gains.unwrap_or_default();

    let mut rows = Vec::with_capacity(allocated.len() * 2);
    for (code, quantity, position) in allocated {
        let mut close = base_row(tx, Reason::Buy, (*code).clone(), *quantity);
        close.counterparty = buyer.to_string();
        close.avg_price = position.avg_price;
        rows.push(close);

        let mut reopen = base_row(tx, Reason::Sell, (*code).clone(), *quantity);
        reopen.counterparty = supplier.unwrap_or(&position.counterparty).to_string();
        reopen.contract = next_contract.to_string();
        reopen.avg_price = position
            .avg_price
            .checked_add(gains)
            .ok_or(EngineError::OutOfRange { field: "Rollover Gains" })?;
        rows.push(reopen);
    }
    Ok(rows)
}
