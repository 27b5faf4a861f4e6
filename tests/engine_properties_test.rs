use chrono::NaiveDate;
use hedgebook::domain::{Decimal, InventoryCode, Reason, TransactionRow};
use hedgebook::engine::{
    aggregate_positions, compute_open_positions, generate_inventory_code, PositionFilter,
};
use std::collections::HashSet;

fn row(code: &str, reason: Reason, lots: i64, contract: &str) -> TransactionRow {
    TransactionRow {
        date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        commodity: "Cotton".to_string(),
        product_type: "Raw".to_string(),
        lots: Decimal::from(lots),
        reason,
        trader: "Priya".to_string(),
        counterparty: "Acme".to_string(),
        contract: contract.to_string(),
        inventory_code: InventoryCode::new(code),
        avg_price: Decimal::from(100),
    }
}

/// Deterministic mixed ledger: a few codes, all three reasons, two contracts.
fn mixed_ledger(len: usize) -> Vec<TransactionRow> {
    let codes = ["A-001", "B-001", "C-001"];
    let reasons = [Reason::Sell, Reason::Sell, Reason::Buy, Reason::Rollover];
    let contracts = ["Mar", "May"];
    let mut state: u64 = 7;
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let pick = (state >> 33) as usize;
            row(
                codes[pick % codes.len()],
                reasons[(pick / 3) % reasons.len()],
                (pick % 9) as i64 + 1,
                contracts[(pick / 7) % contracts.len()],
            )
        })
        .collect()
}

#[test]
fn test_open_lots_equal_sold_minus_bought_for_every_prefix() {
    let ledger = mixed_ledger(60);
    for end in 0..=ledger.len() {
        for filter in [
            PositionFilter::all(),
            PositionFilter::new(Some("Cotton"), Some("Mar")),
            PositionFilter::new(None, Some("May")),
        ] {
            for p in aggregate_positions(&ledger[..end], &filter) {
                assert_eq!(
                    Some(p.open_lots),
                    p.sold_lots.checked_sub(p.bought_lots),
                    "code {}",
                    p.code
                );
            }
        }
    }
}

#[test]
fn test_open_positions_are_strictly_positive_and_unique() {
    let ledger = mixed_ledger(40);
    let open = compute_open_positions(&ledger, &PositionFilter::all());
    let mut seen = HashSet::new();
    for p in &open {
        assert!(p.open_lots.is_positive());
        assert!(seen.insert(p.code.clone()));
    }
}

#[test]
fn test_positions_follow_first_seen_order() {
    let ledger = vec![
        row("B-001", Reason::Sell, 1, "Mar"),
        row("A-001", Reason::Sell, 1, "Mar"),
        row("B-001", Reason::Sell, 1, "Mar"),
    ];
    let codes: Vec<String> = compute_open_positions(&ledger, &PositionFilter::all())
        .into_iter()
        .map(|p| p.code.to_string())
        .collect();
    assert_eq!(codes, vec!["B-001", "A-001"]);
}

#[test]
fn test_blank_filter_values_match_everything() {
    let ledger = mixed_ledger(30);
    let all = aggregate_positions(&ledger, &PositionFilter::all());
    let blank = aggregate_positions(&ledger, &PositionFilter::new(Some("  "), Some("")));
    assert_eq!(all, blank);
}

#[test]
fn test_generated_code_skips_existing_suffix() {
    let existing: HashSet<InventoryCode> = [InventoryCode::new("ABC-XX-XX-M-010124-001")]
        .into_iter()
        .collect();
    let code = generate_inventory_code(
        "abc",
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        "",
        "",
        "M",
        &existing,
    )
    .unwrap();
    assert_eq!(code.as_str(), "ABC-XX-XX-M-010124-002");
}
