use super::EngineError;
use crate::domain::InventoryCode;
use chrono::NaiveDate;
use std::collections::HashSet;

/// Highest sequence suffix tried before giving up.
pub const MAX_SEQUENCE: u32 = 999;

/// Build a fresh inventory code of the form
/// `SUP-CO-PR-CONTRACT-DDMMYY-NNN`.
///
/// The supplier, commodity, and product prefixes are uppercased and cut or
/// `X`-padded to 3, 2 and 2 characters. Blank inputs become `UNK`/`XX`. The
/// suffix counts up from 001 until the code is not in `existing`.
pub fn generate_inventory_code(
    supplier: &str,
    date: NaiveDate,
    commodity: &str,
    product_type: &str,
    contract: &str,
    existing: &HashSet<InventoryCode>,
) -> Result<InventoryCode, EngineError> {
    let base = format!(
        "{}-{}-{}-{}-{}",
        prefix(supplier, 3, "UNK"),
        prefix(commodity, 2, "XX"),
        prefix(product_type, 2, "XX"),
        contract.trim(),
        date.format("%d%m%y"),
    );

    for seq in 1..=MAX_SEQUENCE {
        let candidate = format!("{}-{:03}", base, seq);
        if !existing.contains(candidate.as_str()) {
            return Ok(InventoryCode(candidate));
        }
    }

    Err(EngineError::CodeGenerationExhausted(base))
}

fn prefix(value: &str, width: usize, fallback: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        return fallback.to_string();
    }
    let mut out: String = value.to_uppercase().chars().take(width).collect();
    while out.chars().count() < width {
        out.push('X');
    }
    out
}
