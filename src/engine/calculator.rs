use super::EngineError;
use crate::domain::Decimal;
use serde::{Deserialize, Serialize};

/// Contract month codes in calendar order.
pub const CONTRACT_MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceEntry {
    pub lots: Decimal,
    pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightedAverage {
    pub total_lots: Decimal,
    pub avg_price: Decimal,
}

/// Lot-weighted average price of several fills, rounded to 2 dp.
///
/// Entries without positive lots are skipped.
///
/// # Errors
/// `OutOfRange` when the lot total or the notional does not fit a decimal.
pub fn weighted_average(entries: &[PriceEntry]) -> Result<WeightedAverage, EngineError> {
    let (total_lots, avg_price) =
        lot_weighted_price(entries.iter().map(|e| (e.lots, e.price))).ok_or(
            EngineError::OutOfRange {
                field: "Price entries",
            },
        )?;

    Ok(WeightedAverage {
        total_lots,
        avg_price,
    })
}

/// Total lots and their weighted price at 2 dp, over `(lots, price)` pairs
/// with positive lots. `None` on overflow.
pub(crate) fn lot_weighted_price<I>(pairs: I) -> Option<(Decimal, Decimal)>
where
    I: IntoIterator<Item = (Decimal, Decimal)>,
{
    let mut total_lots = Decimal::zero();
    let mut notional = Decimal::zero();
    for (lots, price) in pairs.into_iter().filter(|(lots, _)| lots.is_positive()) {
        total_lots = total_lots.checked_add(lots)?;
        notional = notional.checked_add(lots.checked_mul(price)?)?;
    }

    if !total_lots.is_positive() {
        return Some((total_lots, Decimal::zero()));
    }
    let avg_price = notional.checked_div(total_lots)?.round_dp(2);
    Some((total_lots, avg_price))
}

/// Candidate rollover targets: the eleven months after `current`, wrapping
/// around the year. Unknown or missing input yields all twelve months.
pub fn next_contract_months(current: Option<&str>) -> Vec<&'static str> {
    let start = current
        .map(str::trim)
        .and_then(|c| CONTRACT_MONTHS.iter().position(|m| *m == c));

    match start {
        Some(idx) => (1..CONTRACT_MONTHS.len())
            .map(|i| CONTRACT_MONTHS[(idx + i) % CONTRACT_MONTHS.len()])
            .collect(),
        None => CONTRACT_MONTHS.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    fn entry(lots: &str, price: &str) -> PriceEntry {
        PriceEntry {
            lots: d(lots),
            price: d(price),
        }
    }

    #[test]
    fn test_weighted_average() {
        let result = weighted_average(&[entry("2", "100"), entry("1", "103")]).unwrap();
        assert_eq!(result.total_lots, d("3"));
        assert_eq!(result.avg_price, d("101"));
    }

    #[test]
    fn test_weighted_average_rounds_to_cents() {
        let result = weighted_average(&[entry("1", "10"), entry("2", "10.01")]).unwrap();
        // 30.02 / 3 = 10.00666...
        assert_eq!(result.avg_price, d("10.01"));
    }

    #[test]
    fn test_weighted_average_skips_empty_rows() {
        let result =
            weighted_average(&[entry("0", "500"), entry("-1", "500"), entry("4", "50")]).unwrap();
        assert_eq!(result.total_lots, d("4"));
        assert_eq!(result.avg_price, d("50"));

        let none = weighted_average(&[]).unwrap();
        assert!(none.total_lots.is_zero());
        assert!(none.avg_price.is_zero());
    }

    #[test]
    fn test_weighted_average_overflow_is_an_error() {
        let err = weighted_average(&[entry("1000000000000000", "1000000000000000")]).unwrap_err();
        assert_eq!(err.kind(), "OutOfRange");

        let huge = "50000000000000000000000000000";
        let err = weighted_average(&[entry(huge, "1"), entry(huge, "1")]).unwrap_err();
        assert_eq!(err.kind(), "OutOfRange");
    }

    #[test]
    fn test_next_contract_months_wraps() {
        let months = next_contract_months(Some("Nov"));
        assert_eq!(months.len(), 11);
        assert_eq!(months[0], "Dec");
        assert_eq!(months[1], "Jan");
        assert_eq!(months[10], "Oct");
        assert!(!months.contains(&"Nov"));
    }

    #[test]
    fn test_next_contract_months_without_current() {
        assert_eq!(next_contract_months(None), CONTRACT_MONTHS.to_vec());
        assert_eq!(next_contract_months(Some("Smarch")).len(), 12);
    }
}
