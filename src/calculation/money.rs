//! Currency rounding.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a monetary amount to cents, midpoint away from zero.
///
/// ```
/// use payroll_batch::calculation::round_currency;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_currency(Decimal::from_str("107.025").unwrap()), Decimal::from_str("107.03").unwrap());
/// assert_eq!(round_currency(Decimal::from(950)).to_string(), "950.00");
/// ```
pub fn round_currency(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}
