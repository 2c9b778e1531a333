//! Common utility functions for tax calculations.
//!
//! Rounding, guarded ratios and progressive-schedule evaluation shared by
//! the individual calculators.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::TaxBracket;

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use impots_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds to the nearest whole euro, midpoint away from zero.
///
/// ```
/// use rust_decimal_macros::dec;
/// use impots_core::calculations::common::round_to_euro;
///
/// assert_eq!(round_to_euro(dec!(1565.49)), dec!(1565));
/// assert_eq!(round_to_euro(dec!(1565.50)), dec!(1566));
/// ```
pub fn round_to_euro(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the maximum of two decimal values.
///
/// ```
/// use rust_decimal_macros::dec;
/// use impots_core::calculations::common::max;
///
/// assert_eq!(max(dec!(100.00), dec!(200.00)), dec!(200.00));
/// assert_eq!(max(dec!(-100.00), dec!(-200.00)), dec!(-100.00));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// `numerator / denominator`, or zero when the denominator is not positive.
pub fn ratio(
    numerator: Decimal,
    denominator: Decimal,
) -> Decimal {
    if denominator > Decimal::ZERO {
        numerator / denominator
    } else {
        Decimal::ZERO
    }
}

/// `amount × percentage / 100`.
pub fn percentage_of(
    amount: Decimal,
    percentage: Decimal,
) -> Decimal {
    amount * percentage / Decimal::ONE_HUNDRED
}

/// Tax computed on a progressive schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressiveTax {
    /// Unrounded tax.
    pub tax: Decimal,
    /// Rate of the highest bracket the income reaches into.
    pub marginal_rate: Decimal,
}

/// Applies each bracket's rate to the slice of `income` that falls inside it.
///
/// Brackets are expected ascending and contiguous; a `None` maximum is
/// unbounded. Income at or below zero owes nothing and reports the first
/// bracket's rate as marginal.
///
/// ```
/// use rust_decimal_macros::dec;
/// use impots_core::TaxBracket;
/// use impots_core::calculations::common::progressive_tax;
///
/// let brackets = vec![
///     TaxBracket { min: dec!(0), max: Some(dec!(10000)), rate: dec!(0) },
///     TaxBracket { min: dec!(10000), max: None, rate: dec!(0.20) },
/// ];
///
/// let result = progressive_tax(dec!(15000), &brackets);
/// assert_eq!(result.tax, dec!(1000));
/// assert_eq!(result.marginal_rate, dec!(0.20));
/// ```
pub fn progressive_tax(
    income: Decimal,
    brackets: &[TaxBracket],
) -> ProgressiveTax {
    let mut tax = Decimal::ZERO;
    let mut marginal_rate = brackets.first().map_or(Decimal::ZERO, |b| b.rate);

    for bracket in brackets {
        if income <= bracket.min {
            break;
        }
        let upper = bracket.max.map_or(income, |max| income.min(max));
        tax += (upper - bracket.min) * bracket.rate;
        marginal_rate = bracket.rate;
    }

    ProgressiveTax { tax, marginal_rate }
}
