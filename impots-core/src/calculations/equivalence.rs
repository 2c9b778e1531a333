//! "Your taxes paid for N schoolbooks."
//!
//! Quantities are formatted the French way: narrow no-break space as the
//! thousands separator and a decimal comma.
//!
//! | Quantity    | Rendering |
//! |-------------|-----------|
//! | ≥ 1000      | integer, grouped by thousands |
//! | ≥ 100       | integer |
//! | ≥ 10        | one decimal |
//! | otherwise   | two decimals |

use rust_decimal::{Decimal, RoundingStrategy};

use crate::calculations::common::{ratio, round_half_up};
use crate::{Equivalence, EquivalenceUnit};

const THOUSANDS_SEPARATOR: char = '\u{202F}';

/// How many `unit`s `amount` buys.
pub fn equivalence(
    unit: &EquivalenceUnit,
    amount: Decimal,
) -> Equivalence {
    let quantity = round_half_up(ratio(amount, unit.unit_price));
    Equivalence {
        unit_id: unit.id.clone(),
        label: unit.label.clone(),
        unit_price: unit.unit_price,
        quantity,
        formatted: format!("{} {}", format_quantity(quantity), unit.label),
    }
}

/// ```
/// use rust_decimal_macros::dec;
/// use impots_core::calculations::equivalence::format_quantity;
///
/// assert_eq!(format_quantity(dec!(12345.6)), "12\u{202F}346");
/// assert_eq!(format_quantity(dec!(3.456)), "3,46");
/// ```
pub fn format_quantity(quantity: Decimal) -> String {
    let magnitude = quantity.abs();
    let dp = if magnitude >= Decimal::ONE_HUNDRED {
        0
    } else if magnitude >= Decimal::TEN {
        1
    } else {
        2
    };

    let rounded = quantity.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.*}", dp as usize, rounded);

    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (integer, fraction) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };

    let mut out = String::from(sign);
    out.push_str(&group_thousands(integer));
    if let Some(fraction) = fraction {
        out.push(',');
        out.push_str(fraction);
    }
    out
}

/// Inserts a narrow no-break space between groups of three digits.
///
/// ```
/// use impots_core::calculations::equivalence::group_thousands;
///
/// assert_eq!(group_thousands("1234567"), "1\u{202F}234\u{202F}567");
/// assert_eq!(group_thousands("999"), "999");
/// ```
pub fn group_thousands(integer: &str) -> String {
    let len = integer.len();
    let mut grouped = String::with_capacity(len + len / 3 * 3);
    for (i, c) in integer.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(THOUSANDS_SEPARATOR);
        }
        grouped.push(c);
    }
    grouped
}
