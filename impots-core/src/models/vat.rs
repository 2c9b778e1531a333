use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Indirect tax estimated from disposable income.
///
/// `estimated_savings + estimated_consumption == net_after_tax`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimatedVatResult {
    pub net_after_tax: Decimal,
    pub savings_rate: Decimal,
    pub estimated_savings: Decimal,
    pub estimated_consumption: Decimal,
    pub effective_rate: Decimal,
    pub amount: Decimal,
}
