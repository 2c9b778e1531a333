use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Income tax owed by one filer, with the household figures it was
/// derived from.
///
/// When there is no partner income the household fields equal the
/// individual ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeTaxResult {
    /// Revenu net imposable of the filer.
    pub net_imposable: Decimal,
    /// Professional deduction applied across the household.
    pub professional_deduction: Decimal,
    /// Household taxable income after the professional deduction.
    pub taxable_income: Decimal,
    pub parts: Decimal,
    pub marginal_rate: Decimal,
    /// `amount / net_imposable`, or 0 when nothing is imposable.
    pub effective_rate: Decimal,
    /// The filer's tax (their share of `household_tax` for couples).
    pub amount: Decimal,
    pub household_net_imposable: Decimal,
    pub household_tax: Decimal,
    /// Reduction obtained from parts above the baseline, after capping.
    pub quotient_familial_advantage: Decimal,
    pub quotient_familial_capped: bool,
}

impl IncomeTaxResult {
    /// Restates the result for the household as a whole.
    pub fn for_household(&self) -> Self {
        let effective_rate = if self.household_net_imposable > Decimal::ZERO {
            self.household_tax / self.household_net_imposable
        } else {
            Decimal::ZERO
        };

        Self {
            net_imposable: self.household_net_imposable,
            amount: self.household_tax,
            effective_rate,
            ..self.clone()
        }
    }
}
