use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{
    BudgetSector, CotisationDestination, EstimatedVatResult, IncomeTaxResult,
    SocialContributionsBreakdown, UserInput,
};

/// Complete, immutable outcome of one computation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResult {
    pub input: UserInput,
    /// Gross salary the rates are expressed against: the filer's own, or
    /// both partners' combined for the household variant.
    pub gross_income: Decimal,
    pub social_contributions: SocialContributionsBreakdown,
    pub cotisation_destinations: Vec<CotisationDestination>,
    pub income_tax: IncomeTaxResult,
    pub estimated_vat: EstimatedVatResult,
    /// `social_contributions.total + income_tax.amount`.
    pub direct_taxes: Decimal,
    /// `direct_taxes + estimated_vat.amount`.
    pub total_taxes: Decimal,
    /// `gross_income - direct_taxes`.
    pub net_take_home: Decimal,
    pub direct_tax_rate: Decimal,
    pub overall_tax_rate: Decimal,
    pub budget_allocation: Vec<BudgetSector>,
}
