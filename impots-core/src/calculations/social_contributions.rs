//! Employee social contributions ("cotisations salariales").
//!
//! Every contribution is a flat rate applied to a base derived from gross
//! salary and the social-security ceiling (PASS):
//!
//! | Base                | Definition |
//! |---------------------|------------|
//! | CSG base            | 98.25 % of gross up to 4 × PASS, plus the full excess above it |
//! | Gross               | gross salary |
//! | T1                  | `min(gross, PASS)` |
//! | Band `from..to`     | `max(0, min(gross, to × PASS) − from × PASS)` (T2 is `1..8`) |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use impots_core::{ContributionBase, ContributionCategory, ContributionRule, CsgAbatement,
//!     ProfessionalDeduction, RateTable, SocialContributionsCalculator, TaxBracket, VatConfig,
//!     VatSavingsBracket};
//!
//! let rates = RateTable {
//!     year: 2026,
//!     ceiling: dec!(48060),
//!     csg_abatement: CsgAbatement { rate: dec!(0.9825), ceiling_multiple: dec!(4) },
//!     contributions: vec![ContributionRule {
//!         id: "vieillesse_plafonnee".to_string(),
//!         label: "Vieillesse plafonnée".to_string(),
//!         rate: dec!(0.069),
//!         base: ContributionBase::CappedAtCeiling,
//!         category: ContributionCategory::Retirement,
//!     }],
//!     income_tax_brackets: vec![TaxBracket { min: dec!(0), max: None, rate: dec!(0) }],
//!     professional_deduction: ProfessionalDeduction { rate: dec!(0.10), min: dec!(504), max: dec!(14426) },
//!     quotient_familial_cap: dec!(1807),
//!     vat: VatConfig {
//!         effective_rate: dec!(0.13),
//!         savings_brackets: vec![VatSavingsBracket { max_net_annual: None, rate: dec!(0) }],
//!     },
//! };
//!
//! let breakdown = SocialContributionsCalculator::new(&rates).calculate(dec!(60000));
//!
//! // Capped at the ceiling: 48060 × 6.9 %
//! assert_eq!(breakdown.total, dec!(3316.14));
//! assert_eq!(breakdown.retirement, dec!(3316.14));
//! ```

use rust_decimal::Decimal;
use tracing::{debug, trace};

use crate::calculations::common::{max, round_half_up};
use crate::{
    ContributionBase, ContributionCategory, ContributionLine, RateTable,
    SocialContributionsBreakdown,
};

/// Calculator for the itemized employee contribution breakdown.
#[derive(Debug, Clone, Copy)]
pub struct SocialContributionsCalculator<'a> {
    rates: &'a RateTable,
}

impl<'a> SocialContributionsCalculator<'a> {
    pub fn new(rates: &'a RateTable) -> Self {
        Self { rates }
    }

    /// Computes every contribution line for one gross annual salary.
    ///
    /// A zero salary yields an all-zero breakdown. Negative salaries are
    /// not rejected; callers are expected to sanitize input.
    pub fn calculate(
        &self,
        gross: Decimal,
    ) -> SocialContributionsBreakdown {
        debug!(%gross, year = self.rates.year, "computing social contributions");

        let csg_base = self.csg_base(gross);

        let lines: Vec<ContributionLine> = self
            .rates
            .contributions
            .iter()
            .map(|rule| {
                let base = round_half_up(self.base_for(&rule.base, gross, csg_base));
                let amount = round_half_up(base * rule.rate);
                trace!(id = %rule.id, %base, rate = %rule.rate, %amount, "contribution line");
                ContributionLine {
                    id: rule.id.clone(),
                    label: rule.label.clone(),
                    rate: rule.rate,
                    base,
                    amount,
                    category: rule.category,
                }
            })
            .collect();

        let subtotal = |category: ContributionCategory| -> Decimal {
            lines
                .iter()
                .filter(|l| l.category == category)
                .map(|l| l.amount)
                .sum()
        };

        let retirement = subtotal(ContributionCategory::Retirement);
        let csg_deductible = subtotal(ContributionCategory::CsgDeductible);
        let csg_non_deductible = subtotal(ContributionCategory::CsgNonDeductible);
        let crds = subtotal(ContributionCategory::Crds);
        let total = lines.iter().map(|l| l.amount).sum();

        SocialContributionsBreakdown {
            total,
            retirement,
            health: csg_deductible + csg_non_deductible,
            csg_deductible,
            csg_non_deductible,
            crds,
            csg_base,
            lines,
        }
    }

    /// Base shared by CSG and CRDS.
    ///
    /// The abatement applies only to the slice under the cap; the excess
    /// above it is taken in full.
    pub fn csg_base(
        &self,
        gross: Decimal,
    ) -> Decimal {
        let abatement = &self.rates.csg_abatement;
        let cap = self.rates.ceiling * abatement.ceiling_multiple;

        let base = if gross <= cap {
            gross * abatement.rate
        } else {
            cap * abatement.rate + (gross - cap)
        };
        round_half_up(base)
    }

    fn base_for(
        &self,
        base: &ContributionBase,
        gross: Decimal,
        csg_base: Decimal,
    ) -> Decimal {
        let ceiling = self.rates.ceiling;
        match base {
            ContributionBase::CsgBase => csg_base,
            ContributionBase::Gross => gross,
            ContributionBase::CappedAtCeiling => gross.min(ceiling),
            ContributionBase::CeilingBand { from, to } => {
                max(gross.min(*to * ceiling) - *from * ceiling, Decimal::ZERO)
            }
        }
    }
}
