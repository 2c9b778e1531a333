//! Progressive income tax with the quotient familial.
//!
//! # Steps
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Fiscal parts from family status and children |
//! | 2    | Net imposable: gross minus deductible contributions (CRDS and non-deductible CSG stay taxable) |
//! | 3    | Professional deduction, clamped, applied per declarant |
//! | 4    | Tax per part on the progressive schedule, times parts |
//! | 5    | Quotient-familial cap on the advantage from extra half-parts |
//! | 6    | Floor at zero, round to the euro |
//! | 7    | Couples with two incomes: apportion by net imposable share |

use rust_decimal::Decimal;
use tracing::{debug, trace, warn};

use crate::calculations::SocialContributionsCalculator;
use crate::calculations::common::{max, progressive_tax, ratio, round_half_up, round_to_euro};
use crate::{FamilyStatus, IncomeTaxResult, RateTable, SocialContributionsBreakdown};

/// Fiscal parts without the single-parent half-part.
///
/// The first two children add half a part each, every further child a
/// full part. [`IncomeTaxCalculator::fiscal_parts`] is the variant used
/// for the actual tax computation and additionally grants the
/// single-parent half-part; the two disagree for single filers with
/// children.
///
/// ```
/// use rust_decimal_macros::dec;
/// use impots_core::FamilyStatus;
/// use impots_core::calculations::income_tax::compute_fiscal_parts;
///
/// assert_eq!(compute_fiscal_parts(FamilyStatus::Single, 1), dec!(1.5));
/// assert_eq!(compute_fiscal_parts(FamilyStatus::Couple, 3), dec!(4));
/// ```
pub fn compute_fiscal_parts(
    status: FamilyStatus,
    number_of_children: u32,
) -> Decimal {
    status.baseline_parts() + children_parts(number_of_children)
}

fn children_parts(number_of_children: u32) -> Decimal {
    let first_two = Decimal::from(number_of_children.min(2)) * Decimal::new(5, 1);
    let others = Decimal::from(number_of_children.saturating_sub(2));
    first_two + others
}

/// Splits a jointly computed household tax between two earners in
/// proportion to their net imposable.
///
/// This is a presentation convenience: a joint return owes one tax and
/// the law prescribes no split. A household with no net imposable
/// attributes the whole tax to the filer.
pub fn apportion_household_tax(
    individual_net_imposable: Decimal,
    household_net_imposable: Decimal,
    household_tax: Decimal,
) -> Decimal {
    let share = if household_net_imposable > Decimal::ZERO {
        individual_net_imposable / household_net_imposable
    } else {
        Decimal::ONE
    };
    round_to_euro(household_tax * share)
}

/// Calculator for the income tax of one filer.
#[derive(Debug, Clone, Copy)]
pub struct IncomeTaxCalculator<'a> {
    rates: &'a RateTable,
}

impl<'a> IncomeTaxCalculator<'a> {
    pub fn new(rates: &'a RateTable) -> Self {
        Self { rates }
    }

    /// Computes the filer's income tax.
    ///
    /// `partner_gross` only matters for couples; its contributions are
    /// computed here to derive the partner's net imposable.
    pub fn calculate(
        &self,
        gross: Decimal,
        contributions: &SocialContributionsBreakdown,
        status: FamilyStatus,
        number_of_children: u32,
        partner_gross: Decimal,
    ) -> IncomeTaxResult {
        let parts = Self::fiscal_parts(status, number_of_children);
        let has_partner = status == FamilyStatus::Couple && partner_gross > Decimal::ZERO;
        debug!(%gross, %partner_gross, %parts, has_partner, "computing income tax");

        let net_imposable = self.net_imposable(gross, contributions);
        let partner_net_imposable = if has_partner {
            let partner_contributions =
                SocialContributionsCalculator::new(self.rates).calculate(partner_gross);
            self.net_imposable(partner_gross, &partner_contributions)
        } else {
            Decimal::ZERO
        };
        let household_net_imposable = net_imposable + partner_net_imposable;

        let mut professional_deduction = self.professional_deduction(net_imposable);
        if has_partner {
            professional_deduction += self.professional_deduction(partner_net_imposable);
        }
        let taxable_income = max(household_net_imposable - professional_deduction, Decimal::ZERO);

        let per_part = progressive_tax(taxable_income / parts, &self.rates.income_tax_brackets);
        let provisional_tax = per_part.tax * parts;
        trace!(%taxable_income, tax_per_part = %per_part.tax, %provisional_tax, "progressive tax");

        let baseline = status.baseline_parts();
        let (capped_tax, quotient_familial_advantage, quotient_familial_capped) =
            self.apply_quotient_familial_cap(taxable_income, parts, baseline, provisional_tax);

        let household_tax = round_to_euro(max(capped_tax, Decimal::ZERO));

        let amount = if has_partner {
            if household_net_imposable <= Decimal::ZERO {
                warn!("household net imposable is zero, attributing whole tax to filer");
            }
            apportion_household_tax(net_imposable, household_net_imposable, household_tax)
        } else {
            household_tax
        };

        IncomeTaxResult {
            net_imposable,
            professional_deduction,
            taxable_income,
            parts,
            marginal_rate: per_part.marginal_rate,
            effective_rate: ratio(amount, net_imposable),
            amount,
            household_net_imposable,
            household_tax,
            quotient_familial_advantage: round_half_up(quotient_familial_advantage),
            quotient_familial_capped,
        }
    }

    /// Fiscal parts used by the tax computation.
    ///
    /// Same as [`compute_fiscal_parts`], plus half a part for a single
    /// filer with at least one child. Custody arrangements are not
    /// modelled: any single filer with a child gets the bonus.
    pub fn fiscal_parts(
        status: FamilyStatus,
        number_of_children: u32,
    ) -> Decimal {
        let single_parent = if status == FamilyStatus::Single && number_of_children >= 1 {
            Decimal::new(5, 1)
        } else {
            Decimal::ZERO
        };
        compute_fiscal_parts(status, number_of_children) + single_parent
    }

    /// Gross minus deductible contributions, floored at zero.
    pub fn net_imposable(
        &self,
        gross: Decimal,
        contributions: &SocialContributionsBreakdown,
    ) -> Decimal {
        max(round_half_up(gross - contributions.deductible()), Decimal::ZERO)
    }

    /// Flat-rate deduction clamped to the statutory floor and ceiling,
    /// never exceeding the income it is taken from. The ceiling wins over
    /// the floor on an inverted table.
    pub fn professional_deduction(
        &self,
        net_imposable: Decimal,
    ) -> Decimal {
        if net_imposable <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        let rule = &self.rates.professional_deduction;
        let deduction = max(net_imposable * rule.rate, rule.min).min(rule.max);
        round_half_up(deduction.min(net_imposable))
    }

    /// Limits the advantage from parts above `baseline` to
    /// `extra half-parts × cap`.
    ///
    /// Returns the (unrounded) tax after capping, the advantage retained
    /// and whether the cap bit.
    fn apply_quotient_familial_cap(
        &self,
        taxable_income: Decimal,
        parts: Decimal,
        baseline: Decimal,
        provisional_tax: Decimal,
    ) -> (Decimal, Decimal, bool) {
        if parts <= baseline {
            return (provisional_tax, Decimal::ZERO, false);
        }

        let extra_half_parts = (parts - baseline) * Decimal::TWO;
        let baseline_tax =
            progressive_tax(taxable_income / baseline, &self.rates.income_tax_brackets).tax
                * baseline;
        let advantage = baseline_tax - provisional_tax;
        let max_advantage = extra_half_parts * self.rates.quotient_familial_cap;

        if advantage > max_advantage {
            debug!(%advantage, %max_advantage, "quotient familial advantage capped");
            (baseline_tax - max_advantage, max_advantage, true)
        } else {
            (provisional_tax, advantage, false)
        }
    }
}
