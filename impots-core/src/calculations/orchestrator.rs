//! Full pipeline for one filer or one household.
//!
//! gross → contributions → net imposable → income tax → net take-home →
//! VAT → totals → budget allocation.

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::ratio;
use crate::{
    BudgetDistributor, BudgetSector, DestinationCalculator, FamilyStatus, IncomeTaxCalculator,
    IncomeTaxResult, SocialContributionsBreakdown, SocialContributionsCalculator, TaxResult,
    TaxTables, UserInput, VatCalculator,
};

/// Runs every calculator against one set of tables.
#[derive(Debug, Clone, Copy)]
pub struct TaxEngine<'a> {
    tables: &'a TaxTables,
}

impl<'a> TaxEngine<'a> {
    pub fn new(tables: &'a TaxTables) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &'a TaxTables {
        self.tables
    }

    /// Computes the filer's own burden.
    ///
    /// Contributions are taken on the filer's salary only; a partner's
    /// salary just shapes the shared income tax and the filer's share of
    /// it.
    pub fn calculate_taxes(
        &self,
        input: &UserInput,
    ) -> TaxResult {
        let gross = input.gross_annual_salary;
        debug!(
            %gross,
            status = input.family_status.as_str(),
            children = input.number_of_children,
            "calculating taxes"
        );

        let contributions = SocialContributionsCalculator::new(&self.tables.rates).calculate(gross);
        let income_tax = IncomeTaxCalculator::new(&self.tables.rates).calculate(
            gross,
            &contributions,
            input.family_status,
            input.number_of_children,
            input.effective_partner_salary(),
        );

        self.assemble(input, gross, contributions, income_tax)
    }

    /// Computes the household's combined burden.
    ///
    /// Only differs from [`Self::calculate_taxes`] for a couple with partner
    /// income: contributions are summed, the joint income tax is owed in
    /// full and VAT is estimated on the combined take-home pay.
    pub fn calculate_household_taxes(
        &self,
        input: &UserInput,
    ) -> TaxResult {
        if !input.has_partner_income() {
            return self.calculate_taxes(input);
        }
        let gross = input.gross_annual_salary;
        let partner_gross = input.partner_gross_annual_salary;
        debug!(
            %gross,
            %partner_gross,
            children = input.number_of_children,
            "calculating household taxes"
        );

        let social = SocialContributionsCalculator::new(&self.tables.rates);
        let own = social.calculate(gross);
        let partner = social.calculate(partner_gross);

        let income_tax = IncomeTaxCalculator::new(&self.tables.rates)
            .calculate(gross, &own, FamilyStatus::Couple, input.number_of_children, partner_gross)
            .for_household();

        self.assemble(input, gross + partner_gross, own.combine(&partner), income_tax)
    }

    /// Spreads the state-funded part of a result (income tax and VAT) over
    /// the state budget.
    pub fn state_budget_allocation(
        &self,
        result: &TaxResult,
    ) -> Vec<BudgetSector> {
        let state_total = result.income_tax.amount + result.estimated_vat.amount;
        BudgetDistributor::new(&self.tables.budget).calculate_state_budget(state_total)
    }

    fn assemble(
        &self,
        input: &UserInput,
        gross_income: Decimal,
        social_contributions: SocialContributionsBreakdown,
        income_tax: IncomeTaxResult,
    ) -> TaxResult {
        let direct_taxes = social_contributions.total + income_tax.amount;
        let net_take_home = gross_income - direct_taxes;
        let estimated_vat = VatCalculator::new(&self.tables.rates.vat).calculate(net_take_home);
        let total_taxes = direct_taxes + estimated_vat.amount;

        debug!(%gross_income, %direct_taxes, %net_take_home, %total_taxes, "taxes assembled");

        let cotisation_destinations = DestinationCalculator::new(&self.tables.destinations)
            .calculate(gross_income, &social_contributions);
        let budget_allocation = BudgetDistributor::new(&self.tables.budget).calculate(total_taxes);

        TaxResult {
            input: input.clone(),
            gross_income,
            social_contributions,
            cotisation_destinations,
            income_tax,
            estimated_vat,
            direct_taxes,
            total_taxes,
            net_take_home,
            direct_tax_rate: ratio(direct_taxes, gross_income),
            overall_tax_rate: ratio(total_taxes, gross_income),
            budget_allocation,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::fixtures;

    // =========================================================================
    // calculate_taxes tests
    // =========================================================================

    #[test]
    fn calculate_taxes_35000_single() {
        let tables = fixtures::tax_tables();

        let result = TaxEngine::new(&tables).calculate_taxes(&UserInput::single(dec!(35000)));

        assert_eq!(result.social_contributions.total, dec!(7294.09));
        assert_eq!(result.income_tax.amount, dec!(1566));
        assert_eq!(result.income_tax.marginal_rate, dec!(0.11));
        assert_eq!(result.direct_taxes, dec!(8860.09));
        assert_eq!(result.net_take_home, dec!(26139.91));
        assert_eq!(result.estimated_vat.net_after_tax, dec!(26139.91));
        assert_eq!(result.gross_income, dec!(35000));
    }

    #[test]
    fn calculate_taxes_conservation() {
        let tables = fixtures::tax_tables();
        let engine = TaxEngine::new(&tables);

        for gross in [dec!(12000), dec!(35000), dec!(80000), dec!(250000)] {
            let result = engine.calculate_taxes(&UserInput::couple(gross, dec!(20000)).with_children(2));

            assert_eq!(
                result.direct_taxes,
                result.social_contributions.total + result.income_tax.amount
            );
            assert_eq!(result.total_taxes, result.direct_taxes + result.estimated_vat.amount);
            assert_eq!(result.net_take_home, gross - result.direct_taxes);
            assert!(result.net_take_home > dec!(0) && result.net_take_home < gross);
        }
    }

    #[test]
    fn calculate_taxes_is_deterministic() {
        let tables = fixtures::tax_tables();
        let engine = TaxEngine::new(&tables);
        let input = UserInput::couple(dec!(54321.99), dec!(23456.78)).with_children(3);

        assert_eq!(engine.calculate_taxes(&input), engine.calculate_taxes(&input));
    }

    #[test]
    fn calculate_taxes_contributions_ignore_partner() {
        let tables = fixtures::tax_tables();
        let engine = TaxEngine::new(&tables);

        let alone = engine.calculate_taxes(&UserInput::single(dec!(45000)));
        let paired = engine.calculate_taxes(&UserInput::couple(dec!(45000), dec!(60000)).with_children(1));

        assert_eq!(alone.social_contributions, paired.social_contributions);
        assert_eq!(paired.gross_income, dec!(45000));
    }

    #[test]
    fn calculate_taxes_budget_distributes_total() {
        let tables = fixtures::tax_tables();

        let result = TaxEngine::new(&tables).calculate_taxes(&UserInput::single(dec!(35000)));

        let sum: Decimal = result.budget_allocation.iter().map(|s| s.amount).sum();
        assert!((sum - result.total_taxes).abs() <= dec!(0.05));
        assert_eq!(result.cotisation_destinations.len(), 4);
    }

    #[test]
    fn calculate_taxes_zero_salary() {
        let tables = fixtures::tax_tables();

        let result = TaxEngine::new(&tables).calculate_taxes(&UserInput::single(dec!(0)));

        assert_eq!(result.total_taxes, dec!(0));
        assert_eq!(result.direct_tax_rate, dec!(0));
        assert_eq!(result.overall_tax_rate, dec!(0));
    }

    // =========================================================================
    // calculate_household_taxes tests
    // =========================================================================

    #[test]
    fn household_delegates_without_partner_income() {
        let tables = fixtures::tax_tables();
        let engine = TaxEngine::new(&tables);
        let input = UserInput::couple(dec!(50000), dec!(0)).with_children(2);

        assert_eq!(engine.calculate_household_taxes(&input), engine.calculate_taxes(&input));
    }

    #[test]
    fn household_combines_both_earners() {
        let tables = fixtures::tax_tables();
        let engine = TaxEngine::new(&tables);
        let input = UserInput::couple(dec!(50000), dec!(30000)).with_children(1);

        let household = engine.calculate_household_taxes(&input);
        let individual = engine.calculate_taxes(&input);
        let partner_contributions =
            SocialContributionsCalculator::new(&tables.rates).calculate(dec!(30000));

        assert_eq!(household.gross_income, dec!(80000));
        assert_eq!(
            household.social_contributions.total,
            individual.social_contributions.total + partner_contributions.total
        );
        assert_eq!(household.income_tax.amount, individual.income_tax.household_tax);
        assert_eq!(household.net_take_home, dec!(80000) - household.direct_taxes);
    }

    // =========================================================================
    // state_budget_allocation tests
    // =========================================================================

    #[test]
    fn state_budget_allocation_uses_income_tax_and_vat() {
        let tables = fixtures::tax_tables();
        let engine = TaxEngine::new(&tables);
        let result = engine.calculate_taxes(&UserInput::single(dec!(60000)));

        let sectors = engine.state_budget_allocation(&result);

        let sum: Decimal = sectors.iter().map(|s| s.amount).sum();
        let state_total = result.income_tax.amount + result.estimated_vat.amount;
        assert!((sum - state_total).abs() <= dec!(0.02));
        assert!(sectors.iter().all(|s| !s.includes_social_security));
    }
}
