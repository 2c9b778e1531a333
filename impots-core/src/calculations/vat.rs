//! Estimated VAT from disposable income.
//!
//! Part of net income is assumed saved; the rest is spent on goods whose
//! prices include VAT at one blended rate, so the tax is extracted as
//! `consumption × rate / (1 + rate)`.

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::round_half_up;
use crate::{EstimatedVatResult, VatConfig};

#[derive(Debug, Clone, Copy)]
pub struct VatCalculator<'a> {
    config: &'a VatConfig,
}

impl<'a> VatCalculator<'a> {
    pub fn new(config: &'a VatConfig) -> Self {
        Self { config }
    }

    pub fn calculate(
        &self,
        net_after_tax: Decimal,
    ) -> EstimatedVatResult {
        let effective_rate = self.config.effective_rate;

        if net_after_tax <= Decimal::ZERO {
            return EstimatedVatResult {
                net_after_tax,
                savings_rate: Decimal::ZERO,
                estimated_savings: Decimal::ZERO,
                estimated_consumption: Decimal::ZERO,
                effective_rate,
                amount: Decimal::ZERO,
            };
        }

        let savings_rate = self.savings_rate(net_after_tax);
        let estimated_savings = round_half_up(net_after_tax * savings_rate);
        let estimated_consumption = net_after_tax - estimated_savings;
        let amount = round_half_up(
            estimated_consumption * effective_rate / (Decimal::ONE + effective_rate),
        );
        debug!(%net_after_tax, %savings_rate, %amount, "estimated vat");

        EstimatedVatResult {
            net_after_tax,
            savings_rate,
            estimated_savings,
            estimated_consumption,
            effective_rate,
            amount,
        }
    }

    /// Rate of the first bracket whose threshold is open or not below
    /// `net`; the last bracket catches everything else.
    fn savings_rate(
        &self,
        net: Decimal,
    ) -> Decimal {
        let brackets = &self.config.savings_brackets;
        brackets
            .iter()
            .find(|b| b.max_net_annual.is_none_or(|max| net <= max))
            .or(brackets.last())
            .map_or(Decimal::ZERO, |b| b.rate)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::fixtures;

    #[test]
    fn zero_income_owes_no_vat() {
        let config = fixtures::rate_table().vat;

        let result = VatCalculator::new(&config).calculate(dec!(0));

        assert_eq!(result.amount, dec!(0));
        assert_eq!(result.estimated_consumption, dec!(0));
        assert_eq!(result.effective_rate, dec!(0.13));
    }

    #[test]
    fn savings_rate_uses_first_matching_threshold() {
        let config = fixtures::rate_table().vat;
        let calculator = VatCalculator::new(&config);

        assert_eq!(calculator.savings_rate(dec!(15000)), dec!(0));
        assert_eq!(calculator.savings_rate(dec!(15000.01)), dec!(0.05));
        assert_eq!(calculator.savings_rate(dec!(60000)), dec!(0.15));
        assert_eq!(calculator.savings_rate(dec!(2000000)), dec!(0.30));
    }

    #[test]
    fn calculate_extracts_price_inclusive_vat() {
        let config = fixtures::rate_table().vat;

        let result = VatCalculator::new(&config).calculate(dec!(27705.91));

        // savings 10 %: 2770.59; consumption 24935.32 × 0.13 / 1.13
        assert_eq!(result.savings_rate, dec!(0.10));
        assert_eq!(result.estimated_savings, dec!(2770.59));
        assert_eq!(result.estimated_consumption, dec!(24935.32));
        assert_eq!(result.amount, dec!(2868.67));
    }

    #[test]
    fn savings_plus_consumption_is_net() {
        let config = fixtures::rate_table().vat;
        let calculator = VatCalculator::new(&config);

        for net in [dec!(9999.99), dec!(24000.37), dec!(75000), dec!(321654.87)] {
            let result = calculator.calculate(net);
            assert_eq!(result.estimated_savings + result.estimated_consumption, net);
        }
    }

    #[test]
    fn missing_catch_all_falls_back_to_last_bracket() {
        let mut config = fixtures::rate_table().vat;
        config.savings_brackets.pop();

        let calculator = VatCalculator::new(&config);

        assert_eq!(calculator.savings_rate(dec!(500000)), dec!(0.20));
    }
}
