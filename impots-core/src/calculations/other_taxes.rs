//! Excise and local taxes driven by lifestyle rather than salary.
//!
//! | Levy          | Formula |
//! |---------------|---------|
//! | TICPE         | `km × L/100km / 100 × €/L` |
//! | TSCA          | national average per household |
//! | Tobacco       | `packs/week × 52 × €/pack` |
//! | Alcohol       | `drinks/week × 52 × €/drink` |
//! | Property tax  | user amount, owners only |
//! | CEHR          | progressive on household net imposable, by family status |

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, warn};

use crate::calculations::common::{progressive_tax, round_half_up};
use crate::{
    DonutSegment, FamilyStatus, LevyKind, OtherTaxInputs, OtherTaxRates, OtherTaxesResult,
    TaxEntry, TaxResult, VehicleType,
};

const WEEKS_PER_YEAR: Decimal = dec!(52);

#[derive(Debug, Clone, Copy)]
pub struct OtherTaxesCalculator<'a> {
    rates: &'a OtherTaxRates,
}

impl<'a> OtherTaxesCalculator<'a> {
    pub fn new(rates: &'a OtherTaxRates) -> Self {
        Self { rates }
    }

    /// Adds the lifestyle levies to a primary result.
    ///
    /// Fuel excise and insurance tax are always reported; the rest only
    /// when strictly positive.
    pub fn calculate(
        &self,
        tax_result: &TaxResult,
        inputs: &OtherTaxInputs,
    ) -> OtherTaxesResult {
        debug!(
            vehicle = inputs.vehicle.as_str(),
            km = inputs.km_per_year,
            packs = %inputs.packs_per_week,
            drinks = %inputs.drinks_per_week,
            is_owner = inputs.is_owner,
            "computing other taxes"
        );

        let ticpe = TaxEntry {
            kind: LevyKind::Ticpe,
            amount: self.ticpe(inputs.vehicle, inputs.km_per_year),
            detail: format!("{} km/an en {}", inputs.km_per_year, inputs.vehicle.as_str()),
        };
        let tsca = TaxEntry {
            kind: LevyKind::Tsca,
            amount: self.tsca(),
            detail: "moyenne nationale par foyer".to_string(),
        };
        let tobacco = present(
            LevyKind::Tobacco,
            self.tobacco(inputs.packs_per_week),
            format!("{} paquets/semaine", inputs.packs_per_week.normalize()),
        );
        let alcohol = present(
            LevyKind::Alcohol,
            self.alcohol(inputs.drinks_per_week),
            format!("{} verres/semaine", inputs.drinks_per_week.normalize()),
        );
        let property_tax = present(
            LevyKind::PropertyTax,
            self.property_tax(inputs.is_owner, inputs.property_tax),
            "montant déclaré".to_string(),
        );
        let household_income = tax_result.income_tax.household_net_imposable;
        let cehr = present(
            LevyKind::Cehr,
            self.cehr(household_income, tax_result.input.family_status),
            format!("revenu fiscal de référence {}", household_income.normalize()),
        );

        let mut result = OtherTaxesResult {
            ticpe,
            tsca,
            tobacco,
            alcohol,
            property_tax,
            cehr,
            total_other_taxes: Decimal::ZERO,
            grand_total: Decimal::ZERO,
            donut_segments: Vec::new(),
        };
        result.total_other_taxes = result.entries().map(|e| e.amount).sum();
        result.grand_total = tax_result.total_taxes + result.total_other_taxes;
        result.donut_segments = donut_segments(tax_result, &result);
        result
    }

    /// Fuel excise for a year of driving. Vehicles without a preset burn
    /// nothing.
    pub fn ticpe(
        &self,
        vehicle: VehicleType,
        km_per_year: u32,
    ) -> Decimal {
        let Some(preset) = self.rates.vehicles.iter().find(|p| p.vehicle == vehicle) else {
            warn!(vehicle = vehicle.as_str(), "no consumption preset for vehicle");
            return Decimal::ZERO;
        };
        let liters = Decimal::from(km_per_year) * preset.liters_per_100km / Decimal::ONE_HUNDRED;
        round_half_up(liters * self.rates.ticpe_per_liter)
    }

    pub fn tsca(&self) -> Decimal {
        self.rates.tsca
    }

    pub fn tobacco(
        &self,
        packs_per_week: Decimal,
    ) -> Decimal {
        weekly_excise(packs_per_week, self.rates.tobacco_per_pack)
    }

    pub fn alcohol(
        &self,
        drinks_per_week: Decimal,
    ) -> Decimal {
        weekly_excise(drinks_per_week, self.rates.alcohol_per_drink)
    }

    pub fn property_tax(
        &self,
        is_owner: bool,
        amount: Decimal,
    ) -> Decimal {
        if is_owner && amount > Decimal::ZERO {
            round_half_up(amount)
        } else {
            Decimal::ZERO
        }
    }

    /// High-income surtax on the household's net imposable.
    pub fn cehr(
        &self,
        household_income: Decimal,
        status: FamilyStatus,
    ) -> Decimal {
        let brackets = self.rates.cehr.brackets(status);
        round_half_up(progressive_tax(household_income, brackets).tax)
    }
}

fn weekly_excise(
    units_per_week: Decimal,
    rate: Decimal,
) -> Decimal {
    if units_per_week <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    round_half_up(units_per_week * WEEKS_PER_YEAR * rate)
}

fn present(
    kind: LevyKind,
    amount: Decimal,
    detail: String,
) -> Option<TaxEntry> {
    (amount > Decimal::ZERO).then_some(TaxEntry { kind, amount, detail })
}

fn donut_segments(
    tax_result: &TaxResult,
    other: &OtherTaxesResult,
) -> Vec<DonutSegment> {
    [
        (LevyKind::SocialContributions, tax_result.social_contributions.total),
        (LevyKind::IncomeTax, tax_result.income_tax.amount),
        (LevyKind::Vat, tax_result.estimated_vat.amount),
    ]
    .into_iter()
    .chain(other.entries().map(|e| (e.kind, e.amount)))
    .filter(|(_, amount)| *amount > Decimal::ZERO)
    .map(|(kind, amount)| DonutSegment::new(kind, amount))
    .collect()
}
