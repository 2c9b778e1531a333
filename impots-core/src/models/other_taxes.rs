use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::rate_table::{check_non_negative, validate_brackets};
use super::{FamilyStatus, RateTableError, TaxBracket};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    None,
    Citadine,
    #[default]
    Berline,
    Suv,
    Electrique,
}

impl VehicleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Citadine => "citadine",
            Self::Berline => "berline",
            Self::Suv => "suv",
            Self::Electrique => "electrique",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "none" => Some(Self::None),
            "citadine" => Some(Self::Citadine),
            "berline" => Some(Self::Berline),
            "suv" => Some(Self::Suv),
            "electrique" => Some(Self::Electrique),
            _ => None,
        }
    }
}

/// Lifestyle inputs for excise and local taxes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OtherTaxInputs {
    pub vehicle: VehicleType,
    pub km_per_year: u32,
    pub packs_per_week: Decimal,
    pub drinks_per_week: Decimal,
    pub is_owner: bool,
    pub property_tax: Decimal,
}

impl Default for OtherTaxInputs {
    fn default() -> Self {
        Self {
            vehicle: VehicleType::Berline,
            km_per_year: 12_200,
            packs_per_week: Decimal::ZERO,
            drinks_per_week: Decimal::ZERO,
            is_owner: false,
            property_tax: Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VehiclePreset {
    pub vehicle: VehicleType,
    pub liters_per_100km: Decimal,
}

/// High-income surtax brackets, by family status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CehrSchedule {
    pub single: Vec<TaxBracket>,
    pub couple: Vec<TaxBracket>,
}

impl CehrSchedule {
    pub fn brackets(
        &self,
        status: FamilyStatus,
    ) -> &[TaxBracket] {
        match status {
            FamilyStatus::Single => &self.single,
            FamilyStatus::Couple => &self.couple,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OtherTaxRates {
    /// TICPE per liter of fuel.
    pub ticpe_per_liter: Decimal,
    pub vehicles: Vec<VehiclePreset>,
    /// National average insurance tax (TSCA) per household.
    pub tsca: Decimal,
    pub tobacco_per_pack: Decimal,
    pub alcohol_per_drink: Decimal,
    pub cehr: CehrSchedule,
}

impl OtherTaxRates {
    /// # Errors
    ///
    /// Fails on negative per-unit amounts or malformed CEHR brackets.
    pub fn validate(&self) -> Result<(), RateTableError> {
        check_non_negative("ticpe_per_liter", self.ticpe_per_liter)?;
        check_non_negative("tsca", self.tsca)?;
        check_non_negative("tobacco_per_pack", self.tobacco_per_pack)?;
        check_non_negative("alcohol_per_drink", self.alcohol_per_drink)?;
        for preset in &self.vehicles {
            check_non_negative(preset.vehicle.as_str(), preset.liters_per_100km)?;
        }
        validate_brackets("cehr.single", &self.cehr.single)?;
        validate_brackets("cehr.couple", &self.cehr.couple)
    }
}

/// Every levy that can appear in the tax donut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevyKind {
    SocialContributions,
    IncomeTax,
    Vat,
    Ticpe,
    Tsca,
    Tobacco,
    Alcohol,
    PropertyTax,
    Cehr,
}

impl LevyKind {
    pub fn id(&self) -> &'static str {
        match self {
            Self::SocialContributions => "cotisations",
            Self::IncomeTax => "impot_revenu",
            Self::Vat => "tva",
            Self::Ticpe => "ticpe",
            Self::Tsca => "tsca",
            Self::Tobacco => "tabac",
            Self::Alcohol => "alcool",
            Self::PropertyTax => "taxe_fonciere",
            Self::Cehr => "cehr",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::SocialContributions => "Cotisations sociales",
            Self::IncomeTax => "Impôt sur le revenu",
            Self::Vat => "TVA",
            Self::Ticpe => "TICPE (carburant)",
            Self::Tsca => "Taxe sur les assurances",
            Self::Tobacco => "Droits sur le tabac",
            Self::Alcohol => "Droits sur l'alcool",
            Self::PropertyTax => "Taxe foncière",
            Self::Cehr => "Contribution exceptionnelle sur les hauts revenus",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Self::SocialContributions => "#3b82f6",
            Self::IncomeTax => "#ef4444",
            Self::Vat => "#f59e0b",
            Self::Ticpe => "#8b5cf6",
            Self::Tsca => "#06b6d4",
            Self::Tobacco => "#78716c",
            Self::Alcohol => "#ec4899",
            Self::PropertyTax => "#10b981",
            Self::Cehr => "#dc2626",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxEntry {
    pub kind: LevyKind,
    pub amount: Decimal,
    /// Short human explanation of how the amount was obtained.
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonutSegment {
    pub id: String,
    pub label: String,
    pub amount: Decimal,
    pub color: String,
}

impl DonutSegment {
    pub fn new(
        kind: LevyKind,
        amount: Decimal,
    ) -> Self {
        Self {
            id: kind.id().to_string(),
            label: kind.label().to_string(),
            amount,
            color: kind.color().to_string(),
        }
    }
}

/// Excise and local taxes alongside the primary pipeline's total.
///
/// Fuel excise and insurance tax are always present; the other levies are
/// `None` unless strictly positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtherTaxesResult {
    pub ticpe: TaxEntry,
    pub tsca: TaxEntry,
    pub tobacco: Option<TaxEntry>,
    pub alcohol: Option<TaxEntry>,
    pub property_tax: Option<TaxEntry>,
    pub cehr: Option<TaxEntry>,
    pub total_other_taxes: Decimal,
    pub grand_total: Decimal,
    /// Non-zero segments only.
    pub donut_segments: Vec<DonutSegment>,
}

impl OtherTaxesResult {
    /// Included entries in display order.
    pub fn entries(&self) -> impl Iterator<Item = &TaxEntry> {
        [Some(&self.ticpe), Some(&self.tsca)]
            .into_iter()
            .chain([
                self.tobacco.as_ref(),
                self.alcohol.as_ref(),
                self.property_tax.as_ref(),
                self.cehr.as_ref(),
            ])
            .flatten()
    }

    /// Share of the grand total taken by these levies, in percent.
    pub fn share_of_grand_total(&self) -> Decimal {
        if self.grand_total > Decimal::ZERO {
            (self.total_other_taxes / self.grand_total * dec!(100)).round_dp(2)
        } else {
            Decimal::ZERO
        }
    }
}
