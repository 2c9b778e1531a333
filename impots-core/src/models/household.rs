use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Largest annual amount (salary, habit count, property tax) accepted
/// from user input. Calculators assume their inputs stay below it.
pub const MAX_ANNUAL_AMOUNT: Decimal = dec!(1000000000000);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FamilyStatus {
    #[default]
    Single,
    Couple,
}

impl FamilyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Couple => "couple",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "single" => Some(Self::Single),
            "couple" => Some(Self::Couple),
            _ => None,
        }
    }

    /// Fiscal parts of the household before any child is counted.
    pub fn baseline_parts(&self) -> Decimal {
        match self {
            Self::Single => Decimal::ONE,
            Self::Couple => Decimal::TWO,
        }
    }
}

/// Declarative inputs for one filer (and optionally their partner).
///
/// `partner_gross_annual_salary` is ignored unless `family_status` is
/// [`FamilyStatus::Couple`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInput {
    pub gross_annual_salary: Decimal,
    pub family_status: FamilyStatus,
    pub number_of_children: u32,
    #[serde(default)]
    pub partner_gross_annual_salary: Decimal,
}

impl UserInput {
    pub fn single(gross_annual_salary: Decimal) -> Self {
        Self {
            gross_annual_salary,
            family_status: FamilyStatus::Single,
            number_of_children: 0,
            partner_gross_annual_salary: Decimal::ZERO,
        }
    }

    pub fn couple(
        gross_annual_salary: Decimal,
        partner_gross_annual_salary: Decimal,
    ) -> Self {
        Self {
            gross_annual_salary,
            family_status: FamilyStatus::Couple,
            number_of_children: 0,
            partner_gross_annual_salary,
        }
    }

    pub fn with_children(
        mut self,
        number_of_children: u32,
    ) -> Self {
        self.number_of_children = number_of_children;
        self
    }

    /// Partner salary that actually takes part in the computation.
    pub fn effective_partner_salary(&self) -> Decimal {
        match self.family_status {
            FamilyStatus::Couple if self.partner_gross_annual_salary > Decimal::ZERO => {
                self.partner_gross_annual_salary
            }
            _ => Decimal::ZERO,
        }
    }

    pub fn has_partner_income(&self) -> bool {
        self.effective_partner_salary() > Decimal::ZERO
    }
}
