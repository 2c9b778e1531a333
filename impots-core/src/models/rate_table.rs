use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a rate table violates its structural invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RateTableError {
    /// The social-security ceiling must be strictly positive.
    #[error("social security ceiling must be positive, got {0}")]
    InvalidCeiling(Decimal),

    /// A rate must lie in [0, 1].
    #[error("rate for '{id}' must be between 0 and 1, got {rate}")]
    InvalidRate { id: String, rate: Decimal },

    /// A ceiling band must satisfy `0 <= from < to`.
    #[error("ceiling band for '{id}' must satisfy 0 <= from < to, got {from}..{to}")]
    InvalidBand { id: String, from: Decimal, to: Decimal },

    /// Two contribution rules share the same id.
    #[error("duplicate contribution rule '{0}'")]
    DuplicateRule(String),

    /// A bracket list was empty.
    #[error("bracket list '{0}' is empty")]
    EmptyBrackets(String),

    /// Brackets must start at zero, be contiguous and ascending.
    #[error("bracket list '{schedule}' has a gap or overlap at index {index}")]
    NonContiguousBrackets { schedule: String, index: usize },

    /// Only the last bracket may be open-ended, and it must be.
    #[error("bracket list '{0}' must end with exactly one open-ended bracket")]
    OpenBracketNotLast(String),

    /// Professional deduction floor must not exceed its ceiling.
    #[error("professional deduction minimum {min} exceeds maximum {max}")]
    InvalidProfessionalDeduction { min: Decimal, max: Decimal },

    /// A capped amount (quotient familial, flat tax, per-unit rate) was negative.
    #[error("amount '{id}' must be non-negative, got {amount}")]
    NegativeAmount { id: String, amount: Decimal },
}

/// How the base of a contribution line is derived from gross salary and
/// the social-security ceiling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContributionBase {
    /// Gross salary after the CSG abatement (see [`CsgAbatement`]).
    CsgBase,
    /// Whole gross salary, uncapped.
    Gross,
    /// `min(gross, ceiling)`, the "T1" band.
    CappedAtCeiling,
    /// `max(0, min(gross, to × ceiling) − from × ceiling)`, e.g. "T2" is 1..8.
    CeilingBand { from: Decimal, to: Decimal },
}

/// Subtotal a contribution line is reported under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionCategory {
    Retirement,
    CsgDeductible,
    CsgNonDeductible,
    Crds,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContributionRule {
    pub id: String,
    pub label: String,
    pub rate: Decimal,
    pub base: ContributionBase,
    pub category: ContributionCategory,
}

/// The 98.25 % CSG abatement, applied only to the slice of gross salary
/// below `ceiling_multiple` × ceiling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CsgAbatement {
    pub rate: Decimal,
    pub ceiling_multiple: Decimal,
}

/// One slice of a progressive schedule. `max = None` means unbounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaxBracket {
    pub min: Decimal,
    pub max: Option<Decimal>,
    pub rate: Decimal,
}

/// Flat-rate "frais professionnels" deduction, clamped to `[min, max]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfessionalDeduction {
    pub rate: Decimal,
    pub min: Decimal,
    pub max: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VatSavingsBracket {
    pub max_net_annual: Option<Decimal>,
    pub rate: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VatConfig {
    /// Blended VAT rate applied to price-inclusive consumption.
    pub effective_rate: Decimal,
    /// Savings rate by net annual income, ascending, last entry open-ended.
    pub savings_brackets: Vec<VatSavingsBracket>,
}

/// Versioned schedule of social contributions, income tax and VAT
/// estimation parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RateTable {
    pub year: i32,
    /// Plafond annuel de la sécurité sociale (PASS).
    pub ceiling: Decimal,
    pub csg_abatement: CsgAbatement,
    pub contributions: Vec<ContributionRule>,
    pub income_tax_brackets: Vec<TaxBracket>,
    pub professional_deduction: ProfessionalDeduction,
    /// Maximum tax advantage per extra half-part.
    pub quotient_familial_cap: Decimal,
    pub vat: VatConfig,
}

impl RateTable {
    /// Checks the structural invariants the calculators rely on.
    ///
    /// # Errors
    ///
    /// Returns the first [`RateTableError`] found.
    pub fn validate(&self) -> Result<(), RateTableError> {
        if self.ceiling <= Decimal::ZERO {
            return Err(RateTableError::InvalidCeiling(self.ceiling));
        }
        check_rate("csg_abatement", self.csg_abatement.rate)?;
        check_non_negative("csg_abatement.ceiling_multiple", self.csg_abatement.ceiling_multiple)?;

        let mut seen = std::collections::HashSet::new();
        for rule in &self.contributions {
            if !seen.insert(rule.id.as_str()) {
                return Err(RateTableError::DuplicateRule(rule.id.clone()));
            }
            check_rate(&rule.id, rule.rate)?;
            if let ContributionBase::CeilingBand { from, to } = rule.base {
                if from < Decimal::ZERO || from >= to {
                    return Err(RateTableError::InvalidBand {
                        id: rule.id.clone(),
                        from,
                        to,
                    });
                }
            }
        }

        validate_brackets("income_tax", &self.income_tax_brackets)?;

        let deduction = &self.professional_deduction;
        check_rate("professional_deduction", deduction.rate)?;
        if deduction.min > deduction.max {
            return Err(RateTableError::InvalidProfessionalDeduction {
                min: deduction.min,
                max: deduction.max,
            });
        }
        check_non_negative("quotient_familial_cap", self.quotient_familial_cap)?;

        check_rate("vat.effective_rate", self.vat.effective_rate)?;
        validate_savings_brackets(&self.vat.savings_brackets)
    }
}

pub(crate) fn check_rate(
    id: &str,
    rate: Decimal,
) -> Result<(), RateTableError> {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(RateTableError::InvalidRate {
            id: id.to_string(),
            rate,
        });
    }
    Ok(())
}

pub(crate) fn check_non_negative(
    id: &str,
    amount: Decimal,
) -> Result<(), RateTableError> {
    if amount < Decimal::ZERO {
        return Err(RateTableError::NegativeAmount {
            id: id.to_string(),
            amount,
        });
    }
    Ok(())
}

/// Brackets must start at 0, chain `max == next.min`, and end open.
pub(crate) fn validate_brackets(
    schedule: &str,
    brackets: &[TaxBracket],
) -> Result<(), RateTableError> {
    let Some(first) = brackets.first() else {
        return Err(RateTableError::EmptyBrackets(schedule.to_string()));
    };
    if first.min != Decimal::ZERO {
        return Err(RateTableError::NonContiguousBrackets {
            schedule: schedule.to_string(),
            index: 0,
        });
    }

    for (index, bracket) in brackets.iter().enumerate() {
        check_rate(schedule, bracket.rate)?;
        let is_last = index + 1 == brackets.len();
        match (bracket.max, is_last) {
            (None, true) => {}
            (None, false) | (Some(_), true) => {
                return Err(RateTableError::OpenBracketNotLast(schedule.to_string()));
            }
            (Some(max), false) => {
                if max <= bracket.min || brackets[index + 1].min != max {
                    return Err(RateTableError::NonContiguousBrackets {
                        schedule: schedule.to_string(),
                        index: index + 1,
                    });
                }
            }
        }
    }
    Ok(())
}

fn validate_savings_brackets(brackets: &[VatSavingsBracket]) -> Result<(), RateTableError> {
    let schedule = "vat.savings_brackets";
    if brackets.is_empty() {
        return Err(RateTableError::EmptyBrackets(schedule.to_string()));
    }

    let mut previous: Option<Decimal> = None;
    for (index, bracket) in brackets.iter().enumerate() {
        check_rate(schedule, bracket.rate)?;
        let is_last = index + 1 == brackets.len();
        match (bracket.max_net_annual, is_last) {
            (None, true) => {}
            (None, false) | (Some(_), true) => {
                return Err(RateTableError::OpenBracketNotLast(schedule.to_string()));
            }
            (Some(max), false) => {
                if previous.is_some_and(|p| max <= p) {
                    return Err(RateTableError::NonContiguousBrackets {
                        schedule: schedule.to_string(),
                        index,
                    });
                }
                previous = Some(max);
            }
        }
    }
    Ok(())
}
