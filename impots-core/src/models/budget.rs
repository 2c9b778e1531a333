//! Budget tables and the sector → programme → action → sub-action tree
//! produced from them.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Allowed drift, in percentage points, for a level's percentages.
const PERCENT_TOLERANCE: Decimal = dec!(0.5);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BudgetTableError {
    #[error("budget table has no sectors")]
    NoSectors,

    #[error("duplicate sector id '{0}'")]
    DuplicateSector(String),

    #[error("percentages of {scope} sum to {sum}, expected 100")]
    PercentageSum { scope: String, sum: Decimal },

    #[error("percentage for {scope} is negative: {value}")]
    NegativePercentage { scope: String, value: Decimal },

    #[error("detail entry '{0}' does not match any sector")]
    OrphanDetail(String),

    #[error("sector '{sector}' refers to unknown equivalence unit '{unit}'")]
    UnknownEquivalence { sector: String, unit: String },

    #[error("no destination defined for bucket '{0}'")]
    MissingDestination(String),

    #[error("equivalence unit '{id}' has a non-positive price {price}")]
    InvalidUnitPrice { id: String, price: Decimal },
}

/// One row of the static sector table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorDefinition {
    pub id: String,
    pub name: String,
    /// Share of total public spending, social security included.
    pub percentage: Decimal,
    /// Share of the state budget alone, when the sector is state-funded.
    #[serde(default)]
    pub percentage_of_state_budget: Option<Decimal>,
    pub color: String,
    pub icon: String,
    pub description: String,
    #[serde(default)]
    pub includes_social_security: bool,
    /// Id of the reference unit used for the equivalence.
    #[serde(default)]
    pub equivalence: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SousActionDetail {
    pub code: String,
    pub name: String,
    pub percentage_of_action: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDetail {
    pub code: String,
    pub name: String,
    pub percentage_of_programme: Decimal,
    #[serde(default)]
    pub sous_actions: Vec<SousActionDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgrammeDetail {
    pub code: String,
    pub name: String,
    pub percentage_of_sector: Decimal,
    #[serde(default)]
    pub actions: Vec<ActionDetail>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorDetail {
    pub programmes: Vec<ProgrammeDetail>,
}

/// A relatable purchase ("a schoolbook", "a GP visit") and its price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquivalenceUnit {
    pub id: String,
    /// Plural label, e.g. "manuels scolaires".
    pub label: String,
    pub unit_price: Decimal,
}

/// Static tables driving the budget distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetTable {
    pub sectors: Vec<SectorDefinition>,
    /// Programme detail keyed by sector id; sectors may be absent.
    #[serde(default)]
    pub details: BTreeMap<String, SectorDetail>,
    #[serde(default)]
    pub equivalences: Vec<EquivalenceUnit>,
    /// Unit used when a sector names none, or names an unknown one.
    pub fallback_equivalence: EquivalenceUnit,
}

impl BudgetTable {
    pub fn detail(
        &self,
        sector_id: &str,
    ) -> Option<&SectorDetail> {
        self.details.get(sector_id)
    }

    /// Reference unit for a sector, falling back to the generic one.
    pub fn equivalence_for(
        &self,
        sector: &SectorDefinition,
    ) -> &EquivalenceUnit {
        sector
            .equivalence
            .as_deref()
            .and_then(|id| self.equivalences.iter().find(|u| u.id == id))
            .unwrap_or(&self.fallback_equivalence)
    }

    /// Checks percentage sums at every level, ids and unit prices.
    ///
    /// # Errors
    ///
    /// Returns the first [`BudgetTableError`] found.
    pub fn validate(&self) -> Result<(), BudgetTableError> {
        if self.sectors.is_empty() {
            return Err(BudgetTableError::NoSectors);
        }

        let mut seen = std::collections::HashSet::new();
        for sector in &self.sectors {
            if !seen.insert(sector.id.as_str()) {
                return Err(BudgetTableError::DuplicateSector(sector.id.clone()));
            }
        }

        check_sum(
            "sectors",
            self.sectors.iter().map(|s| s.percentage),
        )?;
        let state: Vec<Decimal> = self
            .sectors
            .iter()
            .filter_map(|s| s.percentage_of_state_budget)
            .collect();
        if !state.is_empty() {
            check_sum("state budget sectors", state)?;
        }

        for unit in self.equivalences.iter().chain([&self.fallback_equivalence]) {
            if unit.unit_price <= Decimal::ZERO {
                return Err(BudgetTableError::InvalidUnitPrice {
                    id: unit.id.clone(),
                    price: unit.unit_price,
                });
            }
        }
        for sector in &self.sectors {
            if let Some(unit) = &sector.equivalence {
                if !self.equivalences.iter().any(|u| &u.id == unit) {
                    return Err(BudgetTableError::UnknownEquivalence {
                        sector: sector.id.clone(),
                        unit: unit.clone(),
                    });
                }
            }
        }

        for (sector_id, detail) in &self.details {
            if !seen.contains(sector_id.as_str()) {
                return Err(BudgetTableError::OrphanDetail(sector_id.clone()));
            }
            validate_detail(sector_id, detail)?;
        }
        Ok(())
    }
}

fn validate_detail(
    sector_id: &str,
    detail: &SectorDetail,
) -> Result<(), BudgetTableError> {
    if detail.programmes.is_empty() {
        return Ok(());
    }
    check_sum(
        &format!("sector '{sector_id}'"),
        detail.programmes.iter().map(|p| p.percentage_of_sector),
    )?;

    for programme in &detail.programmes {
        if !programme.actions.is_empty() {
            check_sum(
                &format!("programme '{}'", programme.code),
                programme.actions.iter().map(|a| a.percentage_of_programme),
            )?;
        }
        for action in &programme.actions {
            if !action.sous_actions.is_empty() {
                check_sum(
                    &format!("action '{}'", action.code),
                    action.sous_actions.iter().map(|s| s.percentage_of_action),
                )?;
            }
        }
    }
    Ok(())
}

fn check_sum(
    scope: &str,
    values: impl IntoIterator<Item = Decimal>,
) -> Result<(), BudgetTableError> {
    let mut sum = Decimal::ZERO;
    for value in values {
        if value < Decimal::ZERO {
            return Err(BudgetTableError::NegativePercentage {
                scope: scope.to_string(),
                value,
            });
        }
        sum += value;
    }
    if (sum - Decimal::ONE_HUNDRED).abs() > PERCENT_TOLERANCE {
        return Err(BudgetTableError::PercentageSum {
            scope: scope.to_string(),
            sum,
        });
    }
    Ok(())
}

/// How many reference units an amount buys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equivalence {
    pub unit_id: String,
    pub label: String,
    pub unit_price: Decimal,
    pub quantity: Decimal,
    pub formatted: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetSousAction {
    pub code: String,
    pub name: String,
    pub amount: Decimal,
    pub percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetAction {
    pub code: String,
    pub name: String,
    pub amount: Decimal,
    pub percentage: Decimal,
    pub sous_actions: Vec<BudgetSousAction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetProgramme {
    pub code: String,
    pub name: String,
    pub amount: Decimal,
    pub percentage: Decimal,
    pub actions: Vec<BudgetAction>,
}

/// A sector's share of a tax amount, broken down to sub-actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetSector {
    pub id: String,
    pub name: String,
    pub amount: Decimal,
    pub percentage: Decimal,
    pub color: String,
    pub icon: String,
    pub description: String,
    pub includes_social_security: bool,
    pub programmes: Vec<BudgetProgramme>,
    pub equivalence: Equivalence,
}
