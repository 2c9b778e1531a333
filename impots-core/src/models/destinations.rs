use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{BudgetTableError, Equivalence, EquivalenceUnit};

/// End use a contribution euro is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DestinationBucket {
    Pension,
    Health,
    FamilyAutonomy,
    SocialDebt,
}

impl DestinationBucket {
    pub const ALL: [DestinationBucket; 4] = [
        Self::Pension,
        Self::Health,
        Self::FamilyAutonomy,
        Self::SocialDebt,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pension => "pension",
            Self::Health => "health",
            Self::FamilyAutonomy => "family_autonomy",
            Self::SocialDebt => "social_debt",
        }
    }
}

/// Share of total CSG received by one organism.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsgShare {
    pub organism: String,
    pub label: String,
    pub percentage: Decimal,
    pub bucket: DestinationBucket,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationDefinition {
    pub bucket: DestinationBucket,
    pub label: String,
    pub description: String,
    pub color: String,
    pub unit: EquivalenceUnit,
}

/// CSG repartition by recipient organism and per-bucket presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationTable {
    pub csg_repartition: Vec<CsgShare>,
    pub destinations: Vec<DestinationDefinition>,
}

impl DestinationTable {
    pub fn definition(
        &self,
        bucket: DestinationBucket,
    ) -> Option<&DestinationDefinition> {
        self.destinations.iter().find(|d| d.bucket == bucket)
    }

    /// # Errors
    ///
    /// Fails when the CSG shares do not sum to 100 (±0.5), a bucket has no
    /// definition, or a unit price is not positive.
    pub fn validate(&self) -> Result<(), BudgetTableError> {
        let sum: Decimal = self.csg_repartition.iter().map(|s| s.percentage).sum();
        if (sum - Decimal::ONE_HUNDRED).abs() > dec!(0.5) {
            return Err(BudgetTableError::PercentageSum {
                scope: "csg repartition".to_string(),
                sum,
            });
        }

        for bucket in DestinationBucket::ALL {
            let Some(definition) = self.definition(bucket) else {
                return Err(BudgetTableError::MissingDestination(
                    bucket.as_str().to_string(),
                ));
            };
            if definition.unit.unit_price <= Decimal::ZERO {
                return Err(BudgetTableError::InvalidUnitPrice {
                    id: definition.unit.id.clone(),
                    price: definition.unit.unit_price,
                });
            }
        }
        Ok(())
    }
}

/// Contributions attributed to one end use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CotisationDestination {
    pub bucket: DestinationBucket,
    pub label: String,
    pub description: String,
    pub color: String,
    pub amount: Decimal,
    /// Share of total contributions, in percent.
    pub percentage: Decimal,
    /// Share of gross salary, in percent.
    pub share_of_gross: Decimal,
    pub equivalence: Equivalence,
}
