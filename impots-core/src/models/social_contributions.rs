use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ContributionCategory;

/// One itemized employee contribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionLine {
    pub id: String,
    pub label: String,
    pub rate: Decimal,
    pub base: Decimal,
    pub amount: Decimal,
    pub category: ContributionCategory,
}

/// Employee social contributions computed from one gross salary.
///
/// `total` always equals the sum of `lines[..].amount`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialContributionsBreakdown {
    pub total: Decimal,
    /// Basic pension plus complementary retirement lines.
    pub retirement: Decimal,
    /// CSG attributed to health (deductible + non-deductible).
    pub health: Decimal,
    pub csg_deductible: Decimal,
    pub csg_non_deductible: Decimal,
    pub crds: Decimal,
    /// Base shared by the CSG and CRDS lines.
    pub csg_base: Decimal,
    pub lines: Vec<ContributionLine>,
}

impl SocialContributionsBreakdown {
    /// Contributions that reduce the income-tax base: everything except
    /// CRDS and the non-deductible CSG.
    pub fn deductible(&self) -> Decimal {
        self.total - self.csg_non_deductible - self.crds
    }

    /// Sums two breakdowns line by line, matching lines by id.
    ///
    /// Lines present only in `other` are appended in their original order.
    pub fn combine(
        &self,
        other: &Self,
    ) -> Self {
        let mut lines = self.lines.clone();
        for line in &other.lines {
            match lines.iter_mut().find(|l| l.id == line.id) {
                Some(existing) => {
                    existing.base += line.base;
                    existing.amount += line.amount;
                }
                None => lines.push(line.clone()),
            }
        }

        Self {
            total: self.total + other.total,
            retirement: self.retirement + other.retirement,
            health: self.health + other.health,
            csg_deductible: self.csg_deductible + other.csg_deductible,
            csg_non_deductible: self.csg_non_deductible + other.csg_non_deductible,
            crds: self.crds + other.crds,
            csg_base: self.csg_base + other.csg_base,
            lines,
        }
    }
}
