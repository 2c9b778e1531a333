//! Spreads a tax amount over public spending.
//!
//! Each level takes its parent's amount times its own percentage:
//!
//! ```text
//! sector     = total     × percentage            / 100
//! programme  = sector    × percentage_of_sector    / 100
//! action     = programme × percentage_of_programme / 100
//! sous-action = action   × percentage_of_action    / 100
//! ```
//!
//! Every amount is rounded to the cent, so children may drift from their
//! parent by a few cents.

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::{percentage_of, round_half_up};
use crate::calculations::equivalence::equivalence;
use crate::{
    ActionDetail, BudgetAction, BudgetProgramme, BudgetSector, BudgetSousAction, BudgetTable,
    ProgrammeDetail, SectorDefinition,
};

#[derive(Debug, Clone, Copy)]
pub struct BudgetDistributor<'a> {
    table: &'a BudgetTable,
}

impl<'a> BudgetDistributor<'a> {
    pub fn new(table: &'a BudgetTable) -> Self {
        Self { table }
    }

    /// Distributes `total` over every sector by its share of all public
    /// spending.
    pub fn calculate(
        &self,
        total: Decimal,
    ) -> Vec<BudgetSector> {
        debug!(%total, sectors = self.table.sectors.len(), "distributing budget");
        self.table
            .sectors
            .iter()
            .map(|sector| self.sector(sector, total, sector.percentage, sector.includes_social_security))
            .collect()
    }

    /// Distributes the state-funded part of the tax (income tax and VAT)
    /// over the sectors that carry a state-budget share.
    ///
    /// Social-security sectors are left out and no sector is flagged as
    /// including social security.
    pub fn calculate_state_budget(
        &self,
        state_total: Decimal,
    ) -> Vec<BudgetSector> {
        debug!(%state_total, "distributing state budget");
        self.table
            .sectors
            .iter()
            .filter_map(|sector| {
                sector
                    .percentage_of_state_budget
                    .map(|percentage| self.sector(sector, state_total, percentage, false))
            })
            .collect()
    }

    fn sector(
        &self,
        definition: &SectorDefinition,
        total: Decimal,
        percentage: Decimal,
        includes_social_security: bool,
    ) -> BudgetSector {
        let amount = round_half_up(percentage_of(total, percentage));

        let programmes = match self.table.detail(&definition.id) {
            Some(detail) => detail
                .programmes
                .iter()
                .map(|programme| Self::programme(programme, amount))
                .collect(),
            None => {
                debug!(sector = %definition.id, "no programme detail");
                Vec::new()
            }
        };

        BudgetSector {
            id: definition.id.clone(),
            name: definition.name.clone(),
            amount,
            percentage,
            color: definition.color.clone(),
            icon: definition.icon.clone(),
            description: definition.description.clone(),
            includes_social_security,
            programmes,
            equivalence: equivalence(self.table.equivalence_for(definition), amount),
        }
    }

    fn programme(
        detail: &ProgrammeDetail,
        sector_amount: Decimal,
    ) -> BudgetProgramme {
        let amount = round_half_up(percentage_of(sector_amount, detail.percentage_of_sector));
        BudgetProgramme {
            code: detail.code.clone(),
            name: detail.name.clone(),
            amount,
            percentage: detail.percentage_of_sector,
            actions: detail
                .actions
                .iter()
                .map(|action| Self::action(action, amount))
                .collect(),
        }
    }

    fn action(
        detail: &ActionDetail,
        programme_amount: Decimal,
    ) -> BudgetAction {
        let amount = round_half_up(percentage_of(programme_amount, detail.percentage_of_programme));
        BudgetAction {
            code: detail.code.clone(),
            name: detail.name.clone(),
            amount,
            percentage: detail.percentage_of_programme,
            sous_actions: detail
                .sous_actions
                .iter()
                .map(|sous_action| BudgetSousAction {
                    code: sous_action.code.clone(),
                    name: sous_action.name.clone(),
                    amount: round_half_up(percentage_of(amount, sous_action.percentage_of_action)),
                    percentage: sous_action.percentage_of_action,
                })
                .collect(),
        }
    }
}
