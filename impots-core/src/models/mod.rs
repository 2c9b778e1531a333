mod budget;
mod destinations;
mod household;
mod income_tax;
mod other_taxes;
mod rate_table;
mod social_contributions;
mod tables;
mod tax_result;
mod vat;

pub use budget::{
    ActionDetail, BudgetAction, BudgetProgramme, BudgetSector, BudgetSousAction, BudgetTable,
    BudgetTableError, Equivalence, EquivalenceUnit, ProgrammeDetail, SectorDefinition,
    SectorDetail, SousActionDetail,
};
pub use destinations::{
    CotisationDestination, CsgShare, DestinationBucket, DestinationDefinition, DestinationTable,
};
pub use household::{FamilyStatus, MAX_ANNUAL_AMOUNT, UserInput};
pub use income_tax::IncomeTaxResult;
pub use other_taxes::{
    CehrSchedule, DonutSegment, LevyKind, OtherTaxInputs, OtherTaxRates, OtherTaxesResult,
    TaxEntry, VehiclePreset, VehicleType,
};
pub use rate_table::{
    ContributionBase, ContributionCategory, ContributionRule, CsgAbatement,
    ProfessionalDeduction, RateTable, RateTableError, TaxBracket, VatConfig, VatSavingsBracket,
};
pub use social_contributions::{ContributionLine, SocialContributionsBreakdown};
pub use tables::TaxTables;
pub use tax_result::TaxResult;
pub use vat::EstimatedVatResult;
