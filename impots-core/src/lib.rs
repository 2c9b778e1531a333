pub mod calculations;
pub mod models;

#[cfg(test)]
pub(crate) mod fixtures;

pub use calculations::{
    BudgetDistributor, DestinationCalculator, IncomeTaxCalculator, OtherTaxesCalculator,
    SocialContributionsCalculator, TaxEngine, VatCalculator,
};
pub use models::*;
