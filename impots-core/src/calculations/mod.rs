//! Calculators for French household taxes and contributions.
//!
//! Each calculator borrows the table it needs and is otherwise stateless;
//! [`TaxEngine`] chains them into one result.

pub mod budget;
pub mod common;
pub mod destinations;
pub mod equivalence;
pub mod income_tax;
pub mod orchestrator;
pub mod other_taxes;
pub mod social_contributions;
pub mod vat;

pub use budget::BudgetDistributor;
pub use destinations::DestinationCalculator;
pub use income_tax::{IncomeTaxCalculator, apportion_household_tax, compute_fiscal_parts};
pub use orchestrator::TaxEngine;
pub use other_taxes::OtherTaxesCalculator;
pub use social_contributions::SocialContributionsCalculator;
pub use vat::VatCalculator;
