use serde::{Deserialize, Serialize};

use super::{BudgetTable, DestinationTable, OtherTaxRates, RateTable};

/// Every static table the engine reads, loaded once and then shared
/// read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxTables {
    pub rates: RateTable,
    pub other_taxes: OtherTaxRates,
    pub budget: BudgetTable,
    pub destinations: DestinationTable,
}
