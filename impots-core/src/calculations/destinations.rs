//! Where contributions go: pensions, health, family and autonomy, social
//! debt.
//!
//! Retirement lines fund pensions and CRDS amortizes the social debt as
//! is. CSG is shared among recipient organisms by the repartition table
//! and each organism's share lands in its bucket.

use std::collections::HashMap;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::calculations::common::{percentage_of, ratio, round_half_up};
use crate::calculations::equivalence::equivalence;
use crate::{
    CotisationDestination, DestinationBucket, DestinationTable, SocialContributionsBreakdown,
};

#[derive(Debug, Clone, Copy)]
pub struct DestinationCalculator<'a> {
    table: &'a DestinationTable,
}

impl<'a> DestinationCalculator<'a> {
    pub fn new(table: &'a DestinationTable) -> Self {
        Self { table }
    }

    /// One entry per bucket, in [`DestinationBucket::ALL`] order.
    ///
    /// Percentages are shares of `breakdown.total`; all zero when there are
    /// no contributions.
    pub fn calculate(
        &self,
        gross: Decimal,
        breakdown: &SocialContributionsBreakdown,
    ) -> Vec<CotisationDestination> {
        let amounts = self.bucket_amounts(breakdown);
        debug!(total = %breakdown.total, buckets = amounts.len(), "distributing contributions");

        DestinationBucket::ALL
            .into_iter()
            .filter_map(|bucket| {
                let Some(definition) = self.table.definition(bucket) else {
                    warn!(bucket = bucket.as_str(), "no destination definition, skipping");
                    return None;
                };
                let amount = amounts.get(&bucket).copied().unwrap_or_default();
                Some(CotisationDestination {
                    bucket,
                    label: definition.label.clone(),
                    description: definition.description.clone(),
                    color: definition.color.clone(),
                    amount,
                    percentage: round_half_up(ratio(amount, breakdown.total) * Decimal::ONE_HUNDRED),
                    share_of_gross: round_half_up(ratio(amount, gross) * Decimal::ONE_HUNDRED),
                    equivalence: equivalence(&definition.unit, amount),
                })
            })
            .collect()
    }

    fn bucket_amounts(
        &self,
        breakdown: &SocialContributionsBreakdown,
    ) -> HashMap<DestinationBucket, Decimal> {
        let mut amounts = HashMap::new();
        amounts.insert(DestinationBucket::Pension, breakdown.retirement);
        amounts.insert(DestinationBucket::SocialDebt, breakdown.crds);

        let csg = breakdown.csg_deductible + breakdown.csg_non_deductible;
        for share in &self.table.csg_repartition {
            *amounts.entry(share.bucket).or_insert(Decimal::ZERO) +=
                round_half_up(percentage_of(csg, share.percentage));
        }
        amounts
    }
}
