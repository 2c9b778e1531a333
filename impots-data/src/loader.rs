use std::collections::BTreeMap;
use std::io::Read;

use impots_core::{
    BudgetTable, BudgetTableError, DestinationTable, EquivalenceUnit, OtherTaxRates, RateTable,
    RateTableError, SectorDefinition, SectorDetail, TaxBracket,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when loading rate and budget tables.
#[derive(Debug, Error)]
pub enum TableLoadError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("unknown bracket schedule '{0}' (expected income_tax, cehr_single or cehr_couple)")]
    InvalidSchedule(String),

    #[error("invalid rate table: {0}")]
    Rates(#[from] RateTableError),

    #[error("invalid budget table: {0}")]
    Budget(#[from] BudgetTableError),
}

impl From<csv::Error> for TableLoadError {
    fn from(err: csv::Error) -> Self {
        TableLoadError::CsvParse(err.to_string())
    }
}

/// Bracket schedules that can be replaced from a CSV file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketSchedule {
    IncomeTax,
    CehrSingle,
    CehrCouple,
}

impl BracketSchedule {
    fn parse(code: &str) -> Result<Self, TableLoadError> {
        match code {
            "income_tax" => Ok(Self::IncomeTax),
            "cehr_single" => Ok(Self::CehrSingle),
            "cehr_couple" => Ok(Self::CehrCouple),
            _ => Err(TableLoadError::InvalidSchedule(code.to_string())),
        }
    }
}

/// A single record from a bracket CSV file.
///
/// - `schedule`: `income_tax`, `cehr_single` or `cehr_couple`
/// - `min`: lower bound of the bracket
/// - `max`: upper bound (empty for unlimited)
/// - `rate`: marginal rate as a fraction (e.g. 0.11 for 11 %)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    pub schedule: String,
    pub min: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub max: Option<Decimal>,
    pub rate: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// `equivalences.json`: reference units plus the generic fallback.
#[derive(Debug, Clone, Deserialize)]
struct EquivalenceFile {
    units: Vec<EquivalenceUnit>,
    fallback: EquivalenceUnit,
}

/// Parsers for the static table formats.
///
/// Every `parse_*` function validates what it parsed, so a table that
/// comes out of here is safe to hand to the calculators.
pub struct TableLoader;

impl TableLoader {
    /// Parse the contribution, income-tax and VAT schedule (TOML).
    pub fn parse_rates(toml_str: &str) -> Result<RateTable, TableLoadError> {
        let rates: RateTable = toml::from_str(toml_str)?;
        rates.validate()?;
        debug!(year = rates.year, rules = rates.contributions.len(), "rate table parsed");
        Ok(rates)
    }

    /// Parse excise rates, vehicle presets and the CEHR schedule (TOML).
    pub fn parse_other_taxes(toml_str: &str) -> Result<OtherTaxRates, TableLoadError> {
        let rates: OtherTaxRates = toml::from_str(toml_str)?;
        rates.validate()?;
        debug!(vehicles = rates.vehicles.len(), "other tax rates parsed");
        Ok(rates)
    }

    /// Assemble the budget table from its three JSON sources.
    ///
    /// `details_json` maps sector ids to the
    /// programme → action → sous-action tree.
    pub fn parse_budget(
        sectors_json: &str,
        details_json: &str,
        equivalences_json: &str,
    ) -> Result<BudgetTable, TableLoadError> {
        let sectors: Vec<SectorDefinition> = serde_json::from_str(sectors_json)?;
        let details: BTreeMap<String, SectorDetail> = serde_json::from_str(details_json)?;
        let equivalences: EquivalenceFile = serde_json::from_str(equivalences_json)?;

        let table = BudgetTable {
            sectors,
            details,
            equivalences: equivalences.units,
            fallback_equivalence: equivalences.fallback,
        };
        table.validate()?;
        debug!(sectors = table.sectors.len(), details = table.details.len(), "budget table parsed");
        Ok(table)
    }

    /// Parse the CSG repartition and destination presentation (JSON).
    pub fn parse_destinations(json: &str) -> Result<DestinationTable, TableLoadError> {
        let table: DestinationTable = serde_json::from_str(json)?;
        table.validate()?;
        Ok(table)
    }

    /// Parse bracket records from a CSV reader.
    ///
    /// The reader can be any type that implements `Read`, such as a file or
    /// a string slice.
    pub fn parse_brackets<R: Read>(reader: R) -> Result<Vec<BracketRecord>, TableLoadError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: BracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Replace every schedule named in `records` with the records' brackets,
    /// in file order, then re-validate both tables.
    ///
    /// Schedules not mentioned keep their current brackets. Returns the
    /// number of brackets applied.
    pub fn apply_brackets(
        records: &[BracketRecord],
        rates: &mut RateTable,
        other_taxes: &mut OtherTaxRates,
    ) -> Result<usize, TableLoadError> {
        let mut replaced: Vec<(BracketSchedule, Vec<TaxBracket>)> = Vec::new();

        for record in records {
            let schedule = BracketSchedule::parse(&record.schedule)?;
            let bracket = TaxBracket {
                min: record.min,
                max: record.max,
                rate: record.rate,
            };
            match replaced.iter_mut().find(|(s, _)| *s == schedule) {
                Some((_, brackets)) => brackets.push(bracket),
                None => replaced.push((schedule, vec![bracket])),
            }
        }

        for (schedule, brackets) in replaced {
            debug!(?schedule, count = brackets.len(), "replacing bracket schedule");
            match schedule {
                BracketSchedule::IncomeTax => rates.income_tax_brackets = brackets,
                BracketSchedule::CehrSingle => other_taxes.cehr.single = brackets,
                BracketSchedule::CehrCouple => other_taxes.cehr.couple = brackets,
            }
        }

        rates.validate()?;
        other_taxes.validate()?;
        Ok(records.len())
    }
}
