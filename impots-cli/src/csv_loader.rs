//! CSV loader for batch household input.
//!
//! ## CSV Format
//!
//! Column order does **not** matter (headers are matched by name). Header
//! names are case-sensitive and must match exactly.
//!
//! | Column                        | Required | Type    | Notes                                     |
//! |-------------------------------|----------|---------|-------------------------------------------|
//! | `gross_annual_salary`         | yes      | decimal | e.g. `35000.00`                           |
//! | `family_status`               | yes      | string  | `single` or `couple`                      |
//! | `number_of_children`          | yes      | integer |                                           |
//! | `partner_gross_annual_salary` | no       | decimal | Ignored for `single`; empty means 0       |
//! | `vehicle`                     | no       | string  | `none`, `citadine`, `berline`, `suv`, `electrique` |
//! | `km_per_year`                 | no       | integer |                                           |
//! | `packs_per_week`              | no       | decimal | Tobacco                                   |
//! | `drinks_per_week`             | no       | decimal | Alcohol                                   |
//! | `is_owner`                    | no       | bool    | `true` / `false`                          |
//! | `property_tax`                | no       | decimal | Only counted when `is_owner` is `true`    |
//!
//! Lifestyle columns left empty take the defaults of
//! [`OtherTaxInputs::default`].
//!
//! ### Minimal example
//!
//! ```csv
//! gross_annual_salary,family_status,number_of_children
//! 35000.00,single,0
//! ```
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;

use impots_core::{FamilyStatus, MAX_ANNUAL_AMOUNT, OtherTaxInputs, UserInput, VehicleType};

// ---------------------------------------------------------------------------
// Serde-compatible row that mirrors the CSV layout exactly
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CsvRow {
    gross_annual_salary: Decimal,
    family_status: String,
    number_of_children: u32,
    partner_gross_annual_salary: Option<Decimal>,
    vehicle: Option<String>,
    km_per_year: Option<u32>,
    packs_per_week: Option<Decimal>,
    drinks_per_week: Option<Decimal>,
    is_owner: Option<bool>,
    property_tax: Option<Decimal>,
}

/// One batch row: the household and its lifestyle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Household {
    pub input: UserInput,
    pub lifestyle: OtherTaxInputs,
}

// ---------------------------------------------------------------------------
// Public error type
// ---------------------------------------------------------------------------

/// Errors that can occur while loading or converting CSV data.
#[derive(Debug, thiserror::Error)]
pub enum CsvLoadError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Bad structure, missing required column or type mismatch.
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// `row` is 1-based (header = row 0).
    #[error("unrecognised family status '{status}' on row {row}")]
    InvalidFamilyStatus { status: String, row: usize },

    #[error("unrecognised vehicle '{vehicle}' on row {row}")]
    InvalidVehicle { vehicle: String, row: usize },

    #[error("negative amount in column '{column}' on row {row}")]
    NegativeAmount { column: &'static str, row: usize },

    #[error("amount in column '{column}' on row {row} is out of range")]
    AmountTooLarge { column: &'static str, row: usize },
}

// ---------------------------------------------------------------------------
// Core loader
// ---------------------------------------------------------------------------

fn check_amount(
    value: Decimal,
    column: &'static str,
    row: usize,
) -> Result<Decimal, CsvLoadError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(CsvLoadError::NegativeAmount { column, row });
    }
    if value > MAX_ANNUAL_AMOUNT {
        return Err(CsvLoadError::AmountTooLarge { column, row });
    }
    Ok(value)
}

fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<Household, CsvLoadError> {
    let family_status = FamilyStatus::parse(&row.family_status).ok_or_else(|| {
        CsvLoadError::InvalidFamilyStatus {
            status: row.family_status.clone(),
            row: row_number,
        }
    })?;

    let defaults = OtherTaxInputs::default();
    let vehicle = match row.vehicle.as_deref() {
        None | Some("") => defaults.vehicle,
        Some(code) => VehicleType::parse(code).ok_or_else(|| CsvLoadError::InvalidVehicle {
            vehicle: code.to_string(),
            row: row_number,
        })?,
    };

    let input = UserInput {
        gross_annual_salary: check_amount(
            row.gross_annual_salary,
            "gross_annual_salary",
            row_number,
        )?,
        family_status,
        number_of_children: row.number_of_children,
        partner_gross_annual_salary: check_amount(
            row.partner_gross_annual_salary.unwrap_or_default(),
            "partner_gross_annual_salary",
            row_number,
        )?,
    };

    let lifestyle = OtherTaxInputs {
        vehicle,
        km_per_year: row.km_per_year.unwrap_or(defaults.km_per_year),
        packs_per_week: check_amount(
            row.packs_per_week.unwrap_or(defaults.packs_per_week),
            "packs_per_week",
            row_number,
        )?,
        drinks_per_week: check_amount(
            row.drinks_per_week.unwrap_or(defaults.drinks_per_week),
            "drinks_per_week",
            row_number,
        )?,
        is_owner: row.is_owner.unwrap_or(defaults.is_owner),
        property_tax: check_amount(
            row.property_tax.unwrap_or(defaults.property_tax),
            "property_tax",
            row_number,
        )?,
    };

    Ok(Household { input, lifestyle })
}

/// Parse CSV text and return the households in file order.
///
/// # Errors
///
/// * [`CsvLoadError::Parse`] if the CSV is structurally invalid or a
///   required field cannot be deserialised.
/// * [`CsvLoadError::InvalidFamilyStatus`] / [`CsvLoadError::InvalidVehicle`]
///   for an unrecognised code.
/// * [`CsvLoadError::NegativeAmount`] / [`CsvLoadError::AmountTooLarge`]
///   for a salary or habit outside `0..=MAX_ANNUAL_AMOUNT`.
pub fn load_from_str(input: &str) -> Result<Vec<Household>, CsvLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result?;
            convert_row(row, idx + 1)
        })
        .collect()
}

/// Read a file from disk and delegate to [`load_from_str`].
pub fn load_from_file(path: &Path) -> Result<Vec<Household>, CsvLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CsvLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_from_str(&contents)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const MINIMAL_CSV: &str = "\
gross_annual_salary,family_status,number_of_children
35000.00,single,0
";

    const FULL_CSV: &str = "\
gross_annual_salary,family_status,number_of_children,partner_gross_annual_salary,vehicle,km_per_year,packs_per_week,drinks_per_week,is_owner,property_tax
52000.00,couple,2,31000.00,suv,18000,3.5,10,true,1450.00
";

    // =========================================================================
    // parsing tests
    // =========================================================================

    #[test]
    fn test_minimal_csv_uses_lifestyle_defaults() {
        let households = load_from_str(MINIMAL_CSV).expect("should parse minimal CSV");

        assert_eq!(households.len(), 1);
        assert_eq!(households[0].input, UserInput::single(dec!(35000.00)));
        assert_eq!(households[0].lifestyle, OtherTaxInputs::default());
    }

    #[test]
    fn test_full_csv_all_fields_populated() {
        let households = load_from_str(FULL_CSV).expect("should parse full CSV");
        let h = &households[0];

        assert_eq!(h.input, UserInput::couple(dec!(52000.00), dec!(31000.00)).with_children(2));
        assert_eq!(
            h.lifestyle,
            OtherTaxInputs {
                vehicle: VehicleType::Suv,
                km_per_year: 18000,
                packs_per_week: dec!(3.5),
                drinks_per_week: dec!(10),
                is_owner: true,
                property_tax: dec!(1450.00),
            }
        );
    }

    #[test]
    fn test_empty_optional_cells_fall_back() {
        let csv = "\
gross_annual_salary,family_status,number_of_children,partner_gross_annual_salary,vehicle
40000,couple,1,,
";
        let households = load_from_str(csv).expect("should parse");

        assert_eq!(households[0].input.partner_gross_annual_salary, dec!(0));
        assert_eq!(households[0].lifestyle.vehicle, VehicleType::Berline);
    }

    #[test]
    fn test_header_only_is_empty() {
        let households =
            load_from_str("gross_annual_salary,family_status,number_of_children\n").expect("valid");

        assert!(households.is_empty());
    }

    // =========================================================================
    // error tests
    // =========================================================================

    #[test]
    fn test_invalid_family_status_reports_row() {
        let csv = "\
gross_annual_salary,family_status,number_of_children
30000,single,0
30000,married,1
";
        match load_from_str(csv).expect_err("should fail") {
            CsvLoadError::InvalidFamilyStatus { status, row } => {
                assert_eq!(status, "married");
                assert_eq!(row, 2);
            }
            other => panic!("expected InvalidFamilyStatus, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_vehicle_reports_row() {
        let csv = "gross_annual_salary,family_status,number_of_children,vehicle\n30000,single,0,tank\n";

        match load_from_str(csv).expect_err("should fail") {
            CsvLoadError::InvalidVehicle { vehicle, row } => {
                assert_eq!(vehicle, "tank");
                assert_eq!(row, 1);
            }
            other => panic!("expected InvalidVehicle, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_salary_is_rejected() {
        let csv = "gross_annual_salary,family_status,number_of_children\n-100,single,0\n";

        match load_from_str(csv).expect_err("should fail") {
            CsvLoadError::NegativeAmount { column, row } => {
                assert_eq!(column, "gross_annual_salary");
                assert_eq!(row, 1);
            }
            other => panic!("expected NegativeAmount, got {:?}", other),
        }
    }

    #[test]
    fn test_huge_partner_salary_is_rejected() {
        let csv = "\
gross_annual_salary,family_status,number_of_children,partner_gross_annual_salary
30000,couple,0,20000
30000,couple,0,5000000000000
";

        match load_from_str(csv).expect_err("should fail") {
            CsvLoadError::AmountTooLarge { column, row } => {
                assert_eq!(column, "partner_gross_annual_salary");
                assert_eq!(row, 2);
            }
            other => panic!("expected AmountTooLarge, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_required_column_returns_parse_error() {
        let csv = "gross_annual_salary,number_of_children\n30000,0\n";

        assert!(matches!(load_from_str(csv), Err(CsvLoadError::Parse(_))));
    }

    #[test]
    fn test_negative_children_returns_parse_error() {
        let csv = "gross_annual_salary,family_status,number_of_children\n30000,single,-1\n";

        assert!(matches!(load_from_str(csv), Err(CsvLoadError::Parse(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = load_from_file(Path::new("/nonexistent/households.csv"));

        assert!(matches!(result, Err(CsvLoadError::Io { .. })));
    }
}
