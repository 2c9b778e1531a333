//! Integration tests that run the batch loader against an on-disk fixture
//! and feed the result through the engine.

use std::path::PathBuf;

use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

use impots_cli::{app, csv_loader};
use impots_core::{FamilyStatus, OtherTaxInputs, VehicleType};
use impots_data::TableSet;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("sample_households.csv")
}

#[test]
fn test_load_fixture_file_succeeds() {
    let households =
        csv_loader::load_from_file(&fixture_path()).expect("fixture file should load without error");

    assert_eq!(households.len(), 3);
}

#[test]
fn test_load_fixture_first_row_uses_defaults() {
    let households = csv_loader::load_from_file(&fixture_path()).expect("fixture");
    let h = &households[0];

    assert_eq!(h.input.gross_annual_salary, dec!(35000.00));
    assert_eq!(h.input.family_status, FamilyStatus::Single);
    assert_eq!(h.lifestyle, OtherTaxInputs::default());
}

#[test]
fn test_load_fixture_second_row_couple() {
    let households = csv_loader::load_from_file(&fixture_path()).expect("fixture");
    let h = &households[1];

    assert_eq!(h.input.family_status, FamilyStatus::Couple);
    assert_eq!(h.input.number_of_children, 2);
    assert_eq!(h.input.partner_gross_annual_salary, dec!(31000.00));
    assert_eq!(h.lifestyle.vehicle, VehicleType::Suv);
    assert_eq!(h.lifestyle.packs_per_week, dec!(0));
    assert_eq!(h.lifestyle.drinks_per_week, dec!(10));
    assert!(h.lifestyle.is_owner);
}

#[test]
fn test_load_fixture_third_row_smoker() {
    let households = csv_loader::load_from_file(&fixture_path()).expect("fixture");
    let h = &households[2];

    assert_eq!(h.lifestyle.vehicle, VehicleType::Citadine);
    assert_eq!(h.lifestyle.km_per_year, 8000);
    assert_eq!(h.lifestyle.packs_per_week, dec!(5));
    assert!(!h.lifestyle.is_owner);
}

#[test]
fn test_batch_over_fixture() {
    let set = TableSet::embedded().expect("embedded tables");
    let households = csv_loader::load_from_file(&fixture_path()).expect("fixture");

    let lines = app::batch(&set.tables, &households, true);

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0].income_tax, dec!(1566));
    assert_eq!(lines[0].other_taxes, dec!(825.80));
    // Household totals: both salaries count
    assert_eq!(lines[1].gross_income, dec!(83000));
    // 8000 km × 5.5 l/100 km × 0.60 + 350 + 5 packs × 52 × 8.50
    assert_eq!(lines[2].other_taxes, dec!(264) + dec!(350) + dec!(2210));
}
