use clap::Args;
use rust_decimal::Decimal;
use tracing::{debug, info};

use impots_core::{
    FamilyStatus, MAX_ANNUAL_AMOUNT, OtherTaxInputs, OtherTaxesCalculator, TaxEngine, TaxTables,
    UserInput, VehicleType,
};

use crate::csv_loader::Household;
use crate::report::{BatchLine, Report};

/// Inputs of `impots compute`.
#[derive(Debug, Clone, Args)]
pub struct ComputeArgs {
    /// Gross annual salary in euros.
    #[arg(long)]
    pub gross: Decimal,

    /// `single` or `couple`.
    #[arg(long, default_value = "single", value_parser = parse_family_status)]
    pub status: FamilyStatus,

    #[arg(long, default_value_t = 0)]
    pub children: u32,

    /// Partner's gross annual salary; only used for a couple.
    #[arg(long, default_value = "0")]
    pub partner_gross: Decimal,

    /// Report the whole household instead of the filer's share.
    #[arg(long)]
    pub household: bool,

    /// Vehicle preset: none, citadine, berline, suv or electrique.
    #[arg(long, default_value = "berline", value_parser = parse_vehicle)]
    pub vehicle: VehicleType,

    /// Kilometres driven per year.
    #[arg(long, default_value_t = 12_200)]
    pub km: u32,

    /// Cigarette packs per week.
    #[arg(long, default_value = "0")]
    pub packs: Decimal,

    /// Alcoholic drinks per week.
    #[arg(long, default_value = "0")]
    pub drinks: Decimal,

    /// The household owns its home.
    #[arg(long)]
    pub owner: bool,

    /// Annual property tax in euros, counted with `--owner`.
    #[arg(long, default_value = "0")]
    pub property_tax: Decimal,

    /// Also spread income tax and VAT over the state budget.
    #[arg(long)]
    pub state_budget: bool,
}

impl ComputeArgs {
    pub fn user_input(&self) -> UserInput {
        UserInput {
            gross_annual_salary: self.gross,
            family_status: self.status,
            number_of_children: self.children,
            partner_gross_annual_salary: self.partner_gross,
        }
    }

    pub fn lifestyle(&self) -> OtherTaxInputs {
        OtherTaxInputs {
            vehicle: self.vehicle,
            km_per_year: self.km,
            packs_per_week: self.packs,
            drinks_per_week: self.drinks,
            is_owner: self.owner,
            property_tax: self.property_tax,
        }
    }
}

fn parse_family_status(s: &str) -> Result<FamilyStatus, String> {
    FamilyStatus::parse(s).ok_or_else(|| format!("expected 'single' or 'couple', got '{s}'"))
}

fn parse_vehicle(s: &str) -> Result<VehicleType, String> {
    VehicleType::parse(s).ok_or_else(|| {
        format!("expected one of none, citadine, berline, suv, electrique; got '{s}'")
    })
}

fn check_amount(
    name: &str,
    value: Decimal,
) -> anyhow::Result<()> {
    if value < Decimal::ZERO {
        anyhow::bail!("--{name} must not be negative, got {value}");
    }
    if value > MAX_ANNUAL_AMOUNT {
        anyhow::bail!("--{name} must not exceed {MAX_ANNUAL_AMOUNT}, got {value}");
    }
    Ok(())
}

/// Runs the engine and the other-taxes aggregator for one household.
pub fn compute(
    tables: &TaxTables,
    args: &ComputeArgs,
) -> anyhow::Result<Report> {
    check_amount("gross", args.gross)?;
    check_amount("partner-gross", args.partner_gross)?;
    check_amount("packs", args.packs)?;
    check_amount("drinks", args.drinks)?;
    check_amount("property-tax", args.property_tax)?;

    let input = args.user_input();
    debug!(household = args.household, "computing report");

    let engine = TaxEngine::new(tables);
    let result = if args.household {
        engine.calculate_household_taxes(&input)
    } else {
        engine.calculate_taxes(&input)
    };
    let other_taxes =
        OtherTaxesCalculator::new(&tables.other_taxes).calculate(&result, &args.lifestyle());
    let state_budget = args
        .state_budget
        .then(|| engine.state_budget_allocation(&result));

    Ok(Report {
        result,
        other_taxes,
        state_budget,
    })
}

/// One summary line per household, numbered from 1 in file order.
pub fn batch(
    tables: &TaxTables,
    households: &[Household],
    household_totals: bool,
) -> Vec<BatchLine> {
    let engine = TaxEngine::new(tables);
    let other = OtherTaxesCalculator::new(&tables.other_taxes);

    let lines: Vec<BatchLine> = households
        .iter()
        .enumerate()
        .map(|(idx, h)| {
            let result = if household_totals {
                engine.calculate_household_taxes(&h.input)
            } else {
                engine.calculate_taxes(&h.input)
            };
            let other_taxes = other.calculate(&result, &h.lifestyle);
            BatchLine::new(idx + 1, &result, &other_taxes)
        })
        .collect();

    info!(rows = lines.len(), "batch computed");
    lines
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use impots_data::TableSet;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        compute: ComputeArgs,
    }

    fn parse(args: &[&str]) -> ComputeArgs {
        TestCli::try_parse_from(std::iter::once("impots").chain(args.iter().copied()))
            .expect("arguments should parse")
            .compute
    }

    // =========================================================================
    // argument tests
    // =========================================================================

    #[test]
    fn compute_args_defaults() {
        let args = parse(&["--gross", "35000"]);

        assert_eq!(args.user_input(), UserInput::single(dec!(35000)));
        assert_eq!(args.lifestyle(), OtherTaxInputs::default());
        assert!(!args.household);
    }

    #[test]
    fn compute_args_full_household() {
        let args = parse(&[
            "--gross", "52000", "--status", "couple", "--children", "2", "--partner-gross", "31000",
            "--household", "--vehicle", "suv", "--km", "18000", "--owner", "--property-tax", "1450",
        ]);

        assert_eq!(args.user_input(), UserInput::couple(dec!(52000), dec!(31000)).with_children(2));
        assert_eq!(args.lifestyle().vehicle, VehicleType::Suv);
        assert_eq!(args.lifestyle().property_tax, dec!(1450));
        assert!(args.household);
    }

    #[test]
    fn compute_args_reject_unknown_status() {
        let result = TestCli::try_parse_from(["impots", "--gross", "1", "--status", "married"]);

        assert!(result.is_err());
    }

    // =========================================================================
    // compute / batch tests
    // =========================================================================

    #[test]
    fn compute_single_reference() {
        let set = TableSet::embedded().expect("embedded tables");

        let report = compute(&set.tables, &parse(&["--gross", "35000"])).expect("compute");

        assert_eq!(report.result.income_tax.amount, dec!(1566));
        assert_eq!(report.other_taxes.total_other_taxes, dec!(825.80));
        assert!(report.state_budget.is_none());
    }

    #[test]
    fn compute_rejects_negative_gross() {
        let set = TableSet::embedded().expect("embedded tables");

        let err = compute(&set.tables, &parse(&["--gross=-5"])).expect_err("negative gross");

        assert!(err.to_string().contains("--gross"), "{err}");
    }

    #[test]
    fn compute_rejects_gross_beyond_range() {
        let set = TableSet::embedded().expect("embedded tables");
        let args = parse(&["--gross", "70000000000000000000000000000"]);

        let err = compute(&set.tables, &args).expect_err("gross out of range");

        assert!(err.to_string().contains("must not exceed"), "{err}");
    }

    #[test]
    fn compute_rejects_property_tax_beyond_range() {
        let set = TableSet::embedded().expect("embedded tables");
        let args = parse(&["--gross", "35000", "--owner", "--property-tax", "1000000000001"]);

        let err = compute(&set.tables, &args).expect_err("property tax out of range");

        assert!(err.to_string().contains("--property-tax"), "{err}");
    }

    #[test]
    fn compute_accepts_largest_gross() {
        let set = TableSet::embedded().expect("embedded tables");
        let args = parse(&["--gross", "1000000000000", "--status", "couple", "--children", "3"]);

        let report = compute(&set.tables, &args).expect("compute at the bound");

        assert!(report.result.net_take_home > dec!(0));
    }

    #[test]
    fn compute_household_uses_combined_gross() {
        let set = TableSet::embedded().expect("embedded tables");
        let args = parse(&[
            "--gross", "50000", "--status", "couple", "--partner-gross", "30000", "--household",
            "--state-budget",
        ]);

        let report = compute(&set.tables, &args).expect("compute");

        assert_eq!(report.result.gross_income, dec!(80000));
        assert!(report.state_budget.is_some());
    }

    #[test]
    fn batch_numbers_rows_from_one() {
        let set = TableSet::embedded().expect("embedded tables");
        let households = vec![
            Household {
                input: UserInput::single(dec!(35000)),
                lifestyle: OtherTaxInputs::default(),
            },
            Household {
                input: UserInput::couple(dec!(60000), dec!(20000)).with_children(1),
                lifestyle: OtherTaxInputs::default(),
            },
        ];

        let lines = batch(&set.tables, &households, false);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].row, 1);
        assert_eq!(lines[0].income_tax, dec!(1566));
        assert_eq!(lines[1].row, 2);
        assert_eq!(lines[1].gross_income, dec!(60000));
    }
}
