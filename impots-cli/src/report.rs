use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use impots_core::calculations::equivalence::group_thousands;
use impots_core::{BudgetSector, OtherTaxesResult, TaxResult};
use impots_data::TableSet;

/// Output format for reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Everything `impots compute` prints for one household.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub result: TaxResult,
    pub other_taxes: OtherTaxesResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_budget: Option<Vec<BudgetSector>>,
}

/// One line of `impots batch` output.
#[derive(Debug, Clone, Serialize)]
pub struct BatchLine {
    pub row: usize,
    pub gross_income: Decimal,
    pub social_contributions: Decimal,
    pub income_tax: Decimal,
    pub vat: Decimal,
    pub other_taxes: Decimal,
    pub grand_total: Decimal,
    pub net_take_home: Decimal,
    pub overall_tax_rate: Decimal,
}

impl BatchLine {
    pub fn new(
        row: usize,
        result: &TaxResult,
        other_taxes: &OtherTaxesResult,
    ) -> Self {
        Self {
            row,
            gross_income: result.gross_income,
            social_contributions: result.social_contributions.total,
            income_tax: result.income_tax.amount,
            vat: result.estimated_vat.amount,
            other_taxes: other_taxes.total_other_taxes,
            grand_total: other_taxes.grand_total,
            net_take_home: result.net_take_home,
            overall_tax_rate: result.overall_tax_rate,
        }
    }
}

/// Formats an amount the French way: `12 345,67 €`.
///
/// Thousands are separated by a narrow no-break space.
pub fn euros(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{sign}{},{frac_part}\u{a0}€", group_thousands(int_part))
}

/// Formats a fraction as a percentage: `0.2534` → `25,34 %`.
pub fn percent(rate: Decimal) -> String {
    let value = (rate * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}\u{a0}%", value).replace('.', ",")
}

impl fmt::Display for Report {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let r = &self.result;
        let tax = &r.income_tax;

        writeln!(f, "Revenu brut :              {}", euros(r.gross_income))?;
        writeln!(
            f,
            "Situation :                {} ({} enfant(s))",
            r.input.family_status.as_str(),
            r.input.number_of_children
        )?;
        writeln!(f)?;
        writeln!(f, "Cotisations sociales :     {}", euros(r.social_contributions.total))?;
        for line in &r.social_contributions.lines {
            writeln!(f, "  {:<40} {:>14}", line.label, euros(line.amount))?;
        }
        writeln!(f)?;
        writeln!(f, "Net imposable :            {}", euros(tax.net_imposable))?;
        writeln!(f, "Abattement 10 % :          {}", euros(tax.professional_deduction))?;
        writeln!(f, "Revenu imposable :         {}", euros(tax.taxable_income))?;
        writeln!(f, "Parts fiscales :           {}", tax.parts.normalize())?;
        writeln!(f, "Taux marginal :            {}", percent(tax.marginal_rate))?;
        if tax.quotient_familial_capped {
            writeln!(
                f,
                "Quotient familial :        plafonné ({})",
                euros(tax.quotient_familial_advantage)
            )?;
        }
        writeln!(f, "Impôt sur le revenu :      {}", euros(tax.amount))?;
        writeln!(f, "TVA estimée :              {}", euros(r.estimated_vat.amount))?;
        writeln!(f)?;
        writeln!(
            f,
            "Prélèvements directs :     {} ({})",
            euros(r.direct_taxes),
            percent(r.direct_tax_rate)
        )?;
        writeln!(
            f,
            "Total des prélèvements :   {} ({})",
            euros(r.total_taxes),
            percent(r.overall_tax_rate)
        )?;
        writeln!(f, "Revenu net :               {}", euros(r.net_take_home))?;

        writeln!(f)?;
        writeln!(f, "Destination des cotisations")?;
        for destination in &r.cotisation_destinations {
            writeln!(
                f,
                "  {:<40} {:>14}  {}",
                destination.label,
                euros(destination.amount),
                destination.equivalence.formatted
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Autres taxes")?;
        for entry in self.other_taxes.entries() {
            writeln!(f, "  {:<40} {:>14}", entry.kind.label(), euros(entry.amount))?;
        }
        writeln!(
            f,
            "Total général :            {} (autres taxes : {} %)",
            euros(self.other_taxes.grand_total),
            self.other_taxes.share_of_grand_total().to_string().replace('.', ",")
        )?;

        writeln!(f)?;
        writeln!(f, "Répartition de vos impôts")?;
        write_sectors(f, &r.budget_allocation)?;

        if let Some(state_budget) = &self.state_budget {
            writeln!(f)?;
            writeln!(f, "Budget de l'État (impôt sur le revenu + TVA)")?;
            write_sectors(f, state_budget)?;
        }
        Ok(())
    }
}

fn write_sectors(
    f: &mut fmt::Formatter<'_>,
    sectors: &[BudgetSector],
) -> fmt::Result {
    for sector in sectors {
        writeln!(
            f,
            "  {:<40} {:>14}  {}",
            sector.name,
            euros(sector.amount),
            sector.equivalence.formatted
        )?;
    }
    Ok(())
}

impl fmt::Display for BatchLine {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(
            f,
            "#{:<4} brut {:>14}  cotisations {:>12}  IR {:>12}  TVA {:>11}  autres {:>10}  total {:>14}  ({})",
            self.row,
            euros(self.gross_income),
            euros(self.social_contributions),
            euros(self.income_tax),
            euros(self.vat),
            euros(self.other_taxes),
            euros(self.grand_total),
            percent(self.overall_tax_rate)
        )
    }
}

/// Summary printed by `impots tables`.
pub struct TablesSummary<'a>(pub &'a TableSet);

impl fmt::Display for TablesSummary<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let tables = &self.0.tables;
        let rates = &tables.rates;
        let budget = &tables.budget;

        writeln!(f, "Barème {}", rates.year)?;
        for (name, source) in &self.0.sources {
            writeln!(f, "  {:<26} {}", name, source)?;
        }
        writeln!(f)?;
        writeln!(f, "Plafond de la sécurité sociale : {}", euros(rates.ceiling))?;
        writeln!(f, "Cotisations :                    {}", rates.contributions.len())?;
        writeln!(f, "Tranches d'impôt :               {}", rates.income_tax_brackets.len())?;
        writeln!(f, "Plafond quotient familial :      {}", euros(rates.quotient_familial_cap))?;
        writeln!(f, "Tranches d'épargne (TVA) :       {}", rates.vat.savings_brackets.len())?;
        writeln!(f, "Véhicules :                      {}", tables.other_taxes.vehicles.len())?;

        let total: Decimal = budget.sectors.iter().map(|s| s.percentage).sum();
        let state: Decimal = budget
            .sectors
            .iter()
            .filter_map(|s| s.percentage_of_state_budget)
            .sum();
        writeln!(
            f,
            "Secteurs budgétaires :           {} (somme {} %)",
            budget.sectors.len(),
            total.normalize()
        )?;
        writeln!(f, "Budget de l'État :               somme {} %", state.normalize())?;
        writeln!(f, "Détails de secteur :             {}", budget.details.len())?;
        writeln!(f, "Unités d'équivalence :           {}", budget.equivalences.len())?;
        write!(
            f,
            "Organismes CSG :                 {}",
            tables.destinations.csg_repartition.len()
        )
    }
}
