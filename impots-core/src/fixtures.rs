//! Tables shared by the unit tests, mirroring the 2026 schedule.

use std::collections::BTreeMap;

use rust_decimal_macros::dec;

use crate::models::*;

fn rule(
    id: &str,
    label: &str,
    rate: rust_decimal::Decimal,
    base: ContributionBase,
    category: ContributionCategory,
) -> ContributionRule {
    ContributionRule {
        id: id.to_string(),
        label: label.to_string(),
        rate,
        base,
        category,
    }
}

fn bracket(
    min: rust_decimal::Decimal,
    max: Option<rust_decimal::Decimal>,
    rate: rust_decimal::Decimal,
) -> TaxBracket {
    TaxBracket { min, max, rate }
}

fn unit(
    id: &str,
    label: &str,
    unit_price: rust_decimal::Decimal,
) -> EquivalenceUnit {
    EquivalenceUnit {
        id: id.to_string(),
        label: label.to_string(),
        unit_price,
    }
}

pub fn rate_table() -> RateTable {
    use ContributionBase::*;
    use ContributionCategory::*;

    RateTable {
        year: 2026,
        ceiling: dec!(48060),
        csg_abatement: CsgAbatement {
            rate: dec!(0.9825),
            ceiling_multiple: dec!(4),
        },
        contributions: vec![
            rule("csg_deductible", "CSG déductible", dec!(0.068), CsgBase, CsgDeductible),
            rule("csg_non_deductible", "CSG non déductible", dec!(0.024), CsgBase, CsgNonDeductible),
            rule("crds", "CRDS", dec!(0.005), CsgBase, Crds),
            rule("vieillesse_plafonnee", "Vieillesse plafonnée", dec!(0.069), CappedAtCeiling, Retirement),
            rule("vieillesse_deplafonnee", "Vieillesse déplafonnée", dec!(0.004), Gross, Retirement),
            rule("retraite_complementaire_t1", "Retraite complémentaire T1", dec!(0.0315), CappedAtCeiling, Retirement),
            rule(
                "retraite_complementaire_t2",
                "Retraite complémentaire T2",
                dec!(0.0864),
                CeilingBand { from: dec!(1), to: dec!(8) },
                Retirement,
            ),
            rule("ceg_t1", "CEG T1", dec!(0.0086), CappedAtCeiling, Retirement),
            rule(
                "ceg_t2",
                "CEG T2",
                dec!(0.0108),
                CeilingBand { from: dec!(1), to: dec!(8) },
                Retirement,
            ),
        ],
        income_tax_brackets: vec![
            bracket(dec!(0), Some(dec!(11600)), dec!(0)),
            bracket(dec!(11600), Some(dec!(29579)), dec!(0.11)),
            bracket(dec!(29579), Some(dec!(84577)), dec!(0.30)),
            bracket(dec!(84577), Some(dec!(181917)), dec!(0.41)),
            bracket(dec!(181917), None, dec!(0.45)),
        ],
        professional_deduction: ProfessionalDeduction {
            rate: dec!(0.10),
            min: dec!(504),
            max: dec!(14426),
        },
        quotient_familial_cap: dec!(1807),
        vat: VatConfig {
            effective_rate: dec!(0.13),
            savings_brackets: vec![
                VatSavingsBracket { max_net_annual: Some(dec!(15000)), rate: dec!(0) },
                VatSavingsBracket { max_net_annual: Some(dec!(25000)), rate: dec!(0.05) },
                VatSavingsBracket { max_net_annual: Some(dec!(40000)), rate: dec!(0.10) },
                VatSavingsBracket { max_net_annual: Some(dec!(60000)), rate: dec!(0.15) },
                VatSavingsBracket { max_net_annual: Some(dec!(100000)), rate: dec!(0.20) },
                VatSavingsBracket { max_net_annual: None, rate: dec!(0.30) },
            ],
        },
    }
}

pub fn other_tax_rates() -> OtherTaxRates {
    OtherTaxRates {
        ticpe_per_liter: dec!(0.60),
        vehicles: vec![
            VehiclePreset { vehicle: VehicleType::None, liters_per_100km: dec!(0) },
            VehiclePreset { vehicle: VehicleType::Citadine, liters_per_100km: dec!(5.5) },
            VehiclePreset { vehicle: VehicleType::Berline, liters_per_100km: dec!(6.5) },
            VehiclePreset { vehicle: VehicleType::Suv, liters_per_100km: dec!(8) },
        ],
        tsca: dec!(350),
        tobacco_per_pack: dec!(8.50),
        alcohol_per_drink: dec!(0.23),
        cehr: CehrSchedule {
            single: vec![
                bracket(dec!(0), Some(dec!(250000)), dec!(0)),
                bracket(dec!(250000), Some(dec!(500000)), dec!(0.03)),
                bracket(dec!(500000), None, dec!(0.04)),
            ],
            couple: vec![
                bracket(dec!(0), Some(dec!(500000)), dec!(0)),
                bracket(dec!(500000), Some(dec!(1000000)), dec!(0.03)),
                bracket(dec!(1000000), None, dec!(0.04)),
            ],
        },
    }
}

fn sector(
    id: &str,
    percentage: rust_decimal::Decimal,
    state: Option<rust_decimal::Decimal>,
    includes_social_security: bool,
    equivalence: Option<&str>,
) -> SectorDefinition {
    SectorDefinition {
        id: id.to_string(),
        name: id.to_uppercase(),
        percentage,
        percentage_of_state_budget: state,
        color: "#000000".to_string(),
        icon: "circle".to_string(),
        description: format!("Secteur {id}"),
        includes_social_security,
        equivalence: equivalence.map(str::to_string),
    }
}

pub fn budget_table() -> BudgetTable {
    let mut details = BTreeMap::new();
    details.insert(
        "education".to_string(),
        SectorDetail {
            programmes: vec![
                ProgrammeDetail {
                    code: "140".to_string(),
                    name: "Enseignement scolaire public du premier degré".to_string(),
                    percentage_of_sector: dec!(40),
                    actions: vec![
                        ActionDetail {
                            code: "140-01".to_string(),
                            name: "Enseignement pré-élémentaire".to_string(),
                            percentage_of_programme: dec!(30),
                            sous_actions: vec![],
                        },
                        ActionDetail {
                            code: "140-02".to_string(),
                            name: "Enseignement élémentaire".to_string(),
                            percentage_of_programme: dec!(70),
                            sous_actions: vec![
                                SousActionDetail {
                                    code: "140-02-01".to_string(),
                                    name: "Personnels enseignants".to_string(),
                                    percentage_of_action: dec!(50),
                                },
                                SousActionDetail {
                                    code: "140-02-02".to_string(),
                                    name: "Remplacement".to_string(),
                                    percentage_of_action: dec!(50),
                                },
                            ],
                        },
                    ],
                },
                ProgrammeDetail {
                    code: "141".to_string(),
                    name: "Enseignement scolaire public du second degré".to_string(),
                    percentage_of_sector: dec!(60),
                    actions: vec![ActionDetail {
                        code: "141-01".to_string(),
                        name: "Enseignement en collège".to_string(),
                        percentage_of_programme: dec!(100),
                        sous_actions: vec![],
                    }],
                },
            ],
        },
    );
    details.insert(
        "defense".to_string(),
        SectorDetail {
            programmes: vec![
                ProgrammeDetail {
                    code: "178".to_string(),
                    name: "Préparation et emploi des forces".to_string(),
                    percentage_of_sector: dec!(60),
                    actions: vec![],
                },
                ProgrammeDetail {
                    code: "146".to_string(),
                    name: "Équipement des forces".to_string(),
                    percentage_of_sector: dec!(40),
                    actions: vec![],
                },
            ],
        },
    );

    BudgetTable {
        sectors: vec![
            sector("retraites", dec!(30), None, true, Some("mois_pension")),
            sector("sante", dec!(25), None, true, Some("consultation")),
            sector("education", dec!(20), Some(dec!(45)), false, Some("manuel")),
            sector("defense", dec!(10), Some(dec!(25)), false, None),
            sector("dette", dec!(15), Some(dec!(30)), false, None),
        ],
        details,
        equivalences: vec![
            unit("mois_pension", "mois de pension moyenne", dec!(1500)),
            unit("consultation", "consultations chez le généraliste", dec!(30)),
            unit("manuel", "manuels scolaires", dec!(25)),
        ],
        fallback_equivalence: unit("baguette", "baguettes de pain", dec!(1.20)),
    }
}

pub fn destination_table() -> DestinationTable {
    let share = |organism: &str, percentage, bucket| CsgShare {
        organism: organism.to_string(),
        label: organism.to_uppercase(),
        percentage,
        bucket,
    };
    let destination = |bucket: DestinationBucket, label: &str, u: EquivalenceUnit| {
        DestinationDefinition {
            bucket,
            label: label.to_string(),
            description: format!("Financement {label}"),
            color: "#000000".to_string(),
            unit: u,
        }
    };

    DestinationTable {
        csg_repartition: vec![
            share("cnam", dec!(64), DestinationBucket::Health),
            share("cnaf", dec!(12.5), DestinationBucket::FamilyAutonomy),
            share("cnsa", dec!(17), DestinationBucket::FamilyAutonomy),
            share("cades", dec!(6.5), DestinationBucket::SocialDebt),
        ],
        destinations: vec![
            destination(
                DestinationBucket::Pension,
                "retraites",
                unit("mois_pension", "mois de pension moyenne", dec!(1500)),
            ),
            destination(
                DestinationBucket::Health,
                "santé",
                unit("consultation", "consultations chez le généraliste", dec!(30)),
            ),
            destination(
                DestinationBucket::FamilyAutonomy,
                "famille et autonomie",
                unit("heure_aide", "heures d'aide à domicile", dec!(25)),
            ),
            destination(
                DestinationBucket::SocialDebt,
                "dette sociale",
                unit("baguette", "baguettes de pain", dec!(1.20)),
            ),
        ],
    }
}

pub fn tax_tables() -> TaxTables {
    TaxTables {
        rates: rate_table(),
        other_taxes: other_tax_rates(),
        budget: budget_table(),
        destinations: destination_table(),
    }
}
