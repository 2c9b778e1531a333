//! Tables compiled into the binary.
//!
//! The files under `data/` are embedded with [`include_str!`] so the
//! estimator runs without any file on disk. Each one can be overridden from
//! the tables configuration file.

// ---------------------------------------------------------------------------
// Embedded table sources
// ---------------------------------------------------------------------------

/// Contribution rules, income-tax brackets and VAT parameters for 2026.
pub const RATES_TOML: &str = include_str!("../data/rates_2026.toml");

/// Excise rates, vehicle presets and CEHR brackets for 2026.
pub const OTHER_TAXES_TOML: &str = include_str!("../data/other_taxes_2026.toml");

/// Spending sectors with their share of total and state spending.
pub const BUDGET_SECTORS_JSON: &str = include_str!("../data/budget_sectors.json");

/// Programme, action and sous-action breakdown keyed by sector id.
pub const BUDGET_DETAILS_JSON: &str = include_str!("../data/budget_details.json");

/// Reference units used to express amounts as concrete quantities.
pub const EQUIVALENCES_JSON: &str = include_str!("../data/equivalences.json");

/// CSG repartition and presentation of the four contribution buckets.
pub const COTISATION_DESTINATIONS_JSON: &str =
    include_str!("../data/cotisation_destinations.json");
