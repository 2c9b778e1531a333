//! Table sources: embedded defaults, optionally overridden from files.

use std::fmt;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use impots_core::TaxTables;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::embedded;
use crate::loader::{TableLoadError, TableLoader};

/// Optional file overrides for each table.
///
/// Every field left unset falls back to the embedded 2026 table. Relative
/// paths are resolved against [`TablesConfig::base_dir`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TablesConfig {
    pub rates: Option<PathBuf>,
    pub other_taxes: Option<PathBuf>,
    pub budget_sectors: Option<PathBuf>,
    pub budget_details: Option<PathBuf>,
    pub equivalences: Option<PathBuf>,
    pub cotisation_destinations: Option<PathBuf>,
    /// CSV of `schedule,min,max,rate` rows replacing bracket schedules.
    pub brackets: Option<PathBuf>,
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

impl TablesConfig {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, TableLoadError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Read a configuration file. Relative paths inside it are resolved
    /// against the file's own directory.
    pub fn from_file(path: &Path) -> Result<Self, TableLoadError> {
        let content = fs::read_to_string(path).map_err(|source| TableLoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        debug!(path = %path.display(), "tables configuration read");
        Ok(config.with_base_dir(base_dir))
    }

    /// Set the directory relative override paths are resolved against.
    pub fn with_base_dir(
        mut self,
        dir: impl Into<PathBuf>,
    ) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    fn resolve(
        &self,
        path: &Path,
    ) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

/// Where a loaded table came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableSource {
    Embedded,
    File(PathBuf),
}

impl fmt::Display for TableSource {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            TableSource::Embedded => write!(f, "embedded"),
            TableSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Validated tables plus the source of each one.
#[derive(Debug, Clone)]
pub struct TableSet {
    pub tables: TaxTables,
    /// `(table name, source)` in load order.
    pub sources: Vec<(&'static str, TableSource)>,
}

impl TableSet {
    /// Load the embedded tables with no override.
    pub fn embedded() -> Result<Self, TableLoadError> {
        Self::load(&TablesConfig::default())
    }

    /// Load every table, reading overrides from disk where configured.
    pub fn load(config: &TablesConfig) -> Result<Self, TableLoadError> {
        let mut sources = Vec::new();

        let rates_str = read_or_embedded(
            config,
            "rates",
            &config.rates,
            embedded::RATES_TOML,
            &mut sources,
        )?;
        let other_str = read_or_embedded(
            config,
            "other_taxes",
            &config.other_taxes,
            embedded::OTHER_TAXES_TOML,
            &mut sources,
        )?;
        let sectors_str = read_or_embedded(
            config,
            "budget_sectors",
            &config.budget_sectors,
            embedded::BUDGET_SECTORS_JSON,
            &mut sources,
        )?;
        let details_str = read_or_embedded(
            config,
            "budget_details",
            &config.budget_details,
            embedded::BUDGET_DETAILS_JSON,
            &mut sources,
        )?;
        let equivalences_str = read_or_embedded(
            config,
            "equivalences",
            &config.equivalences,
            embedded::EQUIVALENCES_JSON,
            &mut sources,
        )?;
        let destinations_str = read_or_embedded(
            config,
            "cotisation_destinations",
            &config.cotisation_destinations,
            embedded::COTISATION_DESTINATIONS_JSON,
            &mut sources,
        )?;

        let mut rates = TableLoader::parse_rates(&rates_str)?;
        let mut other_taxes = TableLoader::parse_other_taxes(&other_str)?;
        let budget = TableLoader::parse_budget(&sectors_str, &details_str, &equivalences_str)?;
        let destinations = TableLoader::parse_destinations(&destinations_str)?;

        if let Some(path) = &config.brackets {
            let path = config.resolve(path);
            let file = File::open(&path).map_err(|source| TableLoadError::Io {
                path: path.display().to_string(),
                source,
            })?;
            let records = TableLoader::parse_brackets(file)?;
            let applied = TableLoader::apply_brackets(&records, &mut rates, &mut other_taxes)?;
            info!(path = %path.display(), applied, "bracket overrides applied");
            sources.push(("brackets", TableSource::File(path)));
        }

        Ok(Self {
            tables: TaxTables {
                rates,
                other_taxes,
                budget,
                destinations,
            },
            sources,
        })
    }
}

fn read_or_embedded(
    config: &TablesConfig,
    name: &'static str,
    path: &Option<PathBuf>,
    embedded: &'static str,
    sources: &mut Vec<(&'static str, TableSource)>,
) -> Result<String, TableLoadError> {
    match path {
        Some(path) => {
            let path = config.resolve(path);
            debug!(table = name, path = %path.display(), "reading table override");
            let content = fs::read_to_string(&path).map_err(|source| TableLoadError::Io {
                path: path.display().to_string(),
                source,
            })?;
            sources.push((name, TableSource::File(path)));
            Ok(content)
        }
        None => {
            sources.push((name, TableSource::Embedded));
            Ok(embedded.to_string())
        }
    }
}
