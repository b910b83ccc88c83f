//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading compensation
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{
    BenefitsTable, CompensationConfig, CurrencySettings, EquityValuationConfig,
    JurisdictionMetadata, TaxYearConfig, ValidationPolicy,
};

/// Loads and provides access to compensation configuration.
///
/// # Directory Structure
///
/// ```text
/// config/israel/
/// ├── jurisdiction.yaml  # Jurisdiction metadata
/// ├── benefits.yaml      # Leave rules, health tiers, perk benchmarks
/// ├── equity.yaml        # Risk factors
/// ├── currency.yaml      # Exchange-rate sources and fallback
/// ├── validation.yaml    # Plausibility thresholds
/// └── tax_years/
///     └── 2024.yaml      # Tax tables effective from this year
/// ```
///
/// # Example
///
/// ```no_run
/// use compensation_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/israel").unwrap();
/// let tables = loader.config().tax_year(2024).unwrap();
/// println!("Credit point: {}", tables.credit_point_value);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: CompensationConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if any required file is missing, contains invalid
    /// YAML, or the `tax_years` directory holds no tables.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<JurisdictionMetadata>(&path.join("jurisdiction.yaml"))?;
        let benefits = Self::load_yaml::<BenefitsTable>(&path.join("benefits.yaml"))?;
        let equity = Self::load_yaml::<EquityValuationConfig>(&path.join("equity.yaml"))?;
        let currency = Self::load_yaml::<CurrencySettings>(&path.join("currency.yaml"))?;
        let validation = Self::load_yaml::<ValidationPolicy>(&path.join("validation.yaml"))?;
        let tax_years = Self::load_tax_years(&path.join("tax_years"))?;

        let config =
            CompensationConfig::new(metadata, tax_years, benefits, equity, currency, validation);

        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads all tax-year files from the tax_years directory.
    fn load_tax_years(dir: &Path) -> EngineResult<Vec<TaxYearConfig>> {
        let dir_str = dir.display().to_string();

        let entries = fs::read_dir(dir).map_err(|_| EngineError::ConfigNotFound {
            path: dir_str.clone(),
        })?;

        let mut years = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                years.push(Self::load_yaml::<TaxYearConfig>(&path)?);
            }
        }

        if years.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no tax year files found)", dir_str),
            });
        }

        Ok(years)
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &CompensationConfig {
        &self.config
    }

    /// Consumes the loader and returns the configuration.
    pub fn into_config(self) -> CompensationConfig {
        self.config
    }
}
