//! Program constants and valuation assumptions threaded through every calculation

mod tax_year;
pub mod loader;

pub use tax_year::{TaxYearConstants, TaxYearTable};

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Credits required for Medicare (and retirement benefit) eligibility
pub const MEDICARE_CREDITS_REQUIRED: u32 = 40;

/// Maximum credits earnable in one work year
pub const MAX_CREDITS_PER_YEAR: u8 = 4;

/// Earliest claiming age
pub const MIN_CLAIM_AGE: u8 = 62;

/// Age at which delayed retirement credits stop accruing
pub const MAX_CLAIM_AGE: u8 = 70;

/// Earliest work year accepted in an earnings ledger
pub const FIRST_EARNINGS_YEAR: i32 = 1950;

/// Employee Social Security (OASDI) tax rate
pub const SS_TAX_RATE: f64 = 0.062;

/// Employee Medicare (HI) tax rate
pub const MEDICARE_TAX_RATE: f64 = 0.0145;

/// Assumptions used to value a benefit stream
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValuationAssumptions {
    /// Age at which payments stop
    pub life_expectancy: f64,

    /// Annual discount rate
    pub discount_rate: f64,

    /// Annual cost-of-living adjustment applied to payments
    pub cola: f64,
}

impl Default for ValuationAssumptions {
    fn default() -> Self {
        Self {
            life_expectancy: 90.0,
            discount_rate: 0.03,
            cola: 0.025,
        }
    }
}

/// Container for all engine inputs that are not client data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub tax_years: TaxYearTable,

    #[serde(default)]
    pub valuation: ValuationAssumptions,

    /// Tax year whose constants are used when no year-specific value applies
    #[serde(default = "default_reference_year")]
    pub reference_year: i32,
}

fn default_reference_year() -> i32 {
    2024
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tax_years: TaxYearTable::published(),
            valuation: ValuationAssumptions::default(),
            reference_year: default_reference_year(),
        }
    }
}

impl EngineConfig {
    /// Config with the tax year table loaded from CSV in the default location
    pub fn from_csv() -> EngineResult<Self> {
        Self::from_csv_path(Path::new(loader::DEFAULT_CONSTANTS_PATH))
    }

    /// Config with the tax year table loaded from CSV in a specific directory
    pub fn from_csv_path(path: &Path) -> EngineResult<Self> {
        Ok(Self {
            tax_years: loader::load_tax_years(path)?,
            ..Self::default()
        })
    }

    /// Load a complete config from a JSON file
    pub fn from_json_path(path: &Path) -> EngineResult<Self> {
        let file = File::open(path)?;
        let config: Self = serde_json::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    /// Replace the valuation assumptions
    pub fn with_valuation(mut self, valuation: ValuationAssumptions) -> Self {
        self.valuation = valuation;
        self
    }

    /// Constants of the reference year
    pub fn reference_constants(&self) -> TaxYearConstants {
        self.tax_years.for_year(self.reference_year)
    }

    pub fn validate(&self) -> EngineResult<()> {
        self.tax_years.validate()?;
        let v = &self.valuation;
        if !(v.life_expectancy.is_finite() && v.discount_rate.is_finite() && v.cola.is_finite()) {
            return Err(EngineError::DegenerateAnnuityInputs(
                "valuation assumptions must be finite".to_string(),
            ));
        }
        Ok(())
    }
}
