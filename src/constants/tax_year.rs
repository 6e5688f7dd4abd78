//! Year-indexed program constants: bend points, wage base, and credit amount

use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Constants published for a single tax year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxYearConstants {
    /// First PIA bend point (monthly dollars)
    pub bend1: f64,

    /// Second PIA bend point (monthly dollars)
    pub bend2: f64,

    /// Maximum earnings subject to Social Security tax
    pub wage_base: f64,

    /// Earnings required for one credit (quarter of coverage)
    pub credit_amount: f64,
}

impl TaxYearConstants {
    pub fn new(bend1: f64, bend2: f64, wage_base: f64, credit_amount: f64) -> Self {
        Self { bend1, bend2, wage_base, credit_amount }
    }

    fn validate(&self, year: i32) -> EngineResult<()> {
        let finite = [self.bend1, self.bend2, self.wage_base, self.credit_amount]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(EngineError::InvalidTaxYearTable(format!(
                "year {} has a non-finite value",
                year
            )));
        }
        if self.credit_amount <= 0.0 {
            return Err(EngineError::InvalidTaxYearTable(format!(
                "year {} credit amount must be positive, got {}",
                year, self.credit_amount
            )));
        }
        if self.bend1 <= 0.0 || self.bend2 <= self.bend1 {
            return Err(EngineError::InvalidTaxYearTable(format!(
                "year {} bend points must satisfy 0 < bend1 < bend2, got {} / {}",
                year, self.bend1, self.bend2
            )));
        }
        if self.wage_base <= 0.0 {
            return Err(EngineError::InvalidTaxYearTable(format!(
                "year {} wage base must be positive, got {}",
                year, self.wage_base
            )));
        }
        Ok(())
    }
}

/// Lookup table of constants by tax year
///
/// Years outside the table clamp to the nearest year present, so a 1985 work
/// year resolves to the earliest loaded year and a future year to the latest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxYearTable {
    years: BTreeMap<i32, TaxYearConstants>,
}

impl TaxYearTable {
    /// Build a table from (year, constants) pairs, validating every entry
    pub fn from_entries<I>(entries: I) -> EngineResult<Self>
    where
        I: IntoIterator<Item = (i32, TaxYearConstants)>,
    {
        let years: BTreeMap<i32, TaxYearConstants> = entries.into_iter().collect();
        let table = Self { years };
        table.validate()?;
        Ok(table)
    }

    /// Table containing only the given year
    pub fn single_year(year: i32, constants: TaxYearConstants) -> EngineResult<Self> {
        Self::from_entries([(year, constants)])
    }

    /// Published SSA values for 2020 through 2025
    pub fn published() -> Self {
        let years = [
            (2020, TaxYearConstants::new(960.0, 5_785.0, 137_700.0, 1_410.0)),
            (2021, TaxYearConstants::new(996.0, 6_002.0, 142_800.0, 1_470.0)),
            (2022, TaxYearConstants::new(1_024.0, 6_172.0, 147_000.0, 1_510.0)),
            (2023, TaxYearConstants::new(1_115.0, 6_721.0, 160_200.0, 1_640.0)),
            (2024, TaxYearConstants::new(1_174.0, 7_078.0, 168_600.0, 1_730.0)),
            (2025, TaxYearConstants::new(1_226.0, 7_391.0, 176_100.0, 1_810.0)),
        ];
        Self { years: years.into_iter().collect() }
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.years.is_empty() {
            return Err(EngineError::InvalidTaxYearTable("table is empty".to_string()));
        }
        for (&year, constants) in &self.years {
            constants.validate(year)?;
        }
        Ok(())
    }

    /// Insert or replace the constants for a year
    pub fn insert(&mut self, year: i32, constants: TaxYearConstants) -> EngineResult<()> {
        constants.validate(year)?;
        self.years.insert(year, constants);
        Ok(())
    }

    /// Exact entry for a year, if loaded
    pub fn get_exact(&self, year: i32) -> Option<&TaxYearConstants> {
        self.years.get(&year)
    }

    /// Constants for a year, clamped to the nearest loaded year
    pub fn for_year(&self, year: i32) -> TaxYearConstants {
        if let Some(constants) = self.years.get(&year) {
            return *constants;
        }

        let below = self.years.range(..year).next_back();
        let above = self.years.range(year..).next();

        let (resolved, constants) = match (below, above) {
            (Some(b), Some(a)) => {
                if year - b.0 <= a.0 - year { b } else { a }
            }
            (Some(b), None) => b,
            (None, Some(a)) => a,
            // validate() rejects empty tables; a deserialized one falls back to published values
            (None, None) => return Self::published().for_year(year),
        };

        debug!("No tax year constants for {}, using {}", year, resolved);
        *constants
    }

    pub fn first_year(&self) -> Option<i32> {
        self.years.keys().next().copied()
    }

    pub fn last_year(&self) -> Option<i32> {
        self.years.keys().next_back().copied()
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i32, &TaxYearConstants)> {
        self.years.iter().map(|(&y, c)| (y, c))
    }
}

impl Default for TaxYearTable {
    fn default() -> Self {
        Self::published()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_table_falls_back_to_published() {
        let table: TaxYearTable = serde_json::from_str(r#"{"years":{}}"#).unwrap();
        assert!(table.validate().is_err());

        let published = TaxYearTable::published();
        assert_eq!(table.for_year(2022), published.for_year(2022));
        assert_eq!(table.for_year(2040), published.for_year(2025));
    }

    #[test]
    fn test_published_2024_snapshot() {
        let table = TaxYearTable::published();
        let c = table.for_year(2024);

        assert_eq!(c.bend1, 1_174.0);
        assert_eq!(c.bend2, 7_078.0);
        assert_eq!(c.wage_base, 168_600.0);
        assert_eq!(c.credit_amount, 1_730.0);
    }

    #[test]
    fn test_lookup_clamps_to_nearest_year() {
        let table = TaxYearTable::published();

        assert_eq!(table.for_year(1985), *table.get_exact(2020).unwrap());
        assert_eq!(table.for_year(2040), *table.get_exact(2025).unwrap());
    }

    #[test]
    fn test_lookup_gap_prefers_earlier_on_tie() {
        let table = TaxYearTable::from_entries([
            (2010, TaxYearConstants::new(761.0, 4_586.0, 106_800.0, 1_120.0)),
            (2012, TaxYearConstants::new(767.0, 4_624.0, 110_100.0, 1_130.0)),
        ])
        .unwrap();

        assert_eq!(table.for_year(2011).bend1, 761.0);
    }

    #[test]
    fn test_rejects_bad_entries() {
        assert!(TaxYearTable::from_entries(Vec::new()).is_err());
        assert!(TaxYearTable::single_year(2024, TaxYearConstants::new(1_174.0, 7_078.0, 168_600.0, 0.0)).is_err());
        assert!(TaxYearTable::single_year(2024, TaxYearConstants::new(7_078.0, 1_174.0, 168_600.0, 1_730.0)).is_err());
        assert!(TaxYearTable::single_year(2024, TaxYearConstants::new(f64::NAN, 7_078.0, 168_600.0, 1_730.0)).is_err());
    }

    #[test]
    fn test_insert_overrides_year() {
        let mut table = TaxYearTable::published();
        table.insert(2026, TaxYearConstants::new(1_250.0, 7_500.0, 180_000.0, 1_850.0)).unwrap();

        assert_eq!(table.last_year(), Some(2026));
        assert_eq!(table.for_year(2026).credit_amount, 1_850.0);
    }
}
