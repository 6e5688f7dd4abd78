//! CSV-based tax year loader
//!
//! Loads year-indexed program constants from data/constants/

use std::fs::File;
use std::path::Path;

use log::debug;

use super::tax_year::{TaxYearConstants, TaxYearTable};
use crate::error::EngineResult;

/// Default path to constants directory
pub const DEFAULT_CONSTANTS_PATH: &str = "data/constants";

/// File name of the tax year table inside the constants directory
pub const TAX_YEARS_FILE: &str = "tax_years.csv";

/// Raw CSV row: year,bend1,bend2,wage_base,credit_amount
#[derive(Debug, serde::Deserialize)]
struct TaxYearRow {
    year: i32,
    bend1: f64,
    bend2: f64,
    wage_base: f64,
    credit_amount: f64,
}

/// Load the tax year table from any reader
pub fn load_tax_years_from_reader<R: std::io::Read>(reader: R) -> EngineResult<TaxYearTable> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut entries = Vec::new();

    for result in csv_reader.deserialize() {
        let row: TaxYearRow = result?;
        entries.push((
            row.year,
            TaxYearConstants::new(row.bend1, row.bend2, row.wage_base, row.credit_amount),
        ));
    }

    debug!("Loaded {} tax year rows", entries.len());
    TaxYearTable::from_entries(entries)
}

/// Load tax_years.csv from the given directory
pub fn load_tax_years(path: &Path) -> EngineResult<TaxYearTable> {
    let file = File::open(path.join(TAX_YEARS_FILE))?;
    load_tax_years_from_reader(file)
}

/// Load tax_years.csv from the default location
pub fn load_default_tax_years() -> EngineResult<TaxYearTable> {
    load_tax_years(Path::new(DEFAULT_CONSTANTS_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_default_tax_years() {
        let result = load_default_tax_years();
        assert!(result.is_ok(), "Failed to load tax years: {:?}", result.err());

        let table = result.unwrap();
        assert!(table.len() >= 6);
        assert_eq!(table.for_year(2024), TaxYearTable::published().for_year(2024));
    }

    #[test]
    fn test_load_from_reader() {
        let data = "year,bend1,bend2,wage_base,credit_amount\n\
                    2023,1115,6721,160200,1640\n\
                    2024,1174,7078,168600,1730\n";
        let table = load_tax_years_from_reader(data.as_bytes()).unwrap();

        assert_eq!(table.first_year(), Some(2023));
        assert_eq!(table.for_year(2023).credit_amount, 1_640.0);
    }

    #[test]
    fn test_load_rejects_invalid_row() {
        let data = "year,bend1,bend2,wage_base,credit_amount\n2024,1174,7078,168600,0\n";
        assert!(load_tax_years_from_reader(data.as_bytes()).is_err());

        let data = "year,bend1,bend2,wage_base,credit_amount\n2024,abc,7078,168600,1730\n";
        assert!(load_tax_years_from_reader(data.as_bytes()).is_err());
    }
}
