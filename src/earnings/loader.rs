//! Load an earnings ledger from CSV
//!
//! Required columns: year, taxed_ss_earnings, taxed_medicare_earnings.
//! Tax columns and credits_earned are optional; credits are always recomputed.

use std::path::Path;

use csv::Reader;
use log::info;

use super::{EarningsLedger, EarningsRecord};
use crate::constants::TaxYearTable;
use crate::error::EngineResult;

/// Raw CSV row matching the ledger export columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    year: i32,
    taxed_ss_earnings: f64,
    taxed_medicare_earnings: f64,
    #[serde(default)]
    ss_tax_paid: Option<f64>,
    #[serde(default)]
    medicare_tax_paid: Option<f64>,
    #[serde(default)]
    employer_ss_paid: Option<f64>,
    #[serde(default)]
    employer_medicare_paid: Option<f64>,
    #[serde(default)]
    credits_earned: Option<u8>,
}

impl CsvRow {
    fn into_record(self) -> EarningsRecord {
        EarningsRecord {
            year: self.year,
            taxed_ss_earnings: self.taxed_ss_earnings,
            taxed_medicare_earnings: self.taxed_medicare_earnings,
            ss_tax_paid: self.ss_tax_paid.unwrap_or(0.0),
            medicare_tax_paid: self.medicare_tax_paid.unwrap_or(0.0),
            employer_ss_paid: self.employer_ss_paid.unwrap_or(0.0),
            employer_medicare_paid: self.employer_medicare_paid.unwrap_or(0.0),
            credits_earned: self.credits_earned.unwrap_or(0),
        }
    }
}

/// Load a ledger from any reader, validated against `current_year`
pub fn load_earnings_from_reader<R: std::io::Read>(
    reader: R,
    table: &TaxYearTable,
    current_year: i32,
) -> EngineResult<EarningsLedger> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut ledger = EarningsLedger::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        ledger.upsert(row.into_record());
    }

    let corrected = ledger.normalize(table, current_year)?;
    info!(
        "Loaded {} earnings years ({} credit values corrected)",
        ledger.len(),
        corrected
    );
    Ok(ledger)
}

/// Load a ledger from a CSV file
pub fn load_earnings<P: AsRef<Path>>(
    path: P,
    table: &TaxYearTable,
    current_year: i32,
) -> EngineResult<EarningsLedger> {
    let file = std::fs::File::open(path)?;
    load_earnings_from_reader(file, table, current_year)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;

    #[test]
    fn test_load_minimal_columns() {
        let data = "year,taxed_ss_earnings,taxed_medicare_earnings\n\
                    2021,50000,50000\n\
                    2020,1000,1000\n";
        let ledger = load_earnings_from_reader(data.as_bytes(), &TaxYearTable::published(), 2024).unwrap();

        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.get(2021).unwrap().credits_earned, 4);
        // 1000 / 1410 (2020 credit amount) = 0
        assert_eq!(ledger.get(2020).unwrap().credits_earned, 0);
    }

    #[test]
    fn test_load_full_columns() {
        let data = "year,taxed_ss_earnings,taxed_medicare_earnings,ss_tax_paid,medicare_tax_paid,employer_ss_paid,employer_medicare_paid,credits_earned\n\
                    2024,168600,200000,10453.2,2900,10453.2,2900,4\n\
                    2023,3300,3300,204.6,47.85,204.6,47.85,\n";
        let ledger = load_earnings_from_reader(data.as_bytes(), &TaxYearTable::published(), 2024).unwrap();

        let latest = ledger.get(2024).unwrap();
        assert_eq!(latest.ss_tax_paid, 10_453.2);
        assert_eq!(latest.credits_earned, 4);
        // 3300 / 1640 = 2
        assert_eq!(ledger.get(2023).unwrap().credits_earned, 2);
    }

    #[test]
    fn test_load_sample_ledger() {
        let ledger = load_earnings("data/samples/earnings_1958.csv", &TaxYearTable::published(), 2018)
            .expect("Failed to load sample ledger");

        assert_eq!(ledger.len(), 35);
        assert_eq!(ledger.get(1984).unwrap().ss_tax_paid, 3_720.0);
        assert_eq!(ledger.credit_summary().total_credits, 140);
        assert_eq!(crate::benefits::aime::compute(&ledger.ss_earnings()).unwrap(), 5_000.0);
    }

    #[test]
    fn test_load_rejects_bad_rows() {
        let table = TaxYearTable::published();

        let negative = "year,taxed_ss_earnings,taxed_medicare_earnings\n2020,-5,0\n";
        assert!(matches!(
            load_earnings_from_reader(negative.as_bytes(), &table, 2024),
            Err(EngineError::InvalidEarnings(_))
        ));

        let future = "year,taxed_ss_earnings,taxed_medicare_earnings\n2030,5,5\n";
        assert!(matches!(
            load_earnings_from_reader(future.as_bytes(), &table, 2024),
            Err(EngineError::EarningsYearOutOfRange { .. })
        ));

        let garbled = "year,taxed_ss_earnings,taxed_medicare_earnings\nabc,5,5\n";
        assert!(matches!(
            load_earnings_from_reader(garbled.as_bytes(), &table, 2024),
            Err(EngineError::Csv(_))
        ));
    }
}
