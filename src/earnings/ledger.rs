//! In-memory earnings ledger keyed by work year

use std::collections::BTreeMap;

use log::warn;

use super::EarningsRecord;
use crate::benefits::{credits, CreditSummary};
use crate::constants::TaxYearTable;
use crate::error::EngineResult;

/// A client's earnings, at most one record per work year
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EarningsLedger {
    records: BTreeMap<i32, EarningsRecord>,
}

impl EarningsLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger from unordered records; later duplicates replace earlier ones
    pub fn from_records<I: IntoIterator<Item = EarningsRecord>>(records: I) -> Self {
        let mut ledger = Self::new();
        for record in records {
            ledger.upsert(record);
        }
        ledger
    }

    /// Insert or replace the record for its year, returning the replaced record
    pub fn upsert(&mut self, record: EarningsRecord) -> Option<EarningsRecord> {
        let replaced = self.records.insert(record.year, record);
        if let Some(ref old) = replaced {
            warn!("Earnings for {} replaced", old.year);
        }
        replaced
    }

    /// Validate every record and bring `credits_earned` in line with the table
    ///
    /// Returns the number of records whose credits were corrected.
    pub fn normalize(&mut self, table: &TaxYearTable, current_year: i32) -> EngineResult<usize> {
        let mut corrected = 0;
        for record in self.records.values_mut() {
            record.validate(current_year)?;
            let expected = record.expected_credits(table)?;
            if record.credits_earned != expected {
                warn!(
                    "Credits for {} recorded as {}, recomputed as {}",
                    record.year, record.credits_earned, expected
                );
                record.credits_earned = expected;
                corrected += 1;
            }
        }
        Ok(corrected)
    }

    pub fn get(&self, year: i32) -> Option<&EarningsRecord> {
        self.records.get(&year)
    }

    /// Records in ascending year order
    pub fn records(&self) -> impl Iterator<Item = &EarningsRecord> {
        self.records.values()
    }

    pub fn to_vec(&self) -> Vec<EarningsRecord> {
        self.records.values().cloned().collect()
    }

    /// Taxed SS earnings, one value per year
    pub fn ss_earnings(&self) -> Vec<f64> {
        self.records.values().map(|r| r.taxed_ss_earnings).collect()
    }

    /// Lifetime credits as a fold over all records
    pub fn credit_summary(&self) -> CreditSummary {
        credits::aggregate(self.records.values())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;

    #[test]
    fn test_upsert_replaces_same_year() {
        let mut ledger = EarningsLedger::new();
        assert!(ledger.upsert(EarningsRecord::new(2020, 10_000.0, 10_000.0)).is_none());

        let replaced = ledger.upsert(EarningsRecord::new(2020, 20_000.0, 20_000.0));
        assert_eq!(replaced.map(|r| r.taxed_ss_earnings), Some(10_000.0));
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.get(2020).unwrap().taxed_ss_earnings, 20_000.0);
    }

    #[test]
    fn test_records_sorted_by_year() {
        let ledger = EarningsLedger::from_records([
            EarningsRecord::new(2022, 3.0, 3.0),
            EarningsRecord::new(2020, 1.0, 1.0),
            EarningsRecord::new(2021, 2.0, 2.0),
        ]);
        let years: Vec<i32> = ledger.records().map(|r| r.year).collect();
        assert_eq!(years, vec![2020, 2021, 2022]);
        assert_eq!(ledger.ss_earnings(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_normalize_recomputes_credits() {
        let table = TaxYearTable::published();
        let mut ledger = EarningsLedger::from_records([
            EarningsRecord { credits_earned: 4, ..EarningsRecord::new(2024, 3_500.0, 3_500.0) },
            EarningsRecord { credits_earned: 4, ..EarningsRecord::new(2023, 90_000.0, 90_000.0) },
        ]);

        assert_eq!(ledger.normalize(&table, 2024).unwrap(), 1);
        assert_eq!(ledger.get(2024).unwrap().credits_earned, 2);
        assert_eq!(ledger.get(2023).unwrap().credits_earned, 4);
    }

    #[test]
    fn test_normalize_rejects_out_of_range_year() {
        let table = TaxYearTable::published();
        let mut ledger = EarningsLedger::from_records([EarningsRecord::new(1949, 1.0, 1.0)]);
        assert!(matches!(
            ledger.normalize(&table, 2024),
            Err(EngineError::EarningsYearOutOfRange { .. })
        ));
    }

    #[test]
    fn test_credit_summary_fold() {
        let table = TaxYearTable::published();
        let mut ledger = EarningsLedger::from_records(
            (2015..2025).map(|y| EarningsRecord::new(y, 50_000.0, 50_000.0)),
        );
        ledger.normalize(&table, 2024).unwrap();

        let summary = ledger.credit_summary();
        assert_eq!(summary.total_credits, 40);
        assert!(summary.medicare_eligible);
    }
}
