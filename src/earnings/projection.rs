//! Synthesized earnings history from a single manually entered income

use log::debug;

use super::{EarningsLedger, EarningsRecord};
use crate::constants::{TaxYearTable, FIRST_EARNINGS_YEAR};
use crate::error::{EngineError, EngineResult};

/// Age of the first assumed working year
pub const START_WORK_AGE: i32 = 22;

/// Age of the last assumed working year (the year before eligibility at 62)
pub const LAST_WORK_AGE: i32 = 61;

/// History built from a level income
#[derive(Debug, Clone)]
pub struct ManualHistory {
    /// Records for work years up to and including `as_of_year`
    pub ledger: EarningsLedger,

    /// Capped SS earnings for every assumed work year, past and future
    pub projected_ss_earnings: Vec<f64>,
}

/// Assume `annual_income` every year from age 22 through 61
///
/// Each year is capped at that year's wage base. Years already worked become
/// ledger records (and earn credits); future years only feed the AIME.
pub fn project_manual_history(
    birth_year: i32,
    as_of_year: i32,
    annual_income: f64,
    table: &TaxYearTable,
) -> EngineResult<ManualHistory> {
    if !annual_income.is_finite() || annual_income < 0.0 {
        return Err(EngineError::InvalidEarnings(format!(
            "annual income must be a non-negative amount, got {}",
            annual_income
        )));
    }

    let first_year = (birth_year + START_WORK_AGE).max(FIRST_EARNINGS_YEAR);
    let last_year = birth_year + LAST_WORK_AGE;

    let mut ledger = EarningsLedger::new();
    let mut projected = Vec::new();

    for year in first_year..=last_year {
        let record = EarningsRecord::from_wages(year, annual_income, &table.for_year(year))?;
        projected.push(record.taxed_ss_earnings);
        if year <= as_of_year {
            ledger.upsert(record);
        }
    }

    debug!(
        "Projected {} work years ({} already worked) at income {:.2}",
        projected.len(),
        ledger.len(),
        annual_income
    );

    Ok(ManualHistory {
        ledger,
        projected_ss_earnings: projected,
    })
}
