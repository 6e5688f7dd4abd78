//! Average Indexed Monthly Earnings

use crate::earnings::EarningsRecord;
use crate::error::{EngineError, EngineResult};
use crate::money::floor_dollar;

/// Number of highest-earning years averaged
pub const COMPUTATION_YEARS: usize = 35;

/// Months in the computation period (35 years x 12)
pub const COMPUTATION_MONTHS: f64 = 420.0;

/// AIME from taxed Social Security earnings, one value per work year
///
/// The top 35 years are summed and divided by 420 regardless of how many
/// years were supplied, so a short history is zero-padded rather than
/// averaged over the years worked.
pub fn compute(ss_earnings_by_year: &[f64]) -> EngineResult<f64> {
    if let Some(bad) = ss_earnings_by_year.iter().find(|e| !e.is_finite() || **e < 0.0) {
        return Err(EngineError::InvalidEarnings(format!(
            "earnings must be a non-negative amount, got {}",
            bad
        )));
    }

    let mut sorted = ss_earnings_by_year.to_vec();
    sorted.sort_by(|a, b| b.total_cmp(a));

    let top: f64 = sorted.iter().take(COMPUTATION_YEARS).sum();
    Ok(floor_dollar(top / COMPUTATION_MONTHS))
}

/// AIME over a ledger's taxed Social Security earnings
pub fn compute_from_records(records: &[EarningsRecord]) -> EngineResult<f64> {
    let earnings: Vec<f64> = records.iter().map(|r| r.taxed_ss_earnings).collect();
    compute(&earnings)
}
