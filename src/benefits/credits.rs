//! Credits (quarters of coverage) and Medicare eligibility

use serde::{Deserialize, Serialize};

use crate::constants::{MAX_CREDITS_PER_YEAR, MEDICARE_CREDITS_REQUIRED};
use crate::earnings::EarningsRecord;
use crate::error::{EngineError, EngineResult};

/// Lifetime credit totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditSummary {
    pub total_credits: u32,
    pub medicare_eligible: bool,
}

impl CreditSummary {
    pub fn from_total(total_credits: u32) -> Self {
        Self {
            total_credits,
            medicare_eligible: total_credits >= MEDICARE_CREDITS_REQUIRED,
        }
    }

    /// Credits still needed for eligibility
    pub fn credits_remaining(&self) -> u32 {
        MEDICARE_CREDITS_REQUIRED.saturating_sub(self.total_credits)
    }
}

/// Credits earned for one year of earnings
pub fn credits_for(earnings: f64, credit_amount: f64) -> EngineResult<u8> {
    if !earnings.is_finite() || earnings < 0.0 {
        return Err(EngineError::InvalidEarnings(format!(
            "earnings must be a non-negative amount, got {}",
            earnings
        )));
    }
    if !(credit_amount.is_finite() && credit_amount > 0.0) {
        return Err(EngineError::InvalidTaxYearTable(format!(
            "credit amount must be positive, got {}",
            credit_amount
        )));
    }

    let quarters = (earnings / credit_amount).floor();
    Ok(quarters.min(MAX_CREDITS_PER_YEAR as f64) as u8)
}

/// Sum credits over a ledger
pub fn aggregate<'a, I>(records: I) -> CreditSummary
where
    I: IntoIterator<Item = &'a EarningsRecord>,
{
    let total: u32 = records.into_iter().map(|r| r.credits_earned as u32).sum();
    CreditSummary::from_total(total)
}
