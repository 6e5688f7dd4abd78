//! Claiming-age optimization over ages 62 through 70

use log::debug;
use serde::{Deserialize, Serialize};

use super::present_value::present_value;
use crate::benefits::projector;
use crate::constants::{ValuationAssumptions, MAX_CLAIM_AGE, MIN_CLAIM_AGE};
use crate::error::{EngineError, EngineResult};

/// PV gain a later age must exceed to displace an earlier one
const TIE_TOLERANCE: f64 = 0.01;

/// Slack for binary error when comparing cent-rounded amounts
const COMPARE_EPSILON: f64 = 1e-9;

/// One evaluated claiming age
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClaimingCandidate {
    pub age: u8,
    pub benefit: f64,
    pub present_value: f64,
}

/// The PV-maximizing claiming age, with every candidate evaluated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimingDecision {
    pub age: u8,
    pub benefit: f64,
    pub present_value: f64,
    pub candidates: Vec<ClaimingCandidate>,
}

/// Choose the claiming age with the largest present value
///
/// Ages at or beyond life expectancy are valued at zero. Ties within a cent go
/// to the earlier age.
pub fn optimal_age(
    pia: f64,
    fra_months: u32,
    current_age: f64,
    assumptions: &ValuationAssumptions,
) -> EngineResult<ClaimingDecision> {
    if !pia.is_finite() || pia < 0.0 {
        return Err(EngineError::InvalidEarnings(format!(
            "PIA must be a non-negative amount, got {}",
            pia
        )));
    }
    if !(assumptions.life_expectancy > MIN_CLAIM_AGE as f64) {
        return Err(EngineError::DegenerateAnnuityInputs(format!(
            "life expectancy {} must exceed the earliest claiming age {}",
            assumptions.life_expectancy, MIN_CLAIM_AGE
        )));
    }

    let evaluate = |age: u8| -> EngineResult<ClaimingCandidate> {
        let benefit = projector::benefit_at(pia, fra_months, age as u32 * 12);
        let pv = if assumptions.life_expectancy <= age as f64 {
            0.0
        } else {
            present_value(benefit, age as f64, current_age, assumptions)?
        };
        Ok(ClaimingCandidate { age, benefit, present_value: pv })
    };

    let mut best = evaluate(MIN_CLAIM_AGE)?;
    let mut candidates = Vec::with_capacity((MAX_CLAIM_AGE - MIN_CLAIM_AGE + 1) as usize);
    candidates.push(best);
    for age in MIN_CLAIM_AGE + 1..=MAX_CLAIM_AGE {
        let candidate = evaluate(age)?;
        if outranks(&candidate, &best) {
            best = candidate;
        }
        candidates.push(candidate);
    }

    debug!(
        "Optimal claiming age {} (benefit {:.2}, PV {:.2})",
        best.age, best.benefit, best.present_value
    );

    Ok(ClaimingDecision {
        age: best.age,
        benefit: best.benefit,
        present_value: best.present_value,
        candidates,
    })
}

/// Whether `candidate` beats `incumbent` by more than a cent
fn outranks(candidate: &ClaimingCandidate, incumbent: &ClaimingCandidate) -> bool {
    candidate.present_value - incumbent.present_value > TIE_TOLERANCE + COMPARE_EPSILON
}
