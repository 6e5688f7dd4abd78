//! Present value of a COLA-adjusted monthly benefit stream
//!
//! Payments are a monthly growing annuity-due: the first check arrives at the
//! claiming age, each later check grows by COLA/12, and the last is paid the
//! month before the life-expectancy age. The value at the claiming age is then
//! discounted back to the client's current age.

use crate::constants::ValuationAssumptions;
use crate::error::{EngineError, EngineResult};
use crate::money::round_cent;

/// Rates closer than this are treated as equal (the level-real-value case)
const RATE_EPSILON: f64 = 1e-12;

/// Value at the first payment date of `n_months` payments starting at `amount`
/// and growing by `monthly_growth` per month, discounted at `monthly_rate`
pub fn pv_growing_annuity_due(amount: f64, n_months: u32, monthly_rate: f64, monthly_growth: f64) -> f64 {
    if n_months == 0 {
        return 0.0;
    }

    let n = n_months as f64;
    if (monthly_rate - monthly_growth).abs() < RATE_EPSILON {
        return amount * n;
    }

    let ratio = (1.0 + monthly_growth) / (1.0 + monthly_rate);
    amount * (1.0 + monthly_rate) * (1.0 - ratio.powf(n)) / (monthly_rate - monthly_growth)
}

/// Discount factor over a (possibly fractional) number of months
pub fn discount_factor(monthly_rate: f64, months: f64) -> f64 {
    (1.0 + monthly_rate).powf(-months)
}

/// Number of monthly payments between claiming and life expectancy
pub fn payment_count(claim_age: f64, life_expectancy: f64) -> u32 {
    let n = ((life_expectancy - claim_age) * 12.0).round();
    if n <= 0.0 { 0 } else { n as u32 }
}

/// Present value at `current_age` of claiming `monthly_benefit` at `claim_age`
pub fn present_value(
    monthly_benefit: f64,
    claim_age: f64,
    current_age: f64,
    assumptions: &ValuationAssumptions,
) -> EngineResult<f64> {
    let ValuationAssumptions { life_expectancy, discount_rate, cola } = *assumptions;

    let inputs = [monthly_benefit, claim_age, current_age, life_expectancy, discount_rate, cola];
    if inputs.iter().any(|v| !v.is_finite()) {
        return Err(EngineError::DegenerateAnnuityInputs(format!(
            "inputs must be finite (benefit {}, claim age {}, current age {}, life expectancy {}, rate {}, cola {})",
            monthly_benefit, claim_age, current_age, life_expectancy, discount_rate, cola
        )));
    }
    if life_expectancy <= claim_age {
        return Err(EngineError::DegenerateAnnuityInputs(format!(
            "life expectancy {} must exceed claim age {}",
            life_expectancy, claim_age
        )));
    }

    let r = discount_rate / 12.0;
    let g = cola / 12.0;
    if r <= -1.0 || g <= -1.0 {
        return Err(EngineError::DegenerateAnnuityInputs(format!(
            "monthly rates must exceed -100% (rate {}, cola {})",
            discount_rate, cola
        )));
    }

    let n = payment_count(claim_age, life_expectancy);
    if n == 0 {
        return Ok(0.0);
    }

    let years_until_start = (claim_age - current_age).max(0.0);
    let value_at_start = pv_growing_annuity_due(monthly_benefit, n, r, g);
    Ok(round_cent(value_at_start * discount_factor(r, 12.0 * years_until_start)))
}
