//! Monthly benefit at a claiming age: early reduction and delayed credits

use std::collections::BTreeMap;

use log::debug;

use crate::constants::{MAX_CLAIM_AGE, MIN_CLAIM_AGE};
use crate::error::{EngineError, EngineResult};
use crate::money::{floor_cent, round_cent};

/// Monthly reduction for the first 36 months claimed early (5/9 of 1%)
pub const EARLY_REDUCTION_FIRST_36: f64 = 0.00556;

/// Monthly reduction beyond 36 months early (5/12 of 1%)
pub const EARLY_REDUCTION_BEYOND_36: f64 = 0.00417;

/// Monthly delayed retirement credit (2/3 of 1%)
pub const DELAYED_CREDIT_PER_MONTH: f64 = 0.00667;

const FIRST_TIER_MONTHS: u32 = 36;

/// Benefit as a fraction of PIA when claiming at `claim_months`
pub fn adjustment_factor(fra_months: u32, claim_months: u32) -> f64 {
    if claim_months < fra_months {
        let early = fra_months - claim_months;
        let reduction = if early <= FIRST_TIER_MONTHS {
            early as f64 * EARLY_REDUCTION_FIRST_36
        } else {
            FIRST_TIER_MONTHS as f64 * EARLY_REDUCTION_FIRST_36
                + (early - FIRST_TIER_MONTHS) as f64 * EARLY_REDUCTION_BEYOND_36
        };
        1.0 - reduction
    } else {
        let max_delay = (MAX_CLAIM_AGE as u32 * 12).saturating_sub(fra_months);
        let delayed = (claim_months - fra_months).min(max_delay);
        1.0 + delayed as f64 * DELAYED_CREDIT_PER_MONTH
    }
}

/// Monthly benefit when claiming at `claim_months` of age
pub fn benefit_at(pia: f64, fra_months: u32, claim_months: u32) -> f64 {
    if claim_months == fra_months {
        return pia;
    }
    floor_cent(pia * adjustment_factor(fra_months, claim_months))
}

/// Benefit at each whole claiming age 62 through 70
pub fn benefits_by_age(pia: f64, fra_months: u32) -> BTreeMap<u8, f64> {
    (MIN_CLAIM_AGE..=MAX_CLAIM_AGE)
        .map(|age| (age, benefit_at(pia, fra_months, age as u32 * 12)))
        .collect()
}

/// Recover a PIA from benefits quoted at known claiming ages
///
/// An anchor at exactly FRA is returned as-is. Otherwise the anchor closest
/// to FRA is divided by its adjustment factor; the smaller the adjustment,
/// the less truncation error is amplified.
pub fn derive_pia_from_anchors(anchors: &BTreeMap<u8, f64>, fra_months: u32) -> EngineResult<f64> {
    if let Some(bad) = anchors.values().find(|b| !b.is_finite() || **b < 0.0) {
        return Err(EngineError::InvalidEarnings(format!(
            "anchor benefit must be a non-negative amount, got {}",
            bad
        )));
    }

    let closest = anchors
        .iter()
        .filter(|&(&age, _)| (MIN_CLAIM_AGE..=MAX_CLAIM_AGE).contains(&age))
        .min_by_key(|&(&age, _)| (age as i64 * 12 - fra_months as i64).abs());

    let (&age, &benefit) = closest.ok_or(EngineError::MissingPiaForProjection)?;
    let claim_months = age as u32 * 12;

    let pia = if claim_months == fra_months {
        benefit
    } else {
        round_cent(benefit / adjustment_factor(fra_months, claim_months))
    };

    debug!(
        "Derived PIA {:.2} from anchor age {} benefit {:.2} (FRA {} months)",
        pia, age, benefit, fra_months
    );
    Ok(pia)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const PIA: f64 = 2280.92;
    const FRA_1958: u32 = 800;

    #[test]
    fn test_fra_claim_returns_pia_exactly() {
        for pia in [0.0, 0.01, 1234.56, PIA, 4018.0] {
            assert_eq!(benefit_at(pia, FRA_1958, FRA_1958), pia);
            assert_eq!(benefit_at(pia, 804, 804), pia);
        }
    }

    #[test]
    fn test_claim_at_62() {
        // early = 56, reduction = 36 * 0.00556 + 20 * 0.00417 = 0.28356
        assert_abs_diff_eq!(adjustment_factor(FRA_1958, 744), 1.0 - 0.28356, epsilon = 1e-12);
        assert_eq!(benefit_at(PIA, FRA_1958, 744), 1634.14);
    }

    #[test]
    fn test_claim_at_70() {
        // delayed = 40, increase = 40 * 0.00667 = 0.2668
        assert_abs_diff_eq!(adjustment_factor(FRA_1958, 840), 1.2668, epsilon = 1e-12);
        assert_eq!(benefit_at(PIA, FRA_1958, 840), 2889.46);
    }

    #[test]
    fn test_delayed_credits_stop_at_70() {
        assert_eq!(benefit_at(PIA, FRA_1958, 852), benefit_at(PIA, FRA_1958, 840));
        assert_eq!(benefit_at(PIA, FRA_1958, 900), benefit_at(PIA, FRA_1958, 840));
    }

    #[test]
    fn test_first_tier_only() {
        // 24 months early at FRA 67: 24 * 0.00556 = 0.13344
        assert_abs_diff_eq!(adjustment_factor(804, 780), 1.0 - 0.13344, epsilon = 1e-12);
        // exactly 36 months early
        assert_abs_diff_eq!(adjustment_factor(804, 768), 1.0 - 0.20016, epsilon = 1e-12);
    }

    #[test]
    fn test_strictly_increasing_62_to_70() {
        for fra in [792, 800, 804] {
            let mut prev = -1.0;
            for months in 744..=840 {
                let benefit = benefit_at(PIA, fra, months);
                assert!(benefit > prev, "not increasing at {} months (FRA {})", months, fra);
                prev = benefit;
            }
        }
    }

    #[test]
    fn test_benefits_by_age_covers_62_to_70() {
        let table = benefits_by_age(PIA, FRA_1958);
        assert_eq!(table.len(), 9);
        assert_eq!(table.keys().copied().collect::<Vec<_>>(), (62u8..=70).collect::<Vec<_>>());
        assert_eq!(table[&62], 1634.14);
        assert_eq!(table[&70], 2889.46);
    }

    #[test]
    fn test_derive_pia_from_fra_anchor() {
        let anchors = BTreeMap::from([(62, 1400.0), (67, 2000.0), (70, 2480.0)]);
        assert_eq!(derive_pia_from_anchors(&anchors, 804).unwrap(), 2000.0);
    }

    #[test]
    fn test_derive_pia_inverts_adjustment() {
        let anchors = BTreeMap::from([(62, benefit_at(PIA, FRA_1958, 744))]);
        let derived = derive_pia_from_anchors(&anchors, FRA_1958).unwrap();
        assert_abs_diff_eq!(derived, PIA, epsilon = 0.02);
    }

    #[test]
    fn test_derive_pia_prefers_anchor_nearest_fra() {
        // FRA 66y8m: 67 is 4 months away, 62 is 56 months away
        let anchors = BTreeMap::from([(62, 1.0), (67, benefit_at(PIA, FRA_1958, 804))]);
        let derived = derive_pia_from_anchors(&anchors, FRA_1958).unwrap();
        assert_abs_diff_eq!(derived, PIA, epsilon = 0.01);
    }

    #[test]
    fn test_derive_pia_without_anchors() {
        let empty = BTreeMap::new();
        assert!(matches!(
            derive_pia_from_anchors(&empty, FRA_1958),
            Err(EngineError::MissingPiaForProjection)
        ));

        let out_of_range = BTreeMap::from([(55, 900.0)]);
        assert!(matches!(
            derive_pia_from_anchors(&out_of_range, FRA_1958),
            Err(EngineError::MissingPiaForProjection)
        ));
    }
}
