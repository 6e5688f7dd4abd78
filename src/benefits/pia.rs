//! Primary Insurance Amount from AIME via the bend-point formula

use crate::constants::TaxYearConstants;
use crate::money::floor_cent;

/// Replacement rate below the first bend point
pub const FIRST_FACTOR: f64 = 0.90;

/// Replacement rate between the bend points
pub const SECOND_FACTOR: f64 = 0.32;

/// Replacement rate above the second bend point
pub const THIRD_FACTOR: f64 = 0.15;

/// PIA for a given AIME and bend points, truncated to the cent
pub fn compute(aime: f64, bend1: f64, bend2: f64) -> f64 {
    let aime = aime.max(0.0);

    let pia = if aime <= bend1 {
        FIRST_FACTOR * aime
    } else if aime <= bend2 {
        FIRST_FACTOR * bend1 + SECOND_FACTOR * (aime - bend1)
    } else {
        FIRST_FACTOR * bend1 + SECOND_FACTOR * (bend2 - bend1) + THIRD_FACTOR * (aime - bend2)
    };

    floor_cent(pia)
}

/// PIA using a tax year's bend points
pub fn compute_for_year(aime: f64, constants: &TaxYearConstants) -> f64 {
    compute(aime, constants.bend1, constants.bend2)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BEND1: f64 = 1_174.0;
    const BEND2: f64 = 7_078.0;

    #[test]
    fn test_aime_5000() {
        // 1174 * 0.9 + (5000 - 1174) * 0.32 = 1056.60 + 1224.32
        assert_eq!(compute(5_000.0, BEND1, BEND2), 2280.92);
    }

    #[test]
    fn test_each_region() {
        assert_eq!(compute(0.0, BEND1, BEND2), 0.0);
        assert_eq!(compute(1_000.0, BEND1, BEND2), 900.0);
        assert_eq!(compute(BEND1, BEND1, BEND2), 1056.60);
        // 1056.60 + 0.32 * 5904 = 1056.60 + 1889.28
        assert_eq!(compute(BEND2, BEND1, BEND2), 2945.88);
        // 2945.88 + 0.15 * 2922
        assert_eq!(compute(10_000.0, BEND1, BEND2), 3384.18);
    }

    #[test]
    fn test_truncates_rather_than_rounds() {
        // 1056.60 + 0.32 * 0.05 = 1056.616 truncates to 1056.61
        assert_eq!(compute(1_174.05, BEND1, BEND2), 1056.61);
        // 2945.88 + 0.15 * 0.03 = 2945.8845 truncates to 2945.88
        assert_eq!(compute(7_078.03, BEND1, BEND2), 2945.88);
    }

    #[test]
    fn test_non_decreasing() {
        let mut prev = -1.0;
        for step in 0..1_200 {
            let pia = compute(step as f64 * 10.0, BEND1, BEND2);
            assert!(pia >= prev, "PIA decreased at AIME {}", step * 10);
            prev = pia;
        }
    }

    #[test]
    fn test_marginal_rate_decreases_across_bends() {
        let slope = |lo: f64, hi: f64| {
            (compute(hi, BEND1, BEND2) - compute(lo, BEND1, BEND2)) / (hi - lo)
        };

        let first = slope(100.0, 1_100.0);
        let second = slope(2_000.0, 3_000.0);
        let third = slope(8_000.0, 9_000.0);

        assert!((first - 0.90).abs() < 1e-4);
        assert!((second - 0.32).abs() < 1e-4);
        assert!((third - 0.15).abs() < 1e-4);
        assert!(first > second && second > third);
    }

    #[test]
    fn test_compute_for_year() {
        let constants = TaxYearConstants::new(BEND1, BEND2, 168_600.0, 1_730.0);
        assert_eq!(compute_for_year(5_000.0, &constants), 2280.92);
    }
}
