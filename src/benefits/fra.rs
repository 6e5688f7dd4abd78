//! Full Retirement Age by birth year

use serde::{Deserialize, Serialize};

/// Full Retirement Age as years and months
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullRetirementAge {
    pub years: u32,
    pub months: u32,
}

impl FullRetirementAge {
    pub fn from_total_months(total: u32) -> Self {
        Self {
            years: total / 12,
            months: total % 12,
        }
    }

    pub fn total_months(&self) -> u32 {
        self.years * 12 + self.months
    }

    /// Age in fractional years (66y8m = 66.666...)
    pub fn as_years(&self) -> f64 {
        self.total_months() as f64 / 12.0
    }

    /// Integer claiming age equal to FRA, when FRA falls on a whole year
    pub fn whole_year_age(&self) -> Option<u8> {
        if self.months == 0 {
            u8::try_from(self.years).ok()
        } else {
            None
        }
    }
}

/// (last birth year covered, FRA in months); first satisfying row wins
const FRA_TABLE: &[(i32, u32)] = &[
    (1937, 65 * 12),
    (1938, 65 * 12 + 2),
    (1939, 65 * 12 + 4),
    (1940, 65 * 12 + 6),
    (1941, 65 * 12 + 8),
    (1942, 65 * 12 + 10),
    (1954, 66 * 12),
    (1955, 66 * 12 + 2),
    (1956, 66 * 12 + 4),
    (1957, 66 * 12 + 6),
    (1958, 66 * 12 + 8),
    (1959, 66 * 12 + 10),
];

/// FRA for anyone born 1960 or later
const FRA_MONTHS_1960_AND_LATER: u32 = 67 * 12;

/// Resolve FRA for a birth year
pub fn resolve(birth_year: i32) -> FullRetirementAge {
    FullRetirementAge::from_total_months(resolve_months(birth_year))
}

/// Resolve FRA for a birth year, as total months
pub fn resolve_months(birth_year: i32) -> u32 {
    FRA_TABLE
        .iter()
        .find(|(threshold, _)| birth_year <= *threshold)
        .map(|&(_, months)| months)
        .unwrap_or(FRA_MONTHS_1960_AND_LATER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_1958_is_66_and_8() {
        let fra = resolve(1958);
        assert_eq!(fra, FullRetirementAge { years: 66, months: 8 });
        assert_eq!(fra.total_months(), 800);
    }

    #[test]
    fn test_table_boundaries() {
        assert_eq!(resolve_months(1900), 780);
        assert_eq!(resolve_months(1937), 780);
        assert_eq!(resolve_months(1938), 782);
        assert_eq!(resolve_months(1942), 790);
        assert_eq!(resolve_months(1943), 792);
        assert_eq!(resolve_months(1954), 792);
        assert_eq!(resolve_months(1955), 794);
        assert_eq!(resolve_months(1959), 802);
        assert_eq!(resolve_months(1960), 804);
        assert_eq!(resolve_months(2100), 804);
    }

    #[test]
    fn test_fra_non_decreasing_in_birth_year() {
        let mut prev = 0;
        for year in 1930..=1970 {
            let months = resolve_months(year);
            assert!(months >= prev, "FRA decreased at {}", year);
            prev = months;
        }
    }

    #[test]
    fn test_whole_year_age() {
        assert_eq!(resolve(1960).whole_year_age(), Some(67));
        assert_eq!(resolve(1950).whole_year_age(), Some(66));
        assert_eq!(resolve(1958).whole_year_age(), None);
        assert!((resolve(1958).as_years() - 66.0 - 8.0 / 12.0).abs() < 1e-12);
    }
}
