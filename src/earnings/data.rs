//! Earnings records and the per-client Social Security profile

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::benefits::{credits, fra, CreditSummary, FullRetirementAge};
use crate::constants::{
    TaxYearConstants, TaxYearTable, FIRST_EARNINGS_YEAR, MEDICARE_CREDITS_REQUIRED,
    MEDICARE_TAX_RATE, SS_TAX_RATE,
};
use crate::error::{EngineError, EngineResult};
use crate::money::floor_cent;

/// Where a profile's figures came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// Entered by hand (birth date and income, or anchor benefits)
    Manual,
    /// Imported from an SSA statement
    StatementParse,
    /// Projected from an earnings ledger
    Projection,
}

/// One work year of taxed earnings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarningsRecord {
    pub year: i32,

    /// Earnings subject to SS tax, capped at the year's wage base
    pub taxed_ss_earnings: f64,

    /// Earnings subject to Medicare tax (uncapped)
    pub taxed_medicare_earnings: f64,

    #[serde(default)]
    pub ss_tax_paid: f64,

    #[serde(default)]
    pub medicare_tax_paid: f64,

    #[serde(default)]
    pub employer_ss_paid: f64,

    #[serde(default)]
    pub employer_medicare_paid: f64,

    /// Credits earned this year, 0 to 4
    #[serde(default)]
    pub credits_earned: u8,
}

impl EarningsRecord {
    /// Record with earnings only; taxes and credits zero
    pub fn new(year: i32, taxed_ss_earnings: f64, taxed_medicare_earnings: f64) -> Self {
        Self {
            year,
            taxed_ss_earnings,
            taxed_medicare_earnings,
            ss_tax_paid: 0.0,
            medicare_tax_paid: 0.0,
            employer_ss_paid: 0.0,
            employer_medicare_paid: 0.0,
            credits_earned: 0,
        }
    }

    /// Build a record from gross wages, capping SS earnings at the wage base
    pub fn from_wages(year: i32, gross_wages: f64, constants: &TaxYearConstants) -> EngineResult<Self> {
        if !gross_wages.is_finite() || gross_wages < 0.0 {
            return Err(EngineError::InvalidEarnings(format!(
                "wages for {} must be a non-negative amount, got {}",
                year, gross_wages
            )));
        }

        let ss = gross_wages.min(constants.wage_base);
        let ss_tax = floor_cent(ss * SS_TAX_RATE);
        let medicare_tax = floor_cent(gross_wages * MEDICARE_TAX_RATE);

        Ok(Self {
            year,
            taxed_ss_earnings: ss,
            taxed_medicare_earnings: gross_wages,
            ss_tax_paid: ss_tax,
            medicare_tax_paid: medicare_tax,
            employer_ss_paid: ss_tax,
            employer_medicare_paid: medicare_tax,
            credits_earned: credits::credits_for(ss, constants.credit_amount)?,
        })
    }

    /// Check the work year lies in [1950, current_year + 1]
    pub fn validate_year(year: i32, current_year: i32) -> EngineResult<()> {
        let max = current_year + 1;
        if year < FIRST_EARNINGS_YEAR || year > max {
            return Err(EngineError::EarningsYearOutOfRange {
                year,
                min: FIRST_EARNINGS_YEAR,
                max,
            });
        }
        Ok(())
    }

    /// Validate year range and that every amount is non-negative
    pub fn validate(&self, current_year: i32) -> EngineResult<()> {
        Self::validate_year(self.year, current_year)?;

        let amounts = [
            ("taxed_ss_earnings", self.taxed_ss_earnings),
            ("taxed_medicare_earnings", self.taxed_medicare_earnings),
            ("ss_tax_paid", self.ss_tax_paid),
            ("medicare_tax_paid", self.medicare_tax_paid),
            ("employer_ss_paid", self.employer_ss_paid),
            ("employer_medicare_paid", self.employer_medicare_paid),
        ];
        for (name, value) in amounts {
            if !value.is_finite() || value < 0.0 {
                return Err(EngineError::InvalidEarnings(format!(
                    "{} for {} must be a non-negative amount, got {}",
                    name, self.year, value
                )));
            }
        }
        Ok(())
    }

    /// Credits implied by this year's SS earnings under `table`
    pub fn expected_credits(&self, table: &TaxYearTable) -> EngineResult<u8> {
        credits::credits_for(self.taxed_ss_earnings, table.for_year(self.year).credit_amount)
    }
}

/// Per-client Social Security profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSsProfile {
    pub birth_date: NaiveDate,

    /// Derived from `birth_date`; refreshed by `set_birth_date`
    pub full_retirement_age_months: u32,

    pub primary_insurance_amount: Option<f64>,

    /// Monthly benefit by claiming age 62..=70; absent ages are unknown
    #[serde(default)]
    pub benefit_by_claim_age: BTreeMap<u8, f64>,

    pub disability_benefit: Option<f64>,

    pub survivor_benefit: Option<f64>,

    #[serde(default)]
    pub medicare_credits: u32,

    #[serde(default)]
    pub medicare_eligible: bool,

    pub data_source: DataSource,

    pub statement_date: Option<NaiveDate>,

    pub present_value_of_benefits: Option<f64>,
}

impl ClientSsProfile {
    pub fn new(birth_date: NaiveDate, data_source: DataSource) -> Self {
        Self {
            birth_date,
            full_retirement_age_months: fra::resolve_months(birth_date.year()),
            primary_insurance_amount: None,
            benefit_by_claim_age: BTreeMap::new(),
            disability_benefit: None,
            survivor_benefit: None,
            medicare_credits: 0,
            medicare_eligible: false,
            data_source,
            statement_date: None,
            present_value_of_benefits: None,
        }
    }

    pub fn full_retirement_age(&self) -> FullRetirementAge {
        FullRetirementAge::from_total_months(self.full_retirement_age_months)
    }

    /// Change the birth date and re-derive FRA
    pub fn set_birth_date(&mut self, birth_date: NaiveDate) {
        self.birth_date = birth_date;
        self.full_retirement_age_months = fra::resolve_months(birth_date.year());
    }

    /// Record statement benefits quoted at specific claiming ages
    pub fn set_anchor_benefits(&mut self, anchors: BTreeMap<u8, f64>, statement_date: Option<NaiveDate>) {
        self.benefit_by_claim_age = anchors;
        self.statement_date = statement_date;
    }

    /// Benefit recorded at the FRA age, when FRA falls on a whole year
    pub fn fra_anchor(&self) -> Option<f64> {
        self.full_retirement_age()
            .whole_year_age()
            .and_then(|age| self.benefit_by_claim_age.get(&age).copied())
    }

    pub fn apply_credits(&mut self, summary: CreditSummary) {
        self.medicare_credits = summary.total_credits;
        self.medicare_eligible = summary.medicare_eligible;
    }

    /// Check the profile's invariants
    pub fn validate(&self) -> EngineResult<()> {
        let expected_fra = fra::resolve_months(self.birth_date.year());
        if self.full_retirement_age_months != expected_fra {
            return Err(EngineError::InconsistentProfile(format!(
                "FRA {} months does not match birth year {} ({} months)",
                self.full_retirement_age_months,
                self.birth_date.year(),
                expected_fra
            )));
        }

        if self.medicare_eligible != (self.medicare_credits >= MEDICARE_CREDITS_REQUIRED) {
            return Err(EngineError::InconsistentProfile(format!(
                "medicare_eligible is {} with {} credits",
                self.medicare_eligible, self.medicare_credits
            )));
        }

        if let (Some(pia), Some(at_fra)) = (self.primary_insurance_amount, self.fra_anchor()) {
            if (pia - at_fra).abs() > 0.01 {
                return Err(EngineError::InconsistentProfile(format!(
                    "PIA {:.2} differs from benefit at FRA {:.2}",
                    pia, at_fra
                )));
            }
        }

        Ok(())
    }
}
