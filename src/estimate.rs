//! Benefit estimator: orchestrates the full pipeline for one or many clients
//!
//! Holds the engine config once, then turns each client's birth date, earnings
//! and anchor benefits into a [`BenefitEstimate`]. Estimates are independent,
//! so batches run in parallel.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::benefits::{aime, fra, pia, projector, CreditSummary, FullRetirementAge};
use crate::constants::{EngineConfig, MAX_CLAIM_AGE, MIN_CLAIM_AGE};
use crate::earnings::{project_manual_history, ClientSsProfile, DataSource, EarningsLedger};
use crate::error::{EngineError, EngineResult};
use crate::valuation::{optimal_age, present_value, ClaimingCandidate};

/// Earnings information supplied with a request
#[derive(Debug, Clone, Default)]
pub enum EarningsSource {
    /// No earnings; PIA must come from the request or its anchors
    #[default]
    None,
    /// Recorded earnings per work year
    Ledger(EarningsLedger),
    /// A single annual income assumed over a full career
    ManualIncome(f64),
}

/// Everything needed to estimate one client's benefits
#[derive(Debug, Clone)]
pub struct EstimateRequest {
    pub birth_date: NaiveDate,

    /// Date the estimate is made; sets the client's current age and the
    /// latest acceptable earnings year
    pub as_of: NaiveDate,

    pub earnings: EarningsSource,

    /// PIA already known (e.g. read off a statement)
    pub primary_insurance_amount: Option<f64>,

    /// Statement benefits by claiming age
    pub anchor_benefits: BTreeMap<u8, f64>,
}

impl EstimateRequest {
    pub fn new(birth_date: NaiveDate, as_of: NaiveDate) -> Self {
        Self {
            birth_date,
            as_of,
            earnings: EarningsSource::None,
            primary_insurance_amount: None,
            anchor_benefits: BTreeMap::new(),
        }
    }

    pub fn with_ledger(mut self, ledger: EarningsLedger) -> Self {
        self.earnings = EarningsSource::Ledger(ledger);
        self
    }

    pub fn with_manual_income(mut self, annual_income: f64) -> Self {
        self.earnings = EarningsSource::ManualIncome(annual_income);
        self
    }

    pub fn with_pia(mut self, pia: f64) -> Self {
        self.primary_insurance_amount = Some(pia);
        self
    }

    pub fn with_anchor_benefits(mut self, anchors: BTreeMap<u8, f64>) -> Self {
        self.anchor_benefits = anchors;
        self
    }
}

/// How the PIA of an estimate was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PiaSource {
    Provided,
    AnchorBenefits,
    Earnings,
}

/// Full estimate result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenefitEstimate {
    pub full_retirement_age: FullRetirementAge,
    pub primary_insurance_amount: f64,
    pub pia_source: PiaSource,

    /// Present only when the PIA was computed from earnings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_indexed_monthly_earnings: Option<f64>,

    pub benefits_by_age: BTreeMap<u8, f64>,
    pub medicare_credits: u32,
    pub medicare_eligible: bool,

    /// PV of claiming at FRA
    pub present_value_of_benefits: f64,

    pub optimal_claiming_age: u8,
    pub optimal_claiming_present_value: f64,

    /// Every age evaluated by the optimizer
    pub claiming_candidates: Vec<ClaimingCandidate>,
}

/// Parse a YYYY-MM-DD birth date, rejecting dates after `as_of`
pub fn parse_birth_date(value: &str, as_of: NaiveDate) -> EngineResult<NaiveDate> {
    let date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|e| EngineError::InvalidBirthDate(format!("{:?}: {}", value, e)))?;
    validate_birth_date(date, as_of)?;
    Ok(date)
}

pub fn validate_birth_date(birth_date: NaiveDate, as_of: NaiveDate) -> EngineResult<()> {
    if birth_date > as_of {
        return Err(EngineError::InvalidBirthDate(format!(
            "{} is after {}",
            birth_date, as_of
        )));
    }
    Ok(())
}

/// Age in years, counted in completed months
pub fn age_in_years(birth_date: NaiveDate, as_of: NaiveDate) -> f64 {
    let mut months = (as_of.year() - birth_date.year()) * 12 + as_of.month() as i32 - birth_date.month() as i32;
    if as_of.day() < birth_date.day() {
        months -= 1;
    }
    months.max(0) as f64 / 12.0
}

/// Benefit estimator with pre-loaded config
#[derive(Debug, Clone, Default)]
pub struct BenefitEstimator {
    config: EngineConfig,
}

impl BenefitEstimator {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run the full pipeline for one client
    pub fn estimate(&self, request: &EstimateRequest) -> EngineResult<BenefitEstimate> {
        validate_birth_date(request.birth_date, request.as_of)?;

        let birth_year = request.birth_date.year();
        let current_year = request.as_of.year();
        let table = &self.config.tax_years;

        let fra = fra::resolve(birth_year);
        let fra_months = fra.total_months();

        // Ledger used for credits, plus AIME input when earnings are known
        let (credits, ss_earnings) = match &request.earnings {
            EarningsSource::None => (CreditSummary::from_total(0), None),
            EarningsSource::Ledger(ledger) => {
                let mut ledger = ledger.clone();
                ledger.normalize(table, current_year)?;
                let earnings = ledger.ss_earnings();
                let usable = if ledger.is_empty() { None } else { Some(earnings) };
                (ledger.credit_summary(), usable)
            }
            EarningsSource::ManualIncome(income) => {
                let history = project_manual_history(birth_year, current_year, *income, table)?;
                (history.ledger.credit_summary(), Some(history.projected_ss_earnings))
            }
        };

        let (pia_amount, pia_source, aime_amount) = if let Some(provided) = request.primary_insurance_amount {
            if !provided.is_finite() || provided < 0.0 {
                return Err(EngineError::InvalidEarnings(format!(
                    "PIA must be a non-negative amount, got {}",
                    provided
                )));
            }
            (provided, PiaSource::Provided, None)
        } else if request.anchor_benefits.range(MIN_CLAIM_AGE..=MAX_CLAIM_AGE).next().is_some() {
            let derived = projector::derive_pia_from_anchors(&request.anchor_benefits, fra_months)?;
            (derived, PiaSource::AnchorBenefits, None)
        } else if let Some(earnings) = ss_earnings {
            let aime_amount = aime::compute(&earnings)?;
            let eligibility_year = birth_year + MIN_CLAIM_AGE as i32;
            let constants = table.for_year(eligibility_year);
            debug!(
                "AIME {:.0} with {} bend points {:.0}/{:.0}",
                aime_amount, eligibility_year, constants.bend1, constants.bend2
            );
            (pia::compute_for_year(aime_amount, &constants), PiaSource::Earnings, Some(aime_amount))
        } else {
            return Err(EngineError::MissingPiaForProjection);
        };

        let benefits_by_age = projector::benefits_by_age(pia_amount, fra_months);
        let valuation = &self.config.valuation;
        let current_age = age_in_years(request.birth_date, request.as_of);

        let fra_age = fra.as_years();
        let pv_at_fra = if valuation.life_expectancy <= fra_age {
            0.0
        } else {
            present_value(pia_amount, fra_age, current_age, valuation)?
        };

        let decision = optimal_age(pia_amount, fra_months, current_age, valuation)?;

        info!(
            "Estimate: FRA {}y{}m, PIA {:.2} ({:?}), {} credits, optimal age {} (PV {:.2})",
            fra.years,
            fra.months,
            pia_amount,
            pia_source,
            credits.total_credits,
            decision.age,
            decision.present_value
        );

        Ok(BenefitEstimate {
            full_retirement_age: fra,
            primary_insurance_amount: pia_amount,
            pia_source,
            average_indexed_monthly_earnings: aime_amount,
            benefits_by_age,
            medicare_credits: credits.total_credits,
            medicare_eligible: credits.medicare_eligible,
            present_value_of_benefits: pv_at_fra,
            optimal_claiming_age: decision.age,
            optimal_claiming_present_value: decision.present_value,
            claiming_candidates: decision.candidates,
        })
    }

    /// Estimate many clients in parallel; results keep the input order
    pub fn estimate_batch(&self, requests: &[EstimateRequest]) -> Vec<EngineResult<BenefitEstimate>> {
        requests.par_iter().map(|r| self.estimate(r)).collect()
    }

    /// Estimate a stored profile against its current ledger
    ///
    /// Statement-sourced profiles keep their quoted PIA and anchors. Other
    /// profiles are re-derived from earnings, falling back to stored figures
    /// only when the ledger is empty.
    pub fn estimate_profile(
        &self,
        profile: &ClientSsProfile,
        ledger: &EarningsLedger,
        as_of: NaiveDate,
    ) -> EngineResult<BenefitEstimate> {
        let mut request = EstimateRequest::new(profile.birth_date, as_of).with_ledger(ledger.clone());

        if profile.data_source == DataSource::StatementParse || ledger.is_empty() {
            request.primary_insurance_amount = profile.primary_insurance_amount;
            request.anchor_benefits = profile.benefit_by_claim_age.clone();
        }

        self.estimate(&request)
    }

    /// Recalculate a profile in place and check its invariants
    pub fn recalculate_profile(
        &self,
        profile: &mut ClientSsProfile,
        ledger: &EarningsLedger,
        as_of: NaiveDate,
    ) -> EngineResult<BenefitEstimate> {
        let estimate = self.estimate_profile(profile, ledger, as_of)?;
        profile.apply_estimate(&estimate);
        profile.validate()?;
        Ok(estimate)
    }
}

impl ClientSsProfile {
    /// Copy an estimate's figures onto the profile
    pub fn apply_estimate(&mut self, estimate: &BenefitEstimate) {
        self.full_retirement_age_months = estimate.full_retirement_age.total_months();
        self.primary_insurance_amount = Some(estimate.primary_insurance_amount);
        self.benefit_by_claim_age = estimate.benefits_by_age.clone();
        self.disability_benefit = Some(estimate.primary_insurance_amount);
        self.apply_credits(CreditSummary::from_total(estimate.medicare_credits));
        self.present_value_of_benefits = Some(estimate.present_value_of_benefits);
    }
}
