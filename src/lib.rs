//! Social Security Benefit Engine - benefit estimation and optimal claiming age
//!
//! This library provides:
//! - Full Retirement Age resolution by birth year
//! - Credit tracking and Medicare eligibility
//! - AIME and PIA calculation with year-indexed bend points
//! - Claiming-age benefit projection (early reduction, delayed credits)
//! - Present value of COLA-adjusted benefit streams
//! - Claiming-age optimization and batch estimation

pub mod error;
pub mod money;
pub mod constants;
pub mod earnings;
pub mod benefits;
pub mod valuation;
pub mod estimate;

// Re-export commonly used types
pub use error::{EngineError, EngineResult};
pub use constants::{EngineConfig, TaxYearConstants, TaxYearTable, ValuationAssumptions};
pub use earnings::{ClientSsProfile, DataSource, EarningsLedger, EarningsRecord};
pub use benefits::{CreditSummary, FullRetirementAge};
pub use valuation::{ClaimingCandidate, ClaimingDecision};
pub use estimate::{BenefitEstimate, BenefitEstimator, EarningsSource, EstimateRequest, PiaSource};
