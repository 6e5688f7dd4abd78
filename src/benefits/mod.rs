//! Benefit formula components: FRA, credits, AIME, PIA, and claiming-age adjustment

pub mod fra;
pub mod credits;
pub mod aime;
pub mod pia;
pub mod projector;

pub use fra::FullRetirementAge;
pub use credits::CreditSummary;
