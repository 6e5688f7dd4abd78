//! Present value of benefit streams and claiming-age optimization

pub mod present_value;
pub mod optimizer;

pub use present_value::present_value;
pub use optimizer::{optimal_age, ClaimingCandidate, ClaimingDecision};
