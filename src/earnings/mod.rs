//! Earnings ledger, client profile, and ledger loading

mod data;
mod ledger;
mod projection;
pub mod loader;

pub use data::{ClientSsProfile, DataSource, EarningsRecord};
pub use ledger::EarningsLedger;
pub use projection::{project_manual_history, ManualHistory, LAST_WORK_AGE, START_WORK_AGE};
pub use loader::{load_earnings, load_earnings_from_reader};
