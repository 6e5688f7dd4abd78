//! Error taxonomy for the benefit engine
//!
//! All variants are local validation failures. Nothing here is transient, so
//! callers never retry; they surface the message and move on to the next client.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid birth date: {0}")]
    InvalidBirthDate(String),

    #[error("Invalid earnings: {0}")]
    InvalidEarnings(String),

    #[error("Earnings year {year} out of range (must be between {min} and {max})")]
    EarningsYearOutOfRange { year: i32, min: i32, max: i32 },

    #[error("No primary insurance amount available and no anchor benefits or earnings to derive one")]
    MissingPiaForProjection,

    #[error("Degenerate annuity inputs: {0}")]
    DegenerateAnnuityInputs(String),

    #[error("Invalid tax year table: {0}")]
    InvalidTaxYearTable(String),

    #[error("Inconsistent profile: {0}")]
    InconsistentProfile(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
