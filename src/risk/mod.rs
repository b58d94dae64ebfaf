//! Rejection probability → risk band.

mod engine;

pub use engine::{Assessment, RiskBand, RiskEngine, HIGH_RISK_THRESHOLD, MEDIUM_RISK_THRESHOLD};
