//! AppSec risk service: approve/reject classifier for software applications.
//!
//! Modular structure:
//! - [`features`]: Categorical attributes → fixed-order feature vectors, training CSV
//! - [`model`]: Decision tree classifier and the persisted model artifact
//! - [`risk`]: Rejection probability → risk band
//! - [`service`]: Startup train-or-load and the assessment path
//! - [`api`]: HTTP routes
//! - [`logging`]: Structured JSON logging

pub mod api;
pub mod config;
pub mod error;
pub mod features;
pub mod logging;
pub mod model;
pub mod risk;
pub mod service;

pub use config::ServiceConfig;
pub use features::{FeatureEncoder, FeatureSchema, FeatureVector, RawApplication};
pub use model::{Classifier, DecisionTree, FittedModel};
pub use risk::{RiskBand, RiskEngine};
pub use service::{Phase, RiskService};
pub use logging::StructuredLogger;
