//! Maps the classifier's rejection probability onto baixo/medio/alto.
//! Lower bounds are inclusive: 0.70 is already "alto", 0.40 already "medio".

use crate::config::RiskConfig;
use crate::model::Probabilities;
use serde::{Deserialize, Serialize};

pub const HIGH_RISK_THRESHOLD: f64 = 0.70;
pub const MEDIUM_RISK_THRESHOLD: f64 = 0.40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskBand {
    #[serde(rename = "baixo")]
    Low,
    #[serde(rename = "medio")]
    Medium,
    #[serde(rename = "alto")]
    High,
}

impl RiskBand {
    pub fn from_reject_probability(p_reject: f64, config: &RiskConfig) -> Self {
        if p_reject >= config.high_threshold {
            RiskBand::High
        } else if p_reject >= config.medium_threshold {
            RiskBand::Medium
        } else {
            RiskBand::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskBand::Low => "baixo",
            RiskBand::Medium => "medio",
            RiskBand::High => "alto",
        }
    }
}

/// Outcome for a single application
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub approved: bool,
    pub band: RiskBand,
    pub probabilities: Probabilities,
}

pub struct RiskEngine {
    config: RiskConfig,
}

impl RiskEngine {
    /// Thresholds outside `0 <= medium <= high <= 1` fall back to the default policy.
    pub fn new(config: RiskConfig) -> Self {
        let sane = (0.0..=1.0).contains(&config.medium_threshold)
            && (0.0..=1.0).contains(&config.high_threshold)
            && config.medium_threshold <= config.high_threshold;
        if !sane {
            tracing::warn!(
                medium = config.medium_threshold,
                high = config.high_threshold,
                "invalid risk thresholds; using defaults"
            );
            return Self {
                config: RiskConfig::default(),
            };
        }
        Self { config }
    }

    pub fn band(&self, p_reject: f64) -> RiskBand {
        RiskBand::from_reject_probability(p_reject, &self.config)
    }

    pub fn assess(&self, approved: bool, probabilities: Probabilities) -> Assessment {
        Assessment {
            approved,
            band: self.band(probabilities.reject),
            probabilities,
        }
    }

    pub fn config(&self) -> &RiskConfig {
        &self.config
    }
}

impl Default for RiskEngine {
    fn default() -> Self {
        Self::new(RiskConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_belong_to_the_higher_band() {
        let e = RiskEngine::default();
        assert_eq!(e.band(0.39), RiskBand::Low);
        assert_eq!(e.band(0.40), RiskBand::Medium);
        assert_eq!(e.band(0.69), RiskBand::Medium);
        assert_eq!(e.band(0.70), RiskBand::High);
        assert_eq!(e.band(0.0), RiskBand::Low);
        assert_eq!(e.band(1.0), RiskBand::High);
    }

    #[test]
    fn band_is_monotonic() {
        let e = RiskEngine::default();
        let mut prev = RiskBand::Low;
        for i in 0..=1000 {
            let b = e.band(i as f64 / 1000.0);
            assert!(b >= prev);
            prev = b;
        }
    }

    #[test]
    fn serializes_to_portuguese_labels() {
        assert_eq!(serde_json::to_string(&RiskBand::Medium).unwrap(), "\"medio\"");
        assert_eq!(RiskBand::High.as_str(), "alto");
    }

    #[test]
    fn inverted_thresholds_fall_back() {
        let e = RiskEngine::new(RiskConfig {
            high_threshold: 0.2,
            medium_threshold: 0.9,
        });
        assert_eq!(e.config().high_threshold, HIGH_RISK_THRESHOLD);
    }
}
