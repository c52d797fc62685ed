//! Static correlation choice used when the recommendation service is down.

use crate::config::CorrelationConfig;
use crate::types::RecommendationInputs;
use serde::{Deserialize, Serialize};

/// Where a recommended correlation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationSource {
    Service,
    RuleBased,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrelationRecommendation {
    pub method: String,
    pub source: RecommendationSource,
}

/// Near-vertical wells first, then high gas rate, otherwise the fallback.
pub fn rule_based_method(inputs: &RecommendationInputs, cfg: &CorrelationConfig) -> String {
    if inputs.inclination < cfg.inclination_threshold_deg {
        cfg.vertical_method.clone()
    } else if inputs.gas_rate > cfg.gas_rate_threshold {
        cfg.high_gas_method.clone()
    } else {
        cfg.fallback_method.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(inclination: f64, gas_rate: f64) -> RecommendationInputs {
        RecommendationInputs {
            inclination,
            gas_rate,
            liquid_rate: 1000.0,
            tubing_inner_diameter: None,
        }
    }

    #[test]
    fn test_rule_order() {
        let cfg = CorrelationConfig::default();
        assert_eq!(rule_based_method(&inputs(10.0, 5000.0), &cfg), "hagedorn_brown");
        assert_eq!(rule_based_method(&inputs(45.0, 1500.0), &cfg), "gray");
        assert_eq!(rule_based_method(&inputs(45.0, 1000.0), &cfg), "beggs_brill");
        // Threshold itself is not "near-vertical"
        assert_eq!(rule_based_method(&inputs(30.0, 200.0), &cfg), "beggs_brill");
    }
}
