//! Energy and CO2 estimates for avoided upstream calls

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{estimate_tokens, DEFAULT_KWH_PER_1K_TOKENS, GRID_CO2_G_PER_KWH};

/// Estimated savings for one request served from cache
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SavingsEstimate {
    pub tokens: u64,
    pub energy_wh: f64,
    pub co2_g: f64,
}

/// Energy constants used for savings estimates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyConstants {
    /// Used when a model has no positive entry in the per-model table
    #[serde(
        rename = "defaultKWhPer1KTokens",
        alias = "default_kwh_per_1k_tokens",
        default = "default_kwh_per_1k_tokens"
    )]
    pub default_kwh_per_1k_tokens: f64,

    #[serde(
        rename = "gridCO2gPerKWh",
        alias = "grid_co2g_per_kwh",
        default = "default_grid_co2g_per_kwh"
    )]
    pub grid_co2g_per_kwh: f64,

    #[serde(
        rename = "modelKWhPer1KTokens",
        alias = "model_kwh_per_1k_tokens",
        default = "default_model_table"
    )]
    pub model_kwh_per_1k_tokens: BTreeMap<String, f64>,
}

fn default_kwh_per_1k_tokens() -> f64 {
    DEFAULT_KWH_PER_1K_TOKENS
}

fn default_grid_co2g_per_kwh() -> f64 {
    GRID_CO2_G_PER_KWH
}

fn default_model_table() -> BTreeMap<String, f64> {
    BTreeMap::from([
        ("gemini-2.5-flash-lite".to_string(), 0.00020),
        ("gemini-2.5-flash".to_string(), 0.00035),
    ])
}

impl Default for EnergyConstants {
    fn default() -> Self {
        Self {
            default_kwh_per_1k_tokens: default_kwh_per_1k_tokens(),
            grid_co2g_per_kwh: default_grid_co2g_per_kwh(),
            model_kwh_per_1k_tokens: default_model_table(),
        }
    }
}

impl EnergyConstants {
    /// Add or replace a per-model constant
    pub fn with_model(mut self, model: impl Into<String>, kwh_per_1k_tokens: f64) -> Self {
        self.model_kwh_per_1k_tokens
            .insert(model.into(), kwh_per_1k_tokens);
        self
    }

    /// kWh per 1K tokens for `model`, falling back to the default for
    /// unknown models and non-positive entries
    pub fn kwh_per_1k_tokens(&self, model: &str) -> f64 {
        match self.model_kwh_per_1k_tokens.get(model) {
            Some(&value) if value > 0.0 => value,
            _ => self.default_kwh_per_1k_tokens,
        }
    }

    /// Energy and CO2 for `tokens` tokens on `model`
    pub fn estimate_for_tokens(&self, tokens: u64, model: &str) -> SavingsEstimate {
        let kwh = (tokens as f64 / 1000.0) * self.kwh_per_1k_tokens(model);

        SavingsEstimate {
            tokens,
            energy_wh: kwh * 1000.0,
            co2_g: kwh * self.grid_co2g_per_kwh,
        }
    }

    /// Savings for answering `question` with `answer` from cache instead of `model`
    pub fn estimate_savings(&self, question: &str, answer: &str, model: &str) -> SavingsEstimate {
        let tokens = estimate_tokens(question) + estimate_tokens(answer);
        self.estimate_for_tokens(tokens, model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_estimate_savings_known_model() {
        let constants = EnergyConstants::default();

        // 3 + 1 tokens
        let estimate = constants.estimate_savings("What is it?", "Rust", "gemini-2.5-flash-lite");

        assert_eq!(estimate.tokens, 4);
        let kwh = 4.0 / 1000.0 * 0.00020;
        assert!(approx(estimate.energy_wh, kwh * 1000.0));
        assert!(approx(estimate.co2_g, kwh * 475.0));
    }

    #[test]
    fn test_unknown_model_uses_default() {
        let constants = EnergyConstants::default();

        let estimate = constants.estimate_savings("question", "answer", "unknown-model");

        assert!(estimate.tokens > 0);
        assert!(estimate.energy_wh > 0.0);
        let expected_kwh = estimate.tokens as f64 / 1000.0 * DEFAULT_KWH_PER_1K_TOKENS;
        assert!(approx(estimate.energy_wh, expected_kwh * 1000.0));
    }

    #[test]
    fn test_non_positive_model_constant_uses_default() {
        let constants = EnergyConstants::default().with_model("broken", 0.0);

        assert!(approx(
            constants.kwh_per_1k_tokens("broken"),
            DEFAULT_KWH_PER_1K_TOKENS
        ));
    }

    #[test]
    fn test_linear_in_tokens() {
        let constants = EnergyConstants::default();

        let one = constants.estimate_for_tokens(100, "gemini-2.5-flash");
        let three = constants.estimate_for_tokens(300, "gemini-2.5-flash");

        assert!(approx(three.energy_wh, one.energy_wh * 3.0));
        assert!(approx(three.co2_g, one.co2_g * 3.0));
    }

    #[test]
    fn test_serialized_names() {
        let json = serde_json::to_value(EnergyConstants::default()).unwrap();

        assert_eq!(json["defaultKWhPer1KTokens"], 0.00035);
        assert_eq!(json["gridCO2gPerKWh"], 475.0);
        assert_eq!(json["modelKWhPer1KTokens"]["gemini-2.5-flash-lite"], 0.0002);
    }
}
