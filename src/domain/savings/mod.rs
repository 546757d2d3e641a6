//! Savings accounting: token estimates and their energy/CO2 equivalents

mod energy;
mod tokens;

pub use energy::{EnergyConstants, SavingsEstimate};
pub use tokens::estimate_tokens;

/// Fallback energy cost in kWh per 1K tokens
pub const DEFAULT_KWH_PER_1K_TOKENS: f64 = 0.00035;

/// Grid carbon intensity in grams of CO2 per kWh
pub const GRID_CO2_G_PER_KWH: f64 = 475.0;

/// Savings for a cache hit using the built-in energy constants
pub fn estimate_savings(question: &str, answer: &str, model: &str) -> SavingsEstimate {
    EnergyConstants::default().estimate_savings(question, answer, model)
}
