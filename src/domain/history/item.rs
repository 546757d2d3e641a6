//! History item

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::savings::{EnergyConstants, SavingsEstimate};
use crate::domain::semantic_cache::CacheSource;

/// Where a served answer came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HistorySource {
    /// Cache hit on an entry produced by this process
    Local,
    /// Cache hit on an entry merged from the remote snapshot
    Remote,
    /// Fresh answer from the upstream generator
    Cloud,
}

impl From<CacheSource> for HistorySource {
    fn from(source: CacheSource) -> Self {
        match source {
            CacheSource::Local => Self::Local,
            CacheSource::Remote => Self::Remote,
        }
    }
}

impl fmt::Display for HistorySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => f.write_str("LOCAL"),
            Self::Remote => f.write_str("REMOTE"),
            Self::Cloud => f.write_str("CLOUD"),
        }
    }
}

fn is_zero_u64(value: &u64) -> bool {
    *value == 0
}

fn is_zero_f64(value: &f64) -> bool {
    *value == 0.0
}

/// One served request. Never modified after it is appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub question: String,
    pub answer: String,
    pub timestamp: DateTime<Utc>,
    /// True iff the answer was served from cache
    pub saved: bool,
    pub source: HistorySource,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub model: String,
    #[serde(default, skip_serializing_if = "is_zero_u64")]
    pub tokens_saved: u64,
    #[serde(default, skip_serializing_if = "is_zero_f64")]
    pub energy_saved_wh: f64,
    #[serde(default, rename = "co2SavedG", skip_serializing_if = "is_zero_f64")]
    pub co2_saved_g: f64,
}

impl HistoryItem {
    /// Build an item stamped now. Savings are only computed for cache hits.
    pub fn record(
        question: impl Into<String>,
        answer: impl Into<String>,
        saved: bool,
        source: HistorySource,
        model: impl Into<String>,
        constants: &EnergyConstants,
    ) -> Self {
        let question = question.into();
        let answer = answer.into();
        let model = model.into();

        let savings = if saved {
            constants.estimate_savings(&question, &answer, &model)
        } else {
            SavingsEstimate::default()
        };

        Self {
            question,
            answer,
            timestamp: Utc::now(),
            saved,
            source,
            model,
            tokens_saved: savings.tokens,
            energy_saved_wh: savings.energy_wh,
            co2_saved_g: savings.co2_g,
        }
    }
}
