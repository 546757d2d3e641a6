//! Request/response bodies for the cache endpoints

use serde::{Deserialize, Serialize};

use crate::infrastructure::services::{LookupResponse, ResponseSource};

/// POST /chat body. The embedding is computed by the client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub vector: Vec<f32>,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub answer: String,
    /// `CACHE` or `CLOUD`
    pub source: String,
}

impl From<LookupResponse> for ChatResponse {
    fn from(response: LookupResponse) -> Self {
        let source = match response.source {
            ResponseSource::Cache => "CACHE",
            ResponseSource::Cloud => "CLOUD",
        };

        Self {
            answer: response.answer,
            source: source.to_string(),
        }
    }
}
