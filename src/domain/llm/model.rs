//! Allow-listed upstream models

use serde::{Deserialize, Serialize};

/// Model used when the requested one is not allowed
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-lite";

/// Fixed allow-list of upstream models
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelCatalog {
    #[serde(default = "default_allowed")]
    pub allowed: Vec<String>,
    #[serde(default = "default_model")]
    pub default_model: String,
}

fn default_allowed() -> Vec<String> {
    vec![
        "gemini-2.5-flash-lite".to_string(),
        "gemini-2.5-flash".to_string(),
    ]
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self {
            allowed: default_allowed(),
            default_model: default_model(),
        }
    }
}

impl ModelCatalog {
    /// The requested model if allowed (after trimming), otherwise the default
    pub fn resolve(&self, requested: Option<&str>) -> &str {
        let requested = requested.map(str::trim).unwrap_or_default();

        self.allowed
            .iter()
            .find(|model| model.as_str() == requested)
            .map(String::as_str)
            .unwrap_or(&self.default_model)
    }
}
