//! Upstream text generation trait

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Upstream generative-text API
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync + Debug {
    /// Generate an answer for `prompt` with `model`. An empty answer is an error.
    async fn generate(&self, prompt: &str, model: &str) -> Result<String, DomainError>;

    /// Provider name for logs and metrics
    fn provider_name(&self) -> &'static str;
}
