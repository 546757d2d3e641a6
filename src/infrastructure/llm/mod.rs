//! Upstream text generator implementations

mod gemini;
mod http_client;

pub use gemini::{GeminiGenerator, API_KEY_ENV};
pub use http_client::{HttpClient, HttpClientTrait};
