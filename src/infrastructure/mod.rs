//! Infrastructure layer - store, ledger, sync and upstream implementations

pub mod history;
pub mod llm;
pub mod logging;
pub mod observability;
pub mod semantic_cache;
pub mod services;
pub mod sync;
