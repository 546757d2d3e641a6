//! Domain layer: core types, policies and collaborator traits

pub mod error;
pub mod history;
pub mod llm;
pub mod savings;
pub mod semantic_cache;
pub mod sync;

pub use error::DomainError;
pub use history::{HistoryItem, HistoryLedger, HistorySource};
pub use llm::{ModelCatalog, TextGenerator};
pub use savings::{EnergyConstants, SavingsEstimate};
pub use semantic_cache::{CacheEntry, CacheSource, MatchedEntry, VectorStore};
pub use sync::{RemoteObjectStore, SyncStatus, SyncStrategy};
