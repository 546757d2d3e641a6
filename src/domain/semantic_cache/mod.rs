//! Semantic cache domain: entries, similarity, matching policy

mod config;
mod entry;
mod policy;
mod similarity;
mod store;

pub use config::SemanticCacheConfig;
pub use entry::{CacheEntry, CacheSource, MatchedEntry};
pub use policy::{CapacityPolicy, FirstSeenWins, MaxEntries, MergePolicy, Unbounded};
pub use similarity::cosine_similarity;
pub use store::{MergeOutcome, VectorStore};

/// Minimum cosine similarity for a stored answer to be reused
pub const SIMILARITY_THRESHOLD: f64 = 0.90;
