//! Pluggable policies for merging and capacity

use std::fmt::Debug;

use super::CacheEntry;

/// Decides which remote entries are merged into the local store.
///
/// The store always refuses an entry whose trimmed question is empty or
/// already present, so a policy can only narrow what gets merged. With
/// key collisions the first entry seen wins, whether local or earlier in
/// the same remote payload.
pub trait MergePolicy: Send + Sync + Debug {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Whether an unseen remote entry should be merged
    fn accept(&self, candidate: &CacheEntry) -> bool;
}

/// Merge every unseen remote entry
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstSeenWins;

impl MergePolicy for FirstSeenWins {
    fn name(&self) -> &'static str {
        "first_seen_wins"
    }

    fn accept(&self, _candidate: &CacheEntry) -> bool {
        true
    }
}

/// Hook consulted before each insert
pub trait CapacityPolicy: Send + Sync + Debug {
    /// Whether a new entry may be added to a store currently holding `len` entries
    fn admit(&self, len: usize) -> bool;
}

/// No limit
#[derive(Debug, Clone, Copy, Default)]
pub struct Unbounded;

impl CapacityPolicy for Unbounded {
    fn admit(&self, _len: usize) -> bool {
        true
    }
}

/// Refuses new entries once the store holds `max_entries`. Nothing is evicted.
#[derive(Debug, Clone, Copy)]
pub struct MaxEntries {
    pub max_entries: usize,
}

impl MaxEntries {
    pub fn new(max_entries: usize) -> Self {
        Self { max_entries }
    }
}

impl CapacityPolicy for MaxEntries {
    fn admit(&self, len: usize) -> bool {
        len < self.max_entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_seen_wins_accepts_everything() {
        let policy = FirstSeenWins;
        assert!(policy.accept(&CacheEntry::new(vec![], "Q", "")));
        assert_eq!(policy.name(), "first_seen_wins");
    }

    #[test]
    fn test_max_entries() {
        let policy = MaxEntries::new(2);

        assert!(policy.admit(0));
        assert!(policy.admit(1));
        assert!(!policy.admit(2));
    }

    #[test]
    fn test_unbounded() {
        assert!(Unbounded.admit(usize::MAX - 1));
    }
}
