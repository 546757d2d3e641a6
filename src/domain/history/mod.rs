//! Served-request history and the savings metrics derived from it

mod item;
mod ledger;
mod metrics;

pub use item::{HistoryItem, HistorySource};
pub use ledger::HistoryLedger;
pub use self::metrics::{aggregate, CacheEntryView, CacheMetrics, CacheUseView, MetricsReport};
