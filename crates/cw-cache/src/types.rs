use serde::Serialize;
use std::time::{Duration, Instant};

/// One cached model answer.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub content: String,
    pub created_at: Instant,
    pub ttl: Option<Duration>,
    pub access_count: u64,
    /// Recency stamp; the smallest is evicted first.
    pub(crate) last_used: u64,
}

impl CacheEntry {
    pub fn is_expired(&self) -> bool {
        self.ttl.is_some_and(|ttl| self.created_at.elapsed() > ttl)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    pub total_requests: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    /// Percent, two decimals.
    pub hit_rate: f64,
    pub total_entries: usize,
    pub evictions: u64,
}
