//! Bounded answer cache with per-entry TTL and least-recently-used eviction.

use crate::types::{CacheEntry, CacheStats};
use cw_core::{CacheConfig, Result};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Debug, Default)]
struct State {
    entries: HashMap<String, CacheEntry>,
    clock: u64,
    total_requests: u64,
    cache_hits: u64,
    cache_misses: u64,
    evictions: u64,
}

impl State {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn evict_lru(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, e)| e.last_used)
            .map(|(k, _)| k.clone());
        if let Some(key) = oldest {
            self.entries.remove(&key);
            self.evictions += 1;
            debug!(key = %key, "evicted least recently used entry");
        }
    }
}

/// Answers from earlier model calls, shared by reference across threads.
#[derive(Debug)]
pub struct ResultCache {
    state: Mutex<State>,
    max_size: usize,
    default_ttl: Option<Duration>,
}

impl ResultCache {
    pub fn new(config: &CacheConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            state: Mutex::new(State::default()),
            max_size: config.max_size,
            default_ttl: config.default_ttl_seconds.map(Duration::from_secs),
        })
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// A hit refreshes the entry's recency. Expired entries are dropped and
    /// count as misses.
    pub fn get(&self, key: &str) -> Option<String> {
        let mut state = self.state();
        state.total_requests += 1;

        match state.entries.get(key).map(CacheEntry::is_expired) {
            None => {
                state.cache_misses += 1;
                return None;
            }
            Some(true) => {
                state.entries.remove(key);
                state.cache_misses += 1;
                debug!(key = %key, "cache entry expired");
                return None;
            }
            Some(false) => {}
        }

        let now = state.tick();
        state.cache_hits += 1;
        let entry = state.entries.get_mut(key)?;
        entry.last_used = now;
        entry.access_count += 1;
        Some(entry.content.clone())
    }

    /// Store with the configured default TTL.
    pub fn set(&self, key: impl Into<String>, content: impl Into<String>) {
        self.set_with_ttl(key, content, self.default_ttl);
    }

    /// `ttl: None` keeps the entry until it is evicted or invalidated.
    pub fn set_with_ttl(&self, key: impl Into<String>, content: impl Into<String>, ttl: Option<Duration>) {
        let key = key.into();
        let mut state = self.state();
        if state.entries.len() >= self.max_size && !state.entries.contains_key(&key) {
            state.evict_lru();
        }
        let now = state.tick();
        state.entries.insert(
            key,
            CacheEntry {
                content: content.into(),
                created_at: Instant::now(),
                ttl,
                access_count: 0,
                last_used: now,
            },
        );
    }

    pub fn invalidate(&self, key: &str) -> bool {
        self.state().entries.remove(key).is_some()
    }

    pub fn clear(&self) {
        self.state().entries.clear();
    }

    /// Drop every expired entry, returning how many went.
    pub fn cleanup_expired(&self) -> usize {
        let mut state = self.state();
        let before = state.entries.len();
        state.entries.retain(|_, e| !e.is_expired());
        before - state.entries.len()
    }

    pub fn len(&self) -> usize {
        self.state().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get_entry(&self, key: &str) -> Option<CacheEntry> {
        self.state().entries.get(key).cloned()
    }

    pub fn get_stats(&self) -> CacheStats {
        let state = self.state();
        let rate = if state.total_requests > 0 {
            state.cache_hits as f64 / state.total_requests as f64 * 100.0
        } else {
            0.0
        };
        CacheStats {
            total_requests: state.total_requests,
            cache_hits: state.cache_hits,
            cache_misses: state.cache_misses,
            hit_rate: (rate * 100.0).round() / 100.0,
            total_entries: state.entries.len(),
            evictions: state.evictions,
        }
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        let config = CacheConfig::default();
        Self {
            state: Mutex::new(State::default()),
            max_size: config.max_size,
            default_ttl: config.default_ttl_seconds.map(Duration::from_secs),
        }
    }
}
