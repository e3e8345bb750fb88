//! Costwise Cache: answers from earlier model calls, keyed by model and normalized prompt.

pub mod cache;
pub mod key;
pub mod types;

pub use cache::ResultCache;
pub use key::{generate_key, normalize_prompt};
pub use types::{CacheEntry, CacheStats};
