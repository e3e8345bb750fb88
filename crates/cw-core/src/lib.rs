pub mod config;
pub mod error;
pub mod types;

pub use config::{
    CacheConfig, CostConfig, CostwiseConfig, LocalConfig, ModelPricing, RouterConfig, TaskPatternConfig,
};
pub use error::{CostwiseError, Result};
pub use types::{ComplexityLevel, ModelConfig};

/// Whitespace-delimited word count, the unit every heuristic here measures prompts in.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
