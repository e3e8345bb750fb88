//! Costwise Router: additive complexity scoring and model tier selection.

pub mod rules;
pub mod selector;
pub mod types;

pub use cw_core::{ComplexityLevel, ModelConfig, RouterConfig};
pub use rules::{classify_by_rules, ComplexityRules};
pub use selector::{cost_for, LlmRouter, DEFAULT_RESPONSE_TOKENS};
pub use types::*;

#[cfg(test)]
mod tests;
