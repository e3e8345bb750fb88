use cw_core::{ComplexityLevel, ModelConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Typed request annotations that feed the complexity score.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestMetadata {
    pub requires_functions: bool,
    /// Caller annotations the router carries but never scores.
    pub extra: HashMap<String, serde_json::Value>,
}

/// A request to be classified and routed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteRequest {
    pub prompt: String,
    /// Conversation context in tokens.
    pub context_length: usize,
    pub requires_code: bool,
    pub requires_reasoning: bool,
    pub metadata: RequestMetadata,
}

impl RouteRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self { prompt: prompt.into(), ..Default::default() }
    }

    pub fn with_context_length(mut self, tokens: usize) -> Self {
        self.context_length = tokens;
        self
    }

    pub fn with_code(mut self) -> Self {
        self.requires_code = true;
        self
    }

    pub fn with_reasoning(mut self) -> Self {
        self.requires_reasoning = true;
        self
    }

    pub fn with_functions(mut self) -> Self {
        self.metadata.requires_functions = true;
        self
    }
}

/// Contribution of one scoring rule.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleScore {
    pub name: &'static str,
    pub delta: u32,
    pub signal: Option<String>,
}

/// Complexity estimate with the per-rule breakdown.
#[derive(Debug, Clone)]
pub struct ComplexityAssessment {
    pub level: ComplexityLevel,
    pub score: u32,
    pub signals: Vec<String>,
}

/// Routing decision.
#[derive(Debug, Clone)]
pub struct RoutingDecision {
    pub model: ModelConfig,
    pub complexity: ComplexityLevel,
    pub score: u32,
    /// Model named by the caller rather than estimated.
    pub forced: bool,
    /// Complexity pick was replaced by a larger context window.
    pub upgraded: bool,
    pub reasoning: String,
}
