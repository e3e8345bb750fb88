use serde::{Deserialize, Serialize};
use std::fmt;

/// Task complexity tier, ordered by the capability a model needs to serve it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityLevel {
    Simple = 0,
    Moderate = 1,
    Complex = 2,
    Expert = 3,
}

impl ComplexityLevel {
    /// All levels, lowest first.
    pub const ALL: [ComplexityLevel; 4] = [
        ComplexityLevel::Simple,
        ComplexityLevel::Moderate,
        ComplexityLevel::Complex,
        ComplexityLevel::Expert,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Moderate => "moderate",
            Self::Complex => "complex",
            Self::Expert => "expert",
        }
    }
}

impl fmt::Display for ComplexityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cost and capability profile of one selectable model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub model_name: String,
    pub cost_per_1k_tokens: f64,
    /// Context window in tokens.
    pub max_tokens: usize,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default)]
    pub supports_functions: bool,
    #[serde(default = "default_quality")]
    pub estimated_quality: f64,
}

fn default_temperature() -> f64 {
    0.7
}

fn default_quality() -> f64 {
    0.8
}

impl ModelConfig {
    pub fn new(model_name: impl Into<String>, cost_per_1k_tokens: f64, max_tokens: usize) -> Self {
        Self {
            model_name: model_name.into(),
            cost_per_1k_tokens,
            max_tokens,
            temperature: default_temperature(),
            supports_functions: false,
            estimated_quality: default_quality(),
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_functions(mut self, supports_functions: bool) -> Self {
        self.supports_functions = supports_functions;
        self
    }

    pub fn with_quality(mut self, estimated_quality: f64) -> Self {
        self.estimated_quality = estimated_quality;
        self
    }

    pub fn is_free(&self) -> bool {
        self.cost_per_1k_tokens == 0.0
    }
}
