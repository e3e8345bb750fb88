//! Built-in routing and local-task tables, overridable from JSON.

use crate::error::{CostwiseError, Result};
use crate::types::{ComplexityLevel, ModelConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

fn s(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CostwiseConfig {
    pub router: RouterConfig,
    pub local: LocalConfig,
    pub cache: CacheConfig,
    pub costs: CostConfig,
}

impl CostwiseConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        tracing::debug!(path = %path.as_ref().display(), "loading costwise config");
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        self.router.validate()?;
        self.local.validate()?;
        self.cache.validate()?;
        self.costs.validate()
    }
}

/// Model table and complexity signals for the router.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    pub models: HashMap<ComplexityLevel, ModelConfig>,
    pub expert_keywords: Vec<String>,
    pub complex_keywords: Vec<String>,
    pub moderate_keywords: Vec<String>,
    /// Regexes matched against the lowercased prompt, +1 each.
    pub technical_patterns: Vec<String>,
}

impl RouterConfig {
    pub fn validate(&self) -> Result<()> {
        for level in ComplexityLevel::ALL {
            let model = self
                .models
                .get(&level)
                .ok_or_else(|| CostwiseError::MissingModel(level.to_string()))?;
            if model.cost_per_1k_tokens < 0.0 {
                return Err(CostwiseError::Config(format!(
                    "negative cost for model {}",
                    model.model_name
                )));
            }
            if !(0.0..=1.0).contains(&model.estimated_quality) {
                return Err(CostwiseError::Config(format!(
                    "estimated_quality out of range for model {}",
                    model.model_name
                )));
            }
        }
        Ok(())
    }
}

pub fn default_models() -> HashMap<ComplexityLevel, ModelConfig> {
    let mut m = HashMap::new();
    m.insert(
        ComplexityLevel::Simple,
        ModelConfig::new("local-slm", 0.0, 2048).with_temperature(0.5).with_quality(0.7),
    );
    m.insert(
        ComplexityLevel::Moderate,
        ModelConfig::new("gpt-3.5-turbo", 0.002, 4096).with_functions(true).with_quality(0.85),
    );
    m.insert(
        ComplexityLevel::Complex,
        ModelConfig::new("gpt-4", 0.03, 8192).with_functions(true).with_quality(0.95),
    );
    m.insert(
        ComplexityLevel::Expert,
        ModelConfig::new("gpt-4-turbo", 0.01, 128_000)
            .with_temperature(0.8)
            .with_functions(true)
            .with_quality(0.98),
    );
    m
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            models: default_models(),
            expert_keywords: s(&[
                "analyze", "evaluate", "design", "architect", "optimize",
                "refactor", "debug complex", "comprehensive", "strategic",
            ]),
            complex_keywords: s(&[
                "explain", "compare", "generate code", "review", "implement",
                "integrate", "troubleshoot", "research",
            ]),
            moderate_keywords: s(&[
                "summarize", "translate", "format", "convert", "list",
                "describe", "simple code", "basic",
            ]),
            technical_patterns: s(&[
                r"\b(?:algorithm|complexity|performance|optimization)\b",
                r"\b(?:architecture|design pattern|best practice)\b",
                r"\b(?:security|authentication|authorization)\b",
                r"\b(?:distributed|concurrent|parallel|async)\b",
            ]),
        }
    }
}

/// One routine-task recognizer as written in configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskPatternConfig {
    pub pattern: String,
    pub task_type: String,
    #[serde(default = "default_threshold")]
    pub confidence_threshold: f64,
    #[serde(default)]
    pub template_response: Option<String>,
}

fn default_threshold() -> f64 {
    0.8
}

impl TaskPatternConfig {
    pub fn new(pattern: &str, task_type: &str, confidence_threshold: f64) -> Self {
        Self {
            pattern: pattern.to_string(),
            task_type: task_type.to_string(),
            confidence_threshold,
            template_response: None,
        }
    }

    pub fn with_template(mut self, template: &str) -> Self {
        self.template_response = Some(template.to_string());
        self
    }
}

/// Pattern table and templates for the local task executor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalConfig {
    pub patterns: Vec<TaskPatternConfig>,
    pub templates: HashMap<String, String>,
    /// Phrases that mark a prompt as needing a full model.
    pub complex_indicators: Vec<String>,
    /// Connectives that lower match confidence.
    pub complex_connectives: Vec<String>,
    pub max_routine_words: usize,
}

pub const GREETING_TEMPLATE: &str = "Hello! I'm here to help. What can I do for you?";
pub const STATUS_TEMPLATE: &str = "System is operational. All agents are ready.";
pub const FALLBACK_TEMPLATE: &str = "I can help with that. Let me process your request.";

impl LocalConfig {
    pub fn validate(&self) -> Result<()> {
        for p in &self.patterns {
            if !(0.0..=1.0).contains(&p.confidence_threshold) {
                return Err(CostwiseError::Config(format!(
                    "confidence_threshold {} out of range for task type {}",
                    p.confidence_threshold, p.task_type
                )));
            }
        }
        Ok(())
    }
}

impl Default for LocalConfig {
    fn default() -> Self {
        let mut templates = HashMap::new();
        templates.insert("greeting".to_string(), GREETING_TEMPLATE.to_string());
        templates.insert("status_check".to_string(), STATUS_TEMPLATE.to_string());
        templates.insert("fallback".to_string(), FALLBACK_TEMPLATE.to_string());

        Self {
            patterns: vec![
                TaskPatternConfig::new(r"\b(hello|hi|hey|greetings)\b", "greeting", 0.9)
                    .with_template(GREETING_TEMPLATE),
                TaskPatternConfig::new(r"\b(status|health|alive|ping|check)\b", "status_check", 0.85)
                    .with_template(STATUS_TEMPLATE),
                TaskPatternConfig::new(
                    r"\b(calculate|compute|add|subtract|multiply|divide)\b.*\d+",
                    "calculation",
                    0.8,
                ),
                TaskPatternConfig::new(r"\b(format|convert|transform)\b.*(json|csv|yaml|xml)", "formatting", 0.75),
                TaskPatternConfig::new(r"\b(extract|get|find)\b.*(email|url|phone|date)", "extraction", 0.8),
                TaskPatternConfig::new(r"\b(list|show|display|enumerate)\b", "listing", 0.7),
                TaskPatternConfig::new(
                    r"\btranslate\b.*(to|into)\s+(spanish|french|german)",
                    "translation",
                    0.75,
                ),
                TaskPatternConfig::new(r"\b(summarize|tldr|brief)\b", "summary", 0.7),
            ],
            templates,
            complex_indicators: s(&[
                "analyze", "evaluate", "design", "architect", "optimize",
                "explain why", "how does", "what if", "compare and contrast",
            ]),
            complex_connectives: s(&["however", "therefore", "consequently", "nevertheless"]),
            max_routine_words: 50,
        }
    }
}

/// Result cache sizing. `default_ttl_seconds: null` keeps entries until evicted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub max_size: usize,
    pub default_ttl_seconds: Option<u64>,
}

impl CacheConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_size == 0 {
            return Err(CostwiseError::Config("cache max_size must be at least 1".into()));
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { max_size: 1000, default_ttl_seconds: Some(3600) }
    }
}

/// Dollars per 1K tokens, billed separately for input and output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelPricing {
    pub input_per_1k: f64,
    pub output_per_1k: f64,
}

impl ModelPricing {
    pub fn new(input_per_1k: f64, output_per_1k: f64) -> Self {
        Self { input_per_1k, output_per_1k }
    }
}

/// Per-model prices used when recording completed model calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CostConfig {
    pub pricing: HashMap<String, ModelPricing>,
    /// Flat rate for both directions when a model has no price entry.
    pub unknown_model_per_1k: f64,
}

impl CostConfig {
    pub fn validate(&self) -> Result<()> {
        let negative = self
            .pricing
            .iter()
            .find(|(_, p)| p.input_per_1k < 0.0 || p.output_per_1k < 0.0);
        if let Some((model, _)) = negative {
            return Err(CostwiseError::Config(format!("negative price for model {}", model)));
        }
        if self.unknown_model_per_1k < 0.0 {
            return Err(CostwiseError::Config("negative unknown_model_per_1k".into()));
        }
        Ok(())
    }
}

impl Default for CostConfig {
    fn default() -> Self {
        let pricing = [
            ("gpt-4", 0.03, 0.06),
            ("gpt-4-turbo", 0.01, 0.03),
            ("gpt-3.5-turbo", 0.0015, 0.002),
            ("claude-3-opus", 0.015, 0.075),
            ("claude-3-sonnet", 0.003, 0.015),
            ("claude-3-haiku", 0.00025, 0.00125),
            ("local-slm", 0.0, 0.0),
        ]
        .into_iter()
        .map(|(name, input, output)| (name.to_string(), ModelPricing::new(input, output)))
        .collect();

        Self { pricing, unknown_model_per_1k: 0.01 }
    }
}
