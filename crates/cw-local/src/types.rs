use cw_core::{CostwiseError, Result, TaskPatternConfig};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

pub const GREETING: &str = "greeting";
pub const STATUS_CHECK: &str = "status_check";
pub const CALCULATION: &str = "calculation";
pub const EXTRACTION: &str = "extraction";
pub const LISTING: &str = "listing";
pub const FORMATTING: &str = "formatting";
pub const UNKNOWN: &str = "unknown";
pub const COMPLEX: &str = "complex";

/// Routine-task recognizer. The regex is always case-insensitive.
#[derive(Debug, Clone)]
pub struct TaskPattern {
    pub pattern: Regex,
    pub task_type: String,
    pub confidence_threshold: f64,
    pub template_response: Option<String>,
}

impl TaskPattern {
    pub fn new(pattern: &str, task_type: impl Into<String>) -> Result<Self> {
        let compiled = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| CostwiseError::InvalidPattern { pattern: pattern.to_string(), source })?;
        Ok(Self {
            pattern: compiled,
            task_type: task_type.into(),
            confidence_threshold: 0.8,
            template_response: None,
        })
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template_response = Some(template.into());
        self
    }

    pub fn from_config(config: &TaskPatternConfig) -> Result<Self> {
        let mut p = Self::new(&config.pattern, config.task_type.clone())?.with_threshold(config.confidence_threshold);
        p.template_response = config.template_response.clone();
        Ok(p)
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// What a handler may personalize its answer with.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskContext {
    pub user_name: Option<String>,
    pub agent_count: Option<u64>,
    pub items: Vec<String>,
    /// Source text for extraction; the prompt when absent.
    pub text: Option<String>,
}

impl TaskContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user_name(mut self, name: impl Into<String>) -> Self {
        self.user_name = Some(name.into());
        self
    }

    pub fn with_agent_count(mut self, count: u64) -> Self {
        self.agent_count = Some(count);
        self
    }

    pub fn with_items<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.items = items.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

/// Outcome of routine-task classification.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutineCheck {
    pub is_routine: bool,
    /// Reported on rejection too.
    pub confidence: f64,
    pub task_type: String,
}

impl RoutineCheck {
    pub(crate) fn rejected(confidence: f64, task_type: &str) -> Self {
        Self { is_routine: false, confidence, task_type: task_type.to_string() }
    }
}

/// Response from local execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalResponse {
    pub content: String,
    pub confidence: f64,
    pub task_type: String,
    pub execution_time_ms: f64,
    pub used_local_model: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocalStats {
    pub total_requests: u64,
    pub handled_locally: u64,
    pub delegated_to_llm: u64,
    /// Percent, two decimals.
    pub local_handling_rate: f64,
}
