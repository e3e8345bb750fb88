//! Local executor: answers routine tasks without a model call.

use crate::classifier::Classifier;
use crate::handlers;
use crate::types::*;
use cw_core::{LocalConfig, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::debug;

pub const DELEGATED_CONTENT: &str = "Task requires full LLM processing";

#[derive(Debug, Default)]
struct Counters {
    total_requests: AtomicU64,
    handled_locally: AtomicU64,
    delegated_to_llm: AtomicU64,
}

/// Pattern-matching stand-in for a small local model.
///
/// `execute` and `get_stats` take `&self`, so one instance can serve many
/// threads; changing the tables needs `&mut self`.
#[derive(Debug)]
pub struct LocalSlm {
    patterns: Vec<TaskPattern>,
    templates: HashMap<String, String>,
    complex_indicators: Vec<String>,
    complex_connectives: Vec<String>,
    max_routine_words: usize,
    counters: Counters,
}

impl LocalSlm {
    pub fn new(config: &LocalConfig) -> Result<Self> {
        config.validate()?;
        let patterns = config.patterns.iter().map(TaskPattern::from_config).collect::<Result<Vec<_>>>()?;
        let lower = |v: &[String]| v.iter().map(|s| s.to_lowercase()).collect::<Vec<_>>();
        Ok(Self {
            patterns,
            templates: config.templates.clone(),
            complex_indicators: lower(&config.complex_indicators),
            complex_connectives: lower(&config.complex_connectives),
            max_routine_words: config.max_routine_words,
            counters: Counters::default(),
        })
    }

    fn classifier(&self) -> Classifier<'_> {
        Classifier {
            patterns: &self.patterns,
            complex_indicators: &self.complex_indicators,
            complex_connectives: &self.complex_connectives,
            max_routine_words: self.max_routine_words,
        }
    }

    pub fn is_routine_task(&self, prompt: &str, _context: &TaskContext) -> RoutineCheck {
        let check = self.classifier().classify(prompt);
        debug!(
            is_routine = check.is_routine,
            confidence = check.confidence,
            task_type = %check.task_type,
            "classified prompt"
        );
        check
    }

    pub fn calculate_confidence(&self, prompt: &str, pattern: &TaskPattern) -> f64 {
        self.classifier().confidence(prompt, pattern)
    }

    pub fn execute(&self, prompt: &str, context: &TaskContext) -> LocalResponse {
        let start = Instant::now();
        self.counters.total_requests.fetch_add(1, Ordering::Relaxed);

        let check = self.is_routine_task(prompt, context);
        if !check.is_routine {
            self.counters.delegated_to_llm.fetch_add(1, Ordering::Relaxed);
            return LocalResponse {
                content: DELEGATED_CONTENT.to_string(),
                confidence: 0.0,
                task_type: COMPLEX.to_string(),
                execution_time_ms: elapsed_ms(start),
                used_local_model: false,
            };
        }

        self.counters.handled_locally.fetch_add(1, Ordering::Relaxed);
        let content = self.execute_task(prompt, &check.task_type, context);

        LocalResponse {
            content,
            confidence: check.confidence,
            task_type: check.task_type,
            execution_time_ms: elapsed_ms(start),
            used_local_model: true,
        }
    }

    fn execute_task(&self, prompt: &str, task_type: &str, context: &TaskContext) -> String {
        match task_type {
            GREETING => handlers::handle_greeting(context, &self.templates),
            STATUS_CHECK => handlers::handle_status_check(context, &self.templates),
            CALCULATION => handlers::handle_calculation(prompt),
            EXTRACTION => handlers::handle_extraction(prompt, context),
            LISTING => handlers::handle_listing(context),
            FORMATTING => handlers::handle_formatting(),
            other => {
                let pattern_template = self
                    .patterns
                    .iter()
                    .filter(|p| p.task_type == other)
                    .find_map(|p| p.template_response.as_deref());
                handlers::handle_template(other, pattern_template, &self.templates)
            }
        }
    }

    pub fn get_stats(&self) -> LocalStats {
        let total = self.counters.total_requests.load(Ordering::Relaxed);
        let handled = self.counters.handled_locally.load(Ordering::Relaxed);
        let rate = if total > 0 { handled as f64 / total as f64 * 100.0 } else { 0.0 };
        LocalStats {
            total_requests: total,
            handled_locally: handled,
            delegated_to_llm: self.counters.delegated_to_llm.load(Ordering::Relaxed),
            local_handling_rate: (rate * 100.0).round() / 100.0,
        }
    }

    pub fn add_task_pattern(&mut self, pattern: TaskPattern) {
        self.patterns.push(pattern);
    }

    pub fn add_template(&mut self, task_type: impl Into<String>, template: impl Into<String>) {
        self.templates.insert(task_type.into(), template.into());
    }

    pub fn patterns(&self) -> &[TaskPattern] {
        &self.patterns
    }
}

impl Default for LocalSlm {
    fn default() -> Self {
        Self::new(&LocalConfig::default()).expect("built-in task patterns compile")
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
