//! Routine-task classification by pattern table.

use crate::types::{RoutineCheck, TaskPattern, COMPLEX, UNKNOWN};
use cw_core::word_count;

pub const BASE_CONFIDENCE: f64 = 0.5;
pub const MATCH_BONUS: f64 = 0.3;
pub const SHORT_PROMPT_BONUS: f64 = 0.2;
pub const MEDIUM_PROMPT_BONUS: f64 = 0.1;
pub const CONNECTIVE_PENALTY: f64 = 0.2;

/// Tables the classifier reads; borrowed from the owning `LocalSlm`.
pub struct Classifier<'a> {
    pub patterns: &'a [TaskPattern],
    pub complex_indicators: &'a [String],
    pub complex_connectives: &'a [String],
    pub max_routine_words: usize,
}

impl Classifier<'_> {
    /// Confidence in [0, 1] that `pattern` is the right reading of `prompt`.
    ///
    /// The match bonus is constant at the classifier's call site, which only
    /// scores patterns that already matched.
    pub fn confidence(&self, prompt: &str, pattern: &TaskPattern) -> f64 {
        let mut confidence = BASE_CONFIDENCE;

        if pattern.is_match(prompt) {
            confidence += MATCH_BONUS;
        }

        let words = word_count(prompt);
        if words <= 10 {
            confidence += SHORT_PROMPT_BONUS;
        } else if words <= 20 {
            confidence += MEDIUM_PROMPT_BONUS;
        }

        let lower = prompt.to_lowercase();
        if self.complex_connectives.iter().any(|w| lower.contains(w.as_str())) {
            confidence -= CONNECTIVE_PENALTY;
        }

        confidence.clamp(0.0, 1.0)
    }

    /// Best-scoring matching pattern; ties keep the earlier one.
    pub fn best_match(&self, prompt: &str) -> Option<(&TaskPattern, f64)> {
        let lower = prompt.trim().to_lowercase();
        let mut best: Option<(&TaskPattern, f64)> = None;
        for pattern in self.patterns.iter().filter(|p| p.is_match(&lower)) {
            let confidence = self.confidence(prompt, pattern);
            if best.map_or(confidence > 0.0, |(_, c)| confidence > c) {
                best = Some((pattern, confidence));
            }
        }
        best
    }

    pub fn classify(&self, prompt: &str) -> RoutineCheck {
        if word_count(prompt) > self.max_routine_words {
            return RoutineCheck::rejected(0.0, UNKNOWN);
        }

        let lower = prompt.trim().to_lowercase();
        if self.complex_indicators.iter().any(|i| lower.contains(i.as_str())) {
            return RoutineCheck::rejected(0.0, COMPLEX);
        }

        match self.best_match(prompt) {
            Some((pattern, confidence)) if confidence >= pattern.confidence_threshold => RoutineCheck {
                is_routine: true,
                confidence,
                task_type: pattern.task_type.clone(),
            },
            Some((_, confidence)) => RoutineCheck::rejected(confidence, UNKNOWN),
            None => RoutineCheck::rejected(0.0, UNKNOWN),
        }
    }
}
