//! Model selection from complexity level.

use crate::rules::{classify_by_rules, ComplexityRules};
use crate::types::{ComplexityAssessment, RouteRequest, RoutingDecision};
use cw_core::{word_count, ComplexityLevel, CostwiseError, ModelConfig, Result, RouterConfig};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Levels searched, in order, when the picked model's window is too small.
pub const UPGRADE_ORDER: [ComplexityLevel; 4] = [
    ComplexityLevel::Expert,
    ComplexityLevel::Complex,
    ComplexityLevel::Moderate,
    ComplexityLevel::Simple,
];

/// Rough words-to-tokens ratio used for cost estimates.
pub const TOKENS_PER_WORD: f64 = 1.3;
pub const DEFAULT_RESPONSE_TOKENS: usize = 500;

/// Routes requests to the cheapest model tier that fits their complexity.
#[derive(Debug, Clone)]
pub struct LlmRouter {
    models: HashMap<ComplexityLevel, ModelConfig>,
    rules: ComplexityRules,
}

enum Selection<'a> {
    Forced {
        model: &'a ModelConfig,
        level: ComplexityLevel,
    },
    Estimated {
        model: &'a ModelConfig,
        assessment: ComplexityAssessment,
        upgraded: bool,
        fits: bool,
    },
}

impl LlmRouter {
    /// Every complexity level must have a model.
    pub fn new(config: &RouterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            models: config.models.clone(),
            rules: ComplexityRules::from_config(config)?,
        })
    }

    pub fn estimate_complexity(&self, request: &RouteRequest) -> ComplexityLevel {
        self.assess(request).level
    }

    pub fn assess(&self, request: &RouteRequest) -> ComplexityAssessment {
        let assessment = classify_by_rules(request, &self.rules);
        debug!(
            level = %assessment.level,
            score = assessment.score,
            signals = ?assessment.signals,
            "estimated request complexity"
        );
        assessment
    }

    fn model(&self, level: ComplexityLevel) -> &ModelConfig {
        &self.models[&level]
    }

    fn largest_window(&self) -> &ModelConfig {
        UPGRADE_ORDER
            .iter()
            .map(|level| self.model(*level))
            .max_by_key(|m| m.max_tokens)
            .unwrap_or_else(|| self.model(ComplexityLevel::Expert))
    }

    /// First level, cheapest upward, whose model carries `name`.
    fn find_by_name(&self, name: &str) -> Option<(ComplexityLevel, &ModelConfig)> {
        ComplexityLevel::ALL
            .iter()
            .filter_map(|level| self.models.get(level).map(|m| (*level, m)))
            .find(|(_, m)| m.model_name == name)
    }

    fn select(&self, request: &RouteRequest, force_model: Option<&str>) -> Selection<'_> {
        if let Some(name) = force_model {
            match self.find_by_name(name) {
                Some((level, model)) => return Selection::Forced { model, level },
                None => debug!(model = name, "forced model not registered, estimating instead"),
            }
        }

        let assessment = self.assess(request);
        let picked = self.model(assessment.level);
        if request.context_length <= picked.max_tokens {
            return Selection::Estimated { model: picked, assessment, upgraded: false, fits: true };
        }

        match UPGRADE_ORDER
            .iter()
            .map(|level| self.model(*level))
            .find(|m| m.max_tokens >= request.context_length)
        {
            Some(model) => Selection::Estimated { model, assessment, upgraded: true, fits: true },
            None => Selection::Estimated {
                model: self.largest_window(),
                assessment,
                upgraded: true,
                fits: false,
            },
        }
    }

    /// Select a model. A registered `force_model` bypasses estimation. When no
    /// model's window holds the context, the largest window is returned.
    pub fn route(&self, request: &RouteRequest, force_model: Option<&str>) -> &ModelConfig {
        match self.select(request, force_model) {
            Selection::Forced { model, .. } => model,
            Selection::Estimated { model, fits, .. } => {
                if !fits {
                    warn!(
                        context_length = request.context_length,
                        model = %model.model_name,
                        max_tokens = model.max_tokens,
                        "no model window holds the context, using the largest"
                    );
                }
                model
            }
        }
    }

    /// Like [`route`](Self::route) but fails when no window holds the context.
    pub fn try_route(&self, request: &RouteRequest, force_model: Option<&str>) -> Result<&ModelConfig> {
        match self.select(request, force_model) {
            Selection::Forced { model, .. } => Ok(model),
            Selection::Estimated { model, fits: true, .. } => Ok(model),
            Selection::Estimated { model, fits: false, .. } => Err(CostwiseError::ContextTooLarge {
                requested: request.context_length,
                largest: model.max_tokens,
            }),
        }
    }

    /// Route and explain the choice.
    pub fn decide(&self, request: &RouteRequest, force_model: Option<&str>) -> RoutingDecision {
        match self.select(request, force_model) {
            Selection::Forced { model, level } => RoutingDecision {
                model: model.clone(),
                complexity: level,
                score: 0,
                forced: true,
                upgraded: false,
                reasoning: format!("forced -> {}", model.model_name),
            },
            Selection::Estimated { model, assessment, upgraded, fits } => {
                let mut reasoning = format!("score={} | {}", assessment.score, assessment.signals.join(", "));
                if upgraded {
                    reasoning += &format!(
                        " | upgraded to {} for {} context tokens",
                        model.model_name, request.context_length
                    );
                }
                if !fits {
                    reasoning += " | context exceeds every window";
                }
                RoutingDecision {
                    model: model.clone(),
                    complexity: assessment.level,
                    score: assessment.score,
                    forced: false,
                    upgraded,
                    reasoning,
                }
            }
        }
    }

    /// Dollar estimate for serving the request, never negative.
    pub fn estimate_cost(&self, request: &RouteRequest, expected_response_tokens: usize) -> f64 {
        let model = self.route(request, None);
        cost_for(model, request, expected_response_tokens)
    }

    pub fn add_model_config(&mut self, level: ComplexityLevel, config: ModelConfig) {
        self.models.insert(level, config);
    }

    pub fn get_model_config(&self, level: ComplexityLevel) -> Option<&ModelConfig> {
        self.models.get(&level)
    }

    pub fn get_all_models(&self) -> HashMap<ComplexityLevel, ModelConfig> {
        self.models.clone()
    }
}

impl Default for LlmRouter {
    fn default() -> Self {
        Self::new(&RouterConfig::default()).expect("built-in router config is valid")
    }
}

/// Prompt tokens are approximated from the word count plus the context.
pub fn cost_for(model: &ModelConfig, request: &RouteRequest, expected_response_tokens: usize) -> f64 {
    let prompt_tokens = word_count(&request.prompt) as f64 * TOKENS_PER_WORD + request.context_length as f64;
    let total_tokens = prompt_tokens + expected_response_tokens as f64;
    (total_tokens / 1000.0) * model.cost_per_1k_tokens
}
