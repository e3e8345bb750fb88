//! Tiered dispatch: local answer, then cached answer, then a paid model.

use crate::tracker::{CostRecord, CostSummary, CostTracker};
use cw_cache::{generate_key, CacheStats, ResultCache};
use cw_core::{CostwiseConfig, Result};
use cw_local::{LocalResponse, LocalSlm, LocalStats, TaskContext};
use cw_router::{cost_for, LlmRouter, RouteRequest, RoutingDecision};
use tracing::{debug, info};

/// Where a request ended up.
#[derive(Debug, Clone)]
pub enum Dispatch {
    /// Answered by a local handler at zero model cost.
    Local(LocalResponse),
    /// The routed model answered this prompt before.
    Cached {
        decision: RoutingDecision,
        content: String,
    },
    /// Needs a model call; the caller performs it and reports back through
    /// [`Dispatcher::record_completion`].
    Model {
        decision: RoutingDecision,
        estimated_cost: f64,
    },
}

impl Dispatch {
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Local(_))
    }

    pub fn is_cached(&self) -> bool {
        matches!(self, Self::Cached { .. })
    }

    pub fn estimated_cost(&self) -> f64 {
        match self {
            Self::Local(_) | Self::Cached { .. } => 0.0,
            Self::Model { estimated_cost, .. } => *estimated_cost,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DispatchStats {
    pub local: LocalStats,
    pub cache: CacheStats,
    pub costs: CostSummary,
}

pub struct Dispatcher {
    pub local: LocalSlm,
    pub router: LlmRouter,
    pub cache: ResultCache,
    pub tracker: CostTracker,
}

impl Dispatcher {
    pub fn new(local: LocalSlm, router: LlmRouter, cache: ResultCache, tracker: CostTracker) -> Self {
        Self { local, router, cache, tracker }
    }

    pub fn from_config(config: &CostwiseConfig) -> Result<Self> {
        Ok(Self::new(
            LocalSlm::new(&config.local)?,
            LlmRouter::new(&config.router)?,
            ResultCache::new(&config.cache)?,
            CostTracker::new(&config.costs)?,
        ))
    }

    /// Dispatch one request. The cache is keyed by the routed model, so
    /// routing runs before the lookup; a hit still skips the model call.
    pub fn dispatch(
        &self,
        request: &RouteRequest,
        context: &TaskContext,
        expected_response_tokens: usize,
    ) -> Dispatch {
        let local = self.local.execute(&request.prompt, context);
        if local.used_local_model {
            info!(
                task_type = %local.task_type,
                confidence = local.confidence,
                elapsed_ms = local.execution_time_ms,
                "handled locally"
            );
            self.tracker.record(CostRecord::free());
            return Dispatch::Local(local);
        }

        let decision = self.router.decide(request, None);
        let key = generate_key(&request.prompt, &decision.model.model_name);
        if let Some(content) = self.cache.get(&key) {
            info!(model = %decision.model.model_name, "answered from cache");
            self.tracker.record(CostRecord::free());
            return Dispatch::Cached { decision, content };
        }

        let estimated_cost = cost_for(&decision.model, request, expected_response_tokens);
        info!(
            model = %decision.model.model_name,
            complexity = %decision.complexity,
            score = decision.score,
            upgraded = decision.upgraded,
            estimated_cost,
            "routed to model"
        );
        Dispatch::Model { decision, estimated_cost }
    }

    /// Report a finished model call: bill it and cache the answer for the
    /// same prompt on the same model.
    pub fn record_completion(
        &self,
        request: &RouteRequest,
        model_name: &str,
        content: impl Into<String>,
        input_tokens: u64,
        output_tokens: u64,
    ) -> CostRecord {
        self.cache.set(generate_key(&request.prompt, model_name), content);
        let record = self.tracker.record_llm_call(model_name, input_tokens, output_tokens);
        debug!(model = model_name, input_tokens, output_tokens, cost = record.cost, "recorded model call");
        record
    }

    pub fn stats(&self) -> DispatchStats {
        DispatchStats {
            local: self.local.get_stats(),
            cache: self.cache.get_stats(),
            costs: self.tracker.summary(),
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(LocalSlm::default(), LlmRouter::default(), ResultCache::default(), CostTracker::default())
    }
}
