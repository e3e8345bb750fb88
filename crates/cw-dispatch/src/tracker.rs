//! Spend ledger for completed model calls and zero-cost answers.

use cw_core::{CostConfig, ModelPricing, Result};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, PartialEq)]
pub struct CostRecord {
    /// `None` for answers that never reached a model.
    pub model_name: Option<String>,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cost: f64,
}

impl CostRecord {
    pub fn free() -> Self {
        Self { model_name: None, input_tokens: 0, output_tokens: 0, cost: 0.0 }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CostSummary {
    pub total_cost: f64,
    pub total_tokens: u64,
    pub request_count: u64,
    pub average_cost_per_request: f64,
    pub cost_by_model: HashMap<String, f64>,
}

#[derive(Debug)]
pub struct CostTracker {
    pricing: HashMap<String, ModelPricing>,
    unknown_model_per_1k: f64,
    records: Mutex<Vec<CostRecord>>,
}

impl CostTracker {
    pub fn new(config: &CostConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            pricing: config.pricing.clone(),
            unknown_model_per_1k: config.unknown_model_per_1k,
            records: Mutex::new(Vec::new()),
        })
    }

    fn records(&self) -> MutexGuard<'_, Vec<CostRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Models without a price entry are billed at the flat unknown-model rate.
    pub fn cost_of(&self, model_name: &str, input_tokens: u64, output_tokens: u64) -> f64 {
        match self.pricing.get(model_name) {
            Some(p) => {
                input_tokens as f64 / 1000.0 * p.input_per_1k + output_tokens as f64 / 1000.0 * p.output_per_1k
            }
            None => (input_tokens + output_tokens) as f64 / 1000.0 * self.unknown_model_per_1k,
        }
    }

    pub fn record(&self, record: CostRecord) -> CostRecord {
        self.records().push(record.clone());
        record
    }

    pub fn record_llm_call(&self, model_name: &str, input_tokens: u64, output_tokens: u64) -> CostRecord {
        self.record(CostRecord {
            model_name: Some(model_name.to_string()),
            input_tokens,
            output_tokens,
            cost: self.cost_of(model_name, input_tokens, output_tokens),
        })
    }

    pub fn set_pricing(&mut self, model_name: impl Into<String>, pricing: ModelPricing) {
        self.pricing.insert(model_name.into(), pricing);
    }

    pub fn summary(&self) -> CostSummary {
        let records = self.records();
        let mut summary = CostSummary::default();
        for r in records.iter() {
            summary.total_cost += r.cost;
            summary.total_tokens += r.input_tokens + r.output_tokens;
            summary.request_count += 1;
            if let Some(model) = &r.model_name {
                *summary.cost_by_model.entry(model.clone()).or_insert(0.0) += r.cost;
            }
        }
        if summary.request_count > 0 {
            summary.average_cost_per_request = summary.total_cost / summary.request_count as f64;
        }
        summary
    }
}

impl Default for CostTracker {
    fn default() -> Self {
        let config = CostConfig::default();
        Self {
            pricing: config.pricing,
            unknown_model_per_1k: config.unknown_model_per_1k,
            records: Mutex::new(Vec::new()),
        }
    }
}
