//! Additive complexity rules, evaluated in a fixed order.

use crate::types::{ComplexityAssessment, RouteRequest, RuleScore};
use cw_core::{word_count, ComplexityLevel, CostwiseError, Result, RouterConfig};
use regex::Regex;

pub const EXPERT_THRESHOLD: u32 = 10;
pub const COMPLEX_THRESHOLD: u32 = 6;
pub const MODERATE_THRESHOLD: u32 = 3;

/// (exclusive lower bound in words, delta), highest bracket first.
pub const PROMPT_WORD_BRACKETS: [(usize, u32); 3] = [(200, 3), (100, 2), (50, 1)];
/// (exclusive lower bound in tokens, delta), highest bracket first.
pub const CONTEXT_TOKEN_BRACKETS: [(usize, u32); 3] = [(10_000, 3), (5_000, 2), (1_000, 1)];

pub const EXPERT_KEYWORD_BONUS: u32 = 4;
pub const COMPLEX_KEYWORD_BONUS: u32 = 2;
pub const MODERATE_KEYWORD_BONUS: u32 = 1;
pub const FLAG_BONUS: u32 = 2;

/// Compiled form of the router's keyword lists and technical patterns.
#[derive(Debug, Clone)]
pub struct ComplexityRules {
    /// Scanned in order; the first list with a hit wins.
    keyword_tiers: Vec<(ComplexityLevel, Vec<String>, u32)>,
    technical: Vec<Regex>,
}

impl ComplexityRules {
    pub fn from_config(config: &RouterConfig) -> Result<Self> {
        let technical = config
            .technical_patterns
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|source| CostwiseError::InvalidPattern { pattern: p.clone(), source })
            })
            .collect::<Result<Vec<_>>>()?;

        let lower = |kws: &[String]| kws.iter().map(|k| k.to_lowercase()).collect::<Vec<_>>();
        Ok(Self {
            keyword_tiers: vec![
                (ComplexityLevel::Expert, lower(&config.expert_keywords), EXPERT_KEYWORD_BONUS),
                (ComplexityLevel::Complex, lower(&config.complex_keywords), COMPLEX_KEYWORD_BONUS),
                (ComplexityLevel::Moderate, lower(&config.moderate_keywords), MODERATE_KEYWORD_BONUS),
            ],
            technical,
        })
    }
}

fn bracket(value: usize, brackets: &[(usize, u32)]) -> u32 {
    brackets.iter().find(|(bound, _)| value > *bound).map(|(_, d)| *d).unwrap_or(0)
}

pub fn score_prompt_length(words: usize) -> RuleScore {
    let delta = bracket(words, &PROMPT_WORD_BRACKETS);
    RuleScore {
        name: "promptLength",
        delta,
        signal: (delta > 0).then(|| format!("long prompt ({} words)", words)),
    }
}

pub fn score_context_length(tokens: usize) -> RuleScore {
    let delta = bracket(tokens, &CONTEXT_TOKEN_BRACKETS);
    RuleScore {
        name: "contextLength",
        delta,
        signal: (delta > 0).then(|| format!("large context ({} tokens)", tokens)),
    }
}

/// At most one keyword bonus applies.
pub fn score_keywords(text: &str, rules: &ComplexityRules) -> RuleScore {
    for (level, keywords, bonus) in &rules.keyword_tiers {
        if let Some(kw) = keywords.iter().find(|kw| text.contains(kw.as_str())) {
            return RuleScore {
                name: "keywords",
                delta: *bonus,
                signal: Some(format!("{} keyword ({})", level, kw)),
            };
        }
    }
    RuleScore { name: "keywords", delta: 0, signal: None }
}

pub fn score_flag(name: &'static str, set: bool) -> RuleScore {
    RuleScore {
        name,
        delta: if set { FLAG_BONUS } else { 0 },
        signal: set.then(|| name.to_string()),
    }
}

pub fn score_technical_depth(text: &str, rules: &ComplexityRules) -> RuleScore {
    let hits = rules.technical.iter().filter(|re| re.is_match(text)).count() as u32;
    RuleScore {
        name: "technicalDepth",
        delta: hits,
        signal: (hits > 0).then(|| format!("technical depth ({} areas)", hits)),
    }
}

pub fn level_for_score(score: u32) -> ComplexityLevel {
    if score >= EXPERT_THRESHOLD {
        ComplexityLevel::Expert
    } else if score >= COMPLEX_THRESHOLD {
        ComplexityLevel::Complex
    } else if score >= MODERATE_THRESHOLD {
        ComplexityLevel::Moderate
    } else {
        ComplexityLevel::Simple
    }
}

/// Evaluate every rule against a request.
pub fn evaluate_rules(request: &RouteRequest, rules: &ComplexityRules) -> Vec<RuleScore> {
    let text = request.prompt.to_lowercase();
    vec![
        score_prompt_length(word_count(&request.prompt)),
        score_context_length(request.context_length),
        score_keywords(&text, rules),
        score_flag("requiresCode", request.requires_code),
        score_flag("requiresReasoning", request.requires_reasoning),
        score_flag("requiresFunctions", request.metadata.requires_functions),
        score_technical_depth(&text, rules),
    ]
}

/// Classify by rules: sum of deltas mapped through the level thresholds.
pub fn classify_by_rules(request: &RouteRequest, rules: &ComplexityRules) -> ComplexityAssessment {
    let scores = evaluate_rules(request, rules);
    let score: u32 = scores.iter().map(|r| r.delta).sum();
    let signals = scores.into_iter().filter_map(|r| r.signal).collect();
    ComplexityAssessment { level: level_for_score(score), score, signals }
}
