use crate::*;
use crate::rules::*;
use cw_core::CostwiseError;

fn router() -> LlmRouter { LlmRouter::default() }
fn rules() -> ComplexityRules { ComplexityRules::from_config(&RouterConfig::default()).unwrap() }

const EXPERT_PROMPT: &str = "Analyze the distributed architecture and design an optimization strategy for authentication across concurrent services";

// ========== Individual Rules ==========

#[test]
fn test_prompt_length_brackets() {
    assert_eq!(score_prompt_length(0).delta, 0);
    assert_eq!(score_prompt_length(50).delta, 0);
    assert_eq!(score_prompt_length(51).delta, 1);
    assert_eq!(score_prompt_length(101).delta, 2);
    assert_eq!(score_prompt_length(201).delta, 3);
    assert_eq!(score_prompt_length(10_000).delta, 3);
}

#[test]
fn test_context_length_brackets() {
    assert_eq!(score_context_length(1000).delta, 0);
    assert_eq!(score_context_length(1001).delta, 1);
    assert_eq!(score_context_length(5001).delta, 2);
    assert_eq!(score_context_length(10_001).delta, 3);
    assert!(score_context_length(10_001).signal.unwrap().contains("context"));
}

#[test]
fn test_keywords_expert_wins_over_moderate() {
    let r = score_keywords("please analyze and summarize this", &rules());
    assert_eq!(r.delta, EXPERT_KEYWORD_BONUS);
    assert!(r.signal.unwrap().contains("expert"));
}

#[test]
fn test_keywords_single_bonus() {
    assert_eq!(score_keywords("explain and list", &rules()).delta, COMPLEX_KEYWORD_BONUS);
    assert_eq!(score_keywords("summarize this", &rules()).delta, MODERATE_KEYWORD_BONUS);
    assert_eq!(score_keywords("hello there", &rules()).delta, 0);
}

#[test]
fn test_technical_depth_counts_each_area() {
    assert_eq!(score_technical_depth("algorithm with security and async io", &rules()).delta, 3);
    assert_eq!(score_technical_depth("algorithm performance optimization", &rules()).delta, 1);
    assert_eq!(score_technical_depth("nothing technical", &rules()).delta, 0);
}

#[test]
fn test_technical_depth_word_boundaries() {
    assert_eq!(score_technical_depth("asynchronous", &rules()).delta, 0);
}

#[test]
fn test_flags() {
    assert_eq!(score_flag("requiresCode", true).delta, FLAG_BONUS);
    assert_eq!(score_flag("requiresCode", false).delta, 0);
    assert!(score_flag("requiresCode", false).signal.is_none());
}

#[test]
fn test_level_thresholds() {
    assert_eq!(level_for_score(0), ComplexityLevel::Simple);
    assert_eq!(level_for_score(2), ComplexityLevel::Simple);
    assert_eq!(level_for_score(3), ComplexityLevel::Moderate);
    assert_eq!(level_for_score(5), ComplexityLevel::Moderate);
    assert_eq!(level_for_score(6), ComplexityLevel::Complex);
    assert_eq!(level_for_score(9), ComplexityLevel::Complex);
    assert_eq!(level_for_score(10), ComplexityLevel::Expert);
}

#[test]
fn test_rule_order_is_fixed() {
    let names: Vec<_> = evaluate_rules(&RouteRequest::new("x"), &rules()).iter().map(|r| r.name).collect();
    assert_eq!(
        names,
        vec!["promptLength", "contextLength", "keywords", "requiresCode", "requiresReasoning", "requiresFunctions", "technicalDepth"]
    );
}

// ========== Complexity Estimation ==========

#[test]
fn test_empty_prompt_is_simple() {
    let a = router().assess(&RouteRequest::new(""));
    assert_eq!(a.score, 0);
    assert_eq!(a.level, ComplexityLevel::Simple);
    assert!(a.signals.is_empty());
}

#[test]
fn test_expert_prompt_with_reasoning() {
    let r = router();
    let req = RouteRequest::new(EXPERT_PROMPT).with_reasoning();
    let a = r.assess(&req);
    assert_eq!(a.score, 10);
    assert_eq!(a.level, ComplexityLevel::Expert);
    assert_eq!(r.route(&req, None).model_name, "gpt-4-turbo");
}

#[test]
fn test_expert_prompt_without_reasoning_is_complex() {
    let a = router().assess(&RouteRequest::new(EXPERT_PROMPT));
    assert_eq!(a.score, 8);
    assert_eq!(a.level, ComplexityLevel::Complex);
}

#[test]
fn test_flags_accumulate() {
    let req = RouteRequest::new("write it").with_code().with_reasoning().with_functions();
    assert_eq!(router().assess(&req).score, 6);
    assert_eq!(router().estimate_complexity(&req), ComplexityLevel::Complex);
}

#[test]
fn test_metadata_from_json() {
    let req: RouteRequest = serde_json::from_str(
        r#"{"prompt":"hi","metadata":{"requires_functions":true,"extra":{"tenant":"acme"}}}"#,
    )
    .unwrap();
    assert!(req.metadata.requires_functions);
    assert_eq!(router().assess(&req).score, FLAG_BONUS);
}

#[test]
fn test_long_prompt_scores_length() {
    let long = "word ".repeat(201);
    assert_eq!(router().assess(&RouteRequest::new(long)).score, 3);
}

#[test]
fn test_determinism() {
    let r = router();
    let req = RouteRequest::new(EXPERT_PROMPT).with_context_length(6000).with_code();
    let first = r.estimate_complexity(&req);
    for _ in 0..50 {
        assert_eq!(r.estimate_complexity(&req), first);
    }
}

#[test]
fn test_monotonic_in_context_length() {
    let r = router();
    let mut prev_score = 0;
    let mut prev_level = ComplexityLevel::Simple;
    for ctx in [0, 500, 1000, 1001, 2000, 5000, 5001, 8000, 10_000, 10_001, 50_000, 1_000_000] {
        let a = r.assess(&RouteRequest::new("summarize the security report").with_context_length(ctx));
        assert!(a.score >= prev_score);
        assert!(a.level >= prev_level);
        prev_score = a.score;
        prev_level = a.level;
    }
}

// ========== Model Selection ==========

#[test]
fn test_route_simple_to_local() {
    assert_eq!(router().route(&RouteRequest::new("hello"), None).model_name, "local-slm");
}

#[test]
fn test_route_upgrade_for_large_context() {
    let r = router();
    let req = RouteRequest::new("hello").with_context_length(50_000);
    assert_eq!(r.route(&req, None).model_name, "gpt-4-turbo");
    let d = r.decide(&req, None);
    assert!(d.upgraded);
    assert_eq!(d.complexity, ComplexityLevel::Moderate);
    assert!(d.reasoning.contains("upgraded"));
}

#[test]
fn test_route_upgrade_searches_expert_first() {
    // Simple picks a 2048 window; the search takes the first level that fits.
    let req = RouteRequest::new("hello").with_context_length(3000);
    assert_eq!(router().route(&req, None).model_name, "gpt-4-turbo");
}

#[test]
fn test_route_context_within_window_not_upgraded() {
    let d = router().decide(&RouteRequest::new("hello").with_context_length(2048), None);
    assert!(!d.upgraded);
    assert_eq!(d.model.model_name, "local-slm");
}

#[test]
fn test_route_oversized_context_falls_back_to_largest() {
    let req = RouteRequest::new("hello").with_context_length(200_000);
    let r = router();
    assert_eq!(r.route(&req, None).max_tokens, 128_000);
    assert!(r.decide(&req, None).reasoning.contains("exceeds"));
}

#[test]
fn test_try_route_oversized_context_errors() {
    let req = RouteRequest::new("hello").with_context_length(200_000);
    match router().try_route(&req, None) {
        Err(CostwiseError::ContextTooLarge { requested, largest }) => {
            assert_eq!(requested, 200_000);
            assert_eq!(largest, 128_000);
        }
        other => panic!("expected ContextTooLarge, got {:?}", other),
    }
}

#[test]
fn test_try_route_ok() {
    let req = RouteRequest::new("hello").with_context_length(50_000);
    assert_eq!(router().try_route(&req, None).unwrap().model_name, "gpt-4-turbo");
}

#[test]
fn test_force_model() {
    let r = router();
    let req = RouteRequest::new("");
    assert_eq!(r.route(&req, Some("gpt-4")).model_name, "gpt-4");
    let d = r.decide(&req, Some("gpt-4"));
    assert!(d.forced);
    assert_eq!(d.complexity, ComplexityLevel::Complex);
}

#[test]
fn test_force_model_bypasses_context_check() {
    let req = RouteRequest::new("").with_context_length(100_000);
    assert_eq!(router().try_route(&req, Some("local-slm")).unwrap().model_name, "local-slm");
}

#[test]
fn test_force_model_registered_twice_picks_cheapest_level() {
    for _ in 0..64 {
        let mut r = router();
        r.add_model_config(ComplexityLevel::Expert, ModelConfig::new("gpt-4", 0.5, 64_000));
        let req = RouteRequest::new("");
        let d = r.decide(&req, Some("gpt-4"));
        assert_eq!(d.complexity, ComplexityLevel::Complex);
        assert_eq!(d.model.max_tokens, 8192);
        assert_eq!(r.route(&req, Some("gpt-4")).max_tokens, 8192);
        assert_eq!(r.try_route(&req, Some("gpt-4")).unwrap().max_tokens, 8192);
    }
}

#[test]
fn test_force_unknown_model_is_ignored() {
    let d = router().decide(&RouteRequest::new("hello"), Some("no-such-model"));
    assert!(!d.forced);
    assert_eq!(d.model.model_name, "local-slm");
}

// ========== Cost ==========

#[test]
fn test_cost_zero_for_free_model() {
    assert_eq!(router().estimate_cost(&RouteRequest::new("hello"), DEFAULT_RESPONSE_TOKENS), 0.0);
}

#[test]
fn test_cost_formula() {
    // implement (+2) + code (+2) + reasoning (+2) -> Complex, gpt-4 at 0.03.
    let req = RouteRequest::new("implement a parser").with_code().with_reasoning();
    let cost = router().estimate_cost(&req, 500);
    let expected = (3.0 * 1.3 + 500.0) / 1000.0 * 0.03;
    assert!((cost - expected).abs() < 1e-12);
}

#[test]
fn test_cost_includes_context() {
    let req = RouteRequest::new("hello").with_context_length(50_000);
    let cost = router().estimate_cost(&req, 0);
    let expected = (1.3 + 50_000.0) / 1000.0 * 0.01;
    assert!((cost - expected).abs() < 1e-9);
}

#[test]
fn test_cost_never_negative() {
    let r = router();
    for prompt in ["", "hello", EXPERT_PROMPT, "summarize"] {
        for ctx in [0, 3000, 20_000, 500_000] {
            assert!(r.estimate_cost(&RouteRequest::new(prompt).with_context_length(ctx), 500) >= 0.0);
        }
    }
}

// ========== Model Table ==========

#[test]
fn test_add_model_config_overwrites() {
    let mut r = router();
    r.add_model_config(ComplexityLevel::Simple, ModelConfig::new("tiny", 0.0001, 1024));
    assert_eq!(r.route(&RouteRequest::new("hello"), None).model_name, "tiny");
    assert_eq!(r.get_all_models().len(), 4);
}

#[test]
fn test_get_model_config() {
    let r = router();
    assert_eq!(r.get_model_config(ComplexityLevel::Moderate).unwrap().model_name, "gpt-3.5-turbo");
}

#[test]
fn test_get_all_models_is_a_copy() {
    let r = router();
    let mut all = r.get_all_models();
    all.remove(&ComplexityLevel::Expert);
    assert!(r.get_model_config(ComplexityLevel::Expert).is_some());
}

#[test]
fn test_new_rejects_bad_technical_pattern() {
    let mut c = RouterConfig::default();
    c.technical_patterns.push("(unclosed".into());
    assert!(matches!(LlmRouter::new(&c), Err(CostwiseError::InvalidPattern { .. })));
}

#[test]
fn test_new_rejects_missing_level() {
    let mut c = RouterConfig::default();
    c.models.remove(&ComplexityLevel::Moderate);
    assert!(matches!(LlmRouter::new(&c), Err(CostwiseError::MissingModel(_))));
}

#[test]
fn test_custom_keywords() {
    let mut c = RouterConfig::default();
    c.expert_keywords = vec!["Prove".into()];
    let r = LlmRouter::new(&c).unwrap();
    assert_eq!(r.assess(&RouteRequest::new("prove it")).score, EXPERT_KEYWORD_BONUS);
}

// ========== Performance ==========

#[test]
fn test_route_performance() {
    let r = router();
    let req = RouteRequest::new(EXPERT_PROMPT).with_context_length(4000);
    let start = std::time::Instant::now();
    for _ in 0..1000 {
        r.route(&req, None);
    }
    assert!(start.elapsed().as_millis() < 5000);
}
