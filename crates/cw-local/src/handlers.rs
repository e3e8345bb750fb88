//! Deterministic answers for routine tasks. No handler fails; problems become messages.

use crate::types::TaskContext;
use cw_core::config::{FALLBACK_TEMPLATE, GREETING_TEMPLATE, STATUS_TEMPLATE};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static RE_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+\.?[0-9]*").unwrap());
static RE_EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap());
static RE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://(?:[a-zA-Z0-9$-_@.&+!*(),]|%[0-9a-fA-F]{2})+").unwrap());
static RE_PHONE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\d{3}[-.]?\d{3}[-.]?\d{4}\b").unwrap());

pub const DIVIDE_BY_ZERO: &str = "Cannot divide by zero.";

fn template<'a>(templates: &'a HashMap<String, String>, key: &str, default: &'a str) -> &'a str {
    templates.get(key).map(String::as_str).unwrap_or(default)
}

/// Floats always carry a fractional part: `62` renders as `62.0`.
///
/// Exponents are signed and at least two digits wide (`1e+16`, `1e-05`), and
/// non-finite values print as `inf`, `-inf` and `nan`.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "nan".into();
    }
    let raw = format!("{:?}", value);
    match raw.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exp),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => raw,
    }
}

pub fn handle_greeting(context: &TaskContext, templates: &HashMap<String, String>) -> String {
    match context.user_name.as_deref().filter(|n| !n.is_empty()) {
        Some(name) => format!("Hello {}! I'm here to help. What can I do for you?", name),
        None => template(templates, "greeting", GREETING_TEMPLATE).to_string(),
    }
}

pub fn handle_status_check(context: &TaskContext, templates: &HashMap<String, String>) -> String {
    match context.agent_count.filter(|n| *n > 0) {
        Some(n) => format!("System is operational. {} agents are ready and available.", n),
        None => template(templates, "status_check", STATUS_TEMPLATE).to_string(),
    }
}

pub fn handle_calculation(prompt: &str) -> String {
    let numbers: Vec<&str> = RE_NUMBER.find_iter(prompt).map(|m| m.as_str()).take(2).collect();
    if numbers.len() < 2 {
        return "I can help with calculations. Please provide the numbers to calculate.".into();
    }

    let (a, b) = match (numbers[0].parse::<f64>(), numbers[1].parse::<f64>()) {
        (Ok(a), Ok(b)) => (a, b),
        _ => return "I can help with calculations. Please provide valid numbers.".into(),
    };

    let lower = prompt.to_lowercase();
    if lower.contains("add") || prompt.contains('+') || lower.contains("plus") {
        format!("The sum is: {}", format_number(a + b))
    } else if lower.contains("subtract") || prompt.contains('-') || lower.contains("minus") {
        format!("The difference is: {}", format_number(a - b))
    } else if lower.contains("multiply") || prompt.contains('*') || lower.contains("times") {
        format!("The product is: {}", format_number(a * b))
    } else if lower.contains("divide") || prompt.contains('/') {
        if b == 0.0 {
            return DIVIDE_BY_ZERO.into();
        }
        format!("The quotient is: {}", format_number(a / b))
    } else {
        format!(
            "Found numbers {} and {}. Please specify the operation.",
            format_number(a),
            format_number(b)
        )
    }
}

fn found(re: &Regex, text: &str, label: &str, none: &str) -> String {
    let hits: Vec<&str> = re.find_iter(text).map(|m| m.as_str()).collect();
    if hits.is_empty() {
        none.to_string()
    } else {
        format!("Found {}: {}", label, hits.join(", "))
    }
}

pub fn handle_extraction(prompt: &str, context: &TaskContext) -> String {
    let text = context.text.as_deref().unwrap_or(prompt);
    let lower = prompt.to_lowercase();

    if lower.contains("email") {
        return found(&RE_EMAIL, text, "emails", "No email addresses found.");
    }
    if lower.contains("url") || lower.contains("link") {
        return found(&RE_URL, text, "URLs", "No URLs found.");
    }
    if lower.contains("phone") {
        return found(&RE_PHONE, text, "phone numbers", "No phone numbers found.");
    }
    "I can extract emails, URLs, or phone numbers. Please specify what to extract.".into()
}

pub fn handle_listing(context: &TaskContext) -> String {
    if context.items.is_empty() {
        return "I can help list items. Please provide the items to list.".into();
    }
    let formatted: Vec<String> = context.items.iter().map(|item| format!("- {}", item)).collect();
    format!("Here are the items:\n{}", formatted.join("\n"))
}

pub fn handle_formatting() -> String {
    "I can help with data formatting. For complex formatting, please use the full LLM.".into()
}

/// Task types without a handler: registered template, then the pattern's own, then fallback.
pub fn handle_template(
    task_type: &str,
    pattern_template: Option<&str>,
    templates: &HashMap<String, String>,
) -> String {
    templates
        .get(task_type)
        .map(String::as_str)
        .or(pattern_template)
        .unwrap_or_else(|| template(templates, "fallback", FALLBACK_TEMPLATE))
        .to_string()
}
