//! Cache keys: SHA-256 over the model name and a normalized prompt.

use sha2::{Digest, Sha256};

const IGNORED_PUNCTUATION: [char; 6] = [',', '.', '!', '?', ';', ':'];

/// Lowercase, collapse whitespace, drop sentence punctuation.
pub fn normalize_prompt(prompt: &str) -> String {
    prompt
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .filter(|c| !IGNORED_PUNCTUATION.contains(c))
        .collect()
}

/// Prompts that differ only in case, spacing or punctuation share a key;
/// the same prompt sent to two models does not.
pub fn generate_key(prompt: &str, model: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(model.as_bytes());
    hasher.update([0u8]);
    hasher.update(normalize_prompt(prompt).as_bytes());
    format!("{:x}", hasher.finalize())
}
