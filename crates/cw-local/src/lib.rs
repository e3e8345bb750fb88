//! Costwise Local: routine-task short-circuit that answers without a model call.
//!
//! A prompt is routine when it is short, carries no complex-reasoning phrase,
//! and its best-matching pattern clears that pattern's confidence threshold.
//! Routine prompts go to a deterministic handler; everything else is reported
//! back as delegated so the caller can route it to a paid model.

pub mod classifier;
pub mod handlers;
pub mod slm;
pub mod types;

pub use slm::{LocalSlm, DELEGATED_CONTENT};
pub use types::*;
