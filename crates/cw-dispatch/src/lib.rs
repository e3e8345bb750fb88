//! Costwise Dispatch: local short-circuit first, cached answer second, paid model tier last.

pub mod dispatcher;
pub mod tracker;

pub use dispatcher::{Dispatch, DispatchStats, Dispatcher};
pub use tracker::{CostRecord, CostSummary, CostTracker};
