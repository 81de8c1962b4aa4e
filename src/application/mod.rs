//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the scoring use cases and their text rendering.

mod decision;
pub mod report;

pub use decision::{ContextComparison, DecisionEngine, ScoringRequest};
