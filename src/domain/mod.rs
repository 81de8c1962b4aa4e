//! Domain layer: Core decision types.
//!
//! This module contains pure Rust types with no I/O.
//! All types are serializable and validate their own invariants.

mod context;
mod features;
mod prediction;
mod threshold;

pub use context::ClinicalContext;
pub use features::{PatientFeatures, FEATURE_COUNT, FEATURE_NAMES};
pub use prediction::{Confidence, Label, PredictionResult, RiskTier};
pub use threshold::{ThresholdPolicy, ThresholdPrecedence};
pub(crate) use threshold::is_probability;
