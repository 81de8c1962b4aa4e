//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundary
//! between the decision engine and the model provider that supplies a
//! fitted scaler and classifier.

mod model;

pub use model::{Classifier, FeatureScaler, Matrix, ModelError};
