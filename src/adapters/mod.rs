//! Adapters layer: Concrete implementations of ports.
//!
//! - `linear`: standard scaler + logistic regression model provider
//! - `artifact`: JSON model artifact loading with digest manifest
//! - `sanitize`: PII filtering for logs

pub mod artifact;
pub mod linear;
pub mod sanitize;

pub use artifact::{ArtifactError, ModelArtifact};
pub use linear::{LogisticRegression, StandardScaler};
