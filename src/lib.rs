//! # Glycorisk
//!
//! Context-aware diabetes risk decision engine.
//!
//! This crate provides:
//! - Threshold selection by clinical context (screening, clinical visit, preventive)
//! - Probability-to-label conversion against a pre-trained binary classifier
//! - Risk-tier classification and confidence tagging
//! - Terminal front end for demonstration and manual entry
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core decision types (context, thresholds, features, results)
//! - `ports`: Trait definitions for the model provider (scaler, classifier)
//! - `adapters`: Concrete implementations (linear model, JSON artifact, log sanitizer)
//! - `application`: The decision engine and report rendering
//! - `console`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod console;
pub mod domain;
pub mod ports;

pub use application::DecisionEngine;
pub use config::EngineConfig;
pub use domain::{ClinicalContext, Confidence, Label, PatientFeatures, PredictionResult, RiskTier};

/// Result type for Glycorisk operations
pub type Result<T> = std::result::Result<T, GlycoriskError>;

/// Main error type for Glycorisk
#[derive(Debug, thiserror::Error)]
pub enum GlycoriskError {
    #[error("Feature schema mismatch: {0}")]
    Schema(String),

    #[error("Model output violates the probability contract: {0}")]
    ModelOutput(#[from] ports::ModelError),

    #[error("Invalid patient data: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Invalid threshold override: {0} (must be a finite value in [0, 1])")]
    InvalidThreshold(f64),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Model artifact error: {0}")]
    Artifact(#[from] adapters::ArtifactError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
