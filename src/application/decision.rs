//! Decision engine: turns a raw feature vector into a clinical decision.
//!
//! This service coordinates:
//! - Threshold resolution (context table vs. explicit override)
//! - Schema and range checks on the raw vector
//! - Normalization through the fitted scaler
//! - Positive-class probability from the fitted classifier
//! - Label, risk tier and confidence derivation

use std::sync::Arc;

use rayon::prelude::*;
use serde::Serialize;

use crate::config::{EngineConfig, ValidationMode};
use crate::domain::{
    is_probability, ClinicalContext, PatientFeatures, PredictionResult, ThresholdPrecedence,
    FEATURE_NAMES,
};
use crate::ports::{Classifier, FeatureScaler, Matrix, ModelError};
use crate::{GlycoriskError, Result};

/// One independent scoring request, for batch use.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringRequest {
    pub features: Vec<f64>,
    pub context: ClinicalContext,
    pub threshold_override: Option<f64>,
}

impl ScoringRequest {
    #[must_use]
    pub fn new(features: Vec<f64>, context: ClinicalContext) -> Self {
        Self {
            features,
            context,
            threshold_override: None,
        }
    }

    #[must_use]
    pub fn with_override(mut self, threshold: f64) -> Self {
        self.threshold_override = Some(threshold);
        self
    }
}

/// The same feature vector scored under every recognized context, from most
/// sensitive to most specific.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextComparison {
    results: Vec<PredictionResult>,
}

impl ContextComparison {
    #[must_use]
    pub fn results(&self) -> &[PredictionResult] {
        &self.results
    }

    /// Shared probability (identical across contexts).
    #[must_use]
    pub fn probability(&self) -> Option<f64> {
        self.results.first().map(PredictionResult::probability)
    }

    /// Whether the contexts disagree on the label.
    #[must_use]
    pub fn labels_diverge(&self) -> bool {
        self.results
            .windows(2)
            .any(|pair| pair[0].label() != pair[1].label())
    }
}

/// Engine that scores feature vectors against a fitted model.
///
/// Holds no mutable state: calls are independent and may run concurrently
/// as long as the scaler and classifier allow it (both ports are
/// `Send + Sync`).
pub struct DecisionEngine<C, S>
where
    C: Classifier,
    S: FeatureScaler,
{
    classifier: Arc<C>,
    scaler: Arc<S>,
    feature_names: Vec<String>,
    config: EngineConfig,
}

impl<C, S> DecisionEngine<C, S>
where
    C: Classifier,
    S: FeatureScaler,
{
    /// Create a new decision engine.
    ///
    /// # Errors
    /// Returns `GlycoriskError::Schema` if `feature_names` is not the
    /// canonical feature list in canonical order, and
    /// `GlycoriskError::Config` if the threshold table is invalid.
    pub fn new(
        classifier: Arc<C>,
        scaler: Arc<S>,
        feature_names: Vec<String>,
        config: EngineConfig,
    ) -> Result<Self> {
        check_feature_names(&feature_names)?;
        config.validate()?;

        tracing::info!(
            "Decision engine ready: thresholds screening={} clinical_visit={} preventive={}, precedence={:?}, validation={:?}",
            config.thresholds.screening,
            config.thresholds.clinical_visit,
            config.thresholds.preventive,
            config.precedence,
            config.validation
        );

        Ok(Self {
            classifier,
            scaler,
            feature_names,
            config,
        })
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Resolve the threshold for a call.
    ///
    /// With the default precedence a recognized context always wins over an
    /// explicit override; the override only applies to unrecognized contexts,
    /// which otherwise get the fallback threshold.
    ///
    /// # Errors
    /// Returns `GlycoriskError::InvalidThreshold` if an override that would
    /// be used is not a finite value in [0, 1]. An ignored override is not
    /// checked.
    pub fn resolve_threshold(
        &self,
        context: &ClinicalContext,
        threshold_override: Option<f64>,
    ) -> Result<f64> {
        let policy = &self.config.thresholds;
        let threshold = match (context.is_recognized(), threshold_override) {
            (true, Some(t)) => match self.config.precedence {
                ThresholdPrecedence::ContextWins => {
                    tracing::debug!(
                        "Ignoring threshold override {} for recognized context {}",
                        t,
                        context
                    );
                    policy.threshold_for(context)
                }
                ThresholdPrecedence::OverrideWins => checked_override(t)?,
            },
            (true, None) => policy.threshold_for(context),
            (false, Some(t)) => checked_override(t)?,
            (false, None) => policy.fallback,
        };

        Ok(threshold)
    }

    /// Score a raw feature vector in canonical order.
    ///
    /// # Errors
    /// - `Schema` if the vector length does not match the feature list
    /// - `Validation` if values are out of range and validation is strict
    /// - `InvalidThreshold` if a used override is not in [0, 1]
    /// - `ModelOutput` if the scaler or classifier breaks its contract
    pub fn score(
        &self,
        features: &[f64],
        context: &ClinicalContext,
        threshold_override: Option<f64>,
    ) -> Result<PredictionResult> {
        self.check_schema(features)?;
        let threshold = self.resolve_threshold(context, threshold_override)?;
        self.check_ranges(features)?;

        let normalized = self.normalize(features)?;
        let probability = self.positive_probability(&normalized)?;

        let result = PredictionResult::new(probability, threshold, context.clone());

        tracing::debug!(
            "Scoring complete: context={}, threshold={:.2}, probability={:.4}, label={}, tier={}, confidence={}",
            context,
            threshold,
            probability,
            result.label(),
            result.risk_tier().as_str(),
            result.confidence()
        );

        Ok(result)
    }

    /// Score a named feature struct.
    ///
    /// # Errors
    /// See [`DecisionEngine::score`].
    pub fn score_patient(
        &self,
        patient: &PatientFeatures,
        context: &ClinicalContext,
        threshold_override: Option<f64>,
    ) -> Result<PredictionResult> {
        self.score(&patient.to_vec(), context, threshold_override)
    }

    /// Score the same vector under screening, clinical visit and preventive
    /// thresholds.
    ///
    /// # Errors
    /// See [`DecisionEngine::score`].
    pub fn compare_contexts(&self, features: &[f64]) -> Result<ContextComparison> {
        let results = ClinicalContext::RECOGNIZED
            .iter()
            .map(|context| self.score(features, context, None))
            .collect::<Result<Vec<_>>>()?;
        Ok(ContextComparison { results })
    }

    /// Score independent requests in parallel.
    ///
    /// Returns one result per request, in input order. A failing request does
    /// not affect the others.
    pub fn score_batch(&self, requests: &[ScoringRequest]) -> Vec<Result<PredictionResult>> {
        let results: Vec<Result<PredictionResult>> = requests
            .par_iter()
            .map(|r| self.score(&r.features, &r.context, r.threshold_override))
            .collect();

        let failed = results.iter().filter(|r| r.is_err()).count();
        tracing::info!(
            "Batch scored: {} requests, {} failed",
            requests.len(),
            failed
        );

        results
    }

    fn check_schema(&self, features: &[f64]) -> Result<()> {
        if features.len() != self.feature_names.len() {
            return Err(GlycoriskError::Schema(format!(
                "Feature vector has {} values, model expects {} ({})",
                features.len(),
                self.feature_names.len(),
                self.feature_names.join(", ")
            )));
        }
        Ok(())
    }

    fn check_ranges(&self, features: &[f64]) -> Result<()> {
        if self.config.validation == ValidationMode::Off {
            return Ok(());
        }

        let patient = PatientFeatures::from_vec(features)?;
        match (patient.validate(), self.config.validation) {
            (Ok(()), _) => Ok(()),
            (Err(errors), ValidationMode::Warn) => {
                tracing::warn!(
                    "Scoring out-of-range input ({} issues): {}",
                    errors.len(),
                    errors.join("; ")
                );
                Ok(())
            }
            (Err(errors), _) => Err(GlycoriskError::Validation(errors)),
        }
    }

    fn normalize(&self, features: &[f64]) -> Result<Matrix> {
        let n = self.feature_names.len();
        let normalized = self.scaler.transform(&[features.to_vec()])?;

        if normalized.len() != 1 || normalized[0].len() != n {
            return Err(ModelError::Shape {
                stage: "scaler",
                expected_rows: 1,
                expected_cols: n,
                actual: ModelError::describe_shape(&normalized),
            }
            .into());
        }
        if let Some(column) = normalized[0].iter().position(|v| !v.is_finite()) {
            return Err(ModelError::NonFinite {
                stage: "scaler",
                column,
            }
            .into());
        }

        Ok(normalized)
    }

    fn positive_probability(&self, normalized: &[Vec<f64>]) -> Result<f64> {
        let proba = self.classifier.predict_proba(normalized)?;

        if proba.len() != 1 || proba[0].len() != 2 {
            return Err(ModelError::Shape {
                stage: "classifier",
                expected_rows: 1,
                expected_cols: 2,
                actual: ModelError::describe_shape(&proba),
            }
            .into());
        }

        let probability = proba[0][1];
        if !probability.is_finite() {
            return Err(ModelError::NonFinite {
                stage: "classifier",
                column: 1,
            }
            .into());
        }
        if !is_probability(probability) {
            return Err(ModelError::ProbabilityOutOfRange(probability).into());
        }

        Ok(probability)
    }
}

fn check_feature_names(feature_names: &[String]) -> Result<()> {
    if feature_names.len() != FEATURE_NAMES.len() {
        return Err(GlycoriskError::Schema(format!(
            "Model provides {} feature names, expected {}",
            feature_names.len(),
            FEATURE_NAMES.len()
        )));
    }

    if let Some((i, (got, want))) = feature_names
        .iter()
        .zip(FEATURE_NAMES.iter())
        .enumerate()
        .find(|(_, (got, want))| got.as_str() != **want)
    {
        return Err(GlycoriskError::Schema(format!(
            "Feature {i} is {got:?}, expected {want:?}"
        )));
    }

    Ok(())
}

fn checked_override(threshold: f64) -> Result<f64> {
    if is_probability(threshold) {
        Ok(threshold)
    } else {
        Err(GlycoriskError::InvalidThreshold(threshold))
    }
}
