//! Prediction result types.
//!
//! Represents the decision produced for one scoring call: the binary label
//! from the context threshold, plus a risk tier and confidence derived from
//! the probability alone.

use serde::Serialize;

use super::ClinicalContext;

/// Binary decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    /// Probability at or above the threshold
    Positive,
    /// Probability below the threshold
    Negative,
}

impl Label {
    /// Label for a probability against a threshold. Equality is positive.
    #[must_use]
    pub fn from_threshold(probability: f64, threshold: f64) -> Self {
        if probability >= threshold {
            Self::Positive
        } else {
            Self::Negative
        }
    }

    #[must_use]
    pub fn is_positive(&self) -> bool {
        matches!(self, Self::Positive)
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Positive => write!(f, "DIABETES"),
            Self::Negative => write!(f, "NO DIABETES"),
        }
    }
}

/// Risk tier, ordered from lowest to highest.
///
/// A step function of probability with inclusive lower edges. It does not
/// depend on the decision threshold, so a positive label can sit in a
/// moderate tier under an aggressive (screening) threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskTier {
    /// [0.0, 0.2)
    VeryLow,
    /// [0.2, 0.4)
    Low,
    /// [0.4, 0.6)
    Moderate,
    /// [0.6, 0.8)
    High,
    /// [0.8, 1.0]
    VeryHigh,
}

impl RiskTier {
    /// Classify a probability.
    #[must_use]
    pub fn from_probability(probability: f64) -> Self {
        if probability >= 0.8 {
            Self::VeryHigh
        } else if probability >= 0.6 {
            Self::High
        } else if probability >= 0.4 {
            Self::Moderate
        } else if probability >= 0.2 {
            Self::Low
        } else {
            Self::VeryLow
        }
    }

    /// Get a human-readable description.
    #[must_use]
    pub fn narrative(&self) -> &'static str {
        match self {
            Self::VeryHigh => "Strong indication of diabetes - urgent work-up",
            Self::High => "Elevated risk - confirmatory testing recommended",
            Self::Moderate => "Moderate risk - regular monitoring",
            Self::Low => "Low risk - lifestyle prevention",
            Self::VeryLow => "Very low risk - maintain healthy habits",
        }
    }

    /// Stable tag ("very-high").
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VeryHigh => "very-high",
            Self::High => "high",
            Self::Moderate => "moderate",
            Self::Low => "low",
            Self::VeryLow => "very-low",
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::VeryHigh => write!(f, "VERY HIGH"),
            Self::High => write!(f, "HIGH"),
            Self::Moderate => write!(f, "MODERATE"),
            Self::Low => write!(f, "LOW"),
            Self::VeryLow => write!(f, "VERY LOW"),
        }
    }
}

/// How far the probability sits from the 0.5 midpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    /// `|p - 0.5| > 0.3`
    High,
    /// Everything else
    Moderate,
}

impl Confidence {
    #[must_use]
    pub fn from_probability(probability: f64) -> Self {
        if (probability - 0.5).abs() > 0.3 {
            Self::High
        } else {
            Self::Moderate
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "High"),
            Self::Moderate => write!(f, "Moderate"),
        }
    }
}

/// Outcome of one scoring call.
///
/// Built once from its inputs and never mutated; fields are read through
/// accessors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    label: Label,
    probability: f64,
    risk_tier: RiskTier,
    risk_narrative: &'static str,
    threshold_used: f64,
    context: ClinicalContext,
    confidence: Confidence,
}

impl PredictionResult {
    /// Derive the full decision from a positive-class probability and the
    /// resolved threshold.
    ///
    /// Callers are expected to pass a probability already checked to lie in
    /// [0, 1].
    #[must_use]
    pub fn new(probability: f64, threshold_used: f64, context: ClinicalContext) -> Self {
        let risk_tier = RiskTier::from_probability(probability);
        Self {
            label: Label::from_threshold(probability, threshold_used),
            probability,
            risk_tier,
            risk_narrative: risk_tier.narrative(),
            threshold_used,
            context,
            confidence: Confidence::from_probability(probability),
        }
    }

    #[must_use]
    pub fn label(&self) -> Label {
        self.label
    }

    #[must_use]
    pub fn probability(&self) -> f64 {
        self.probability
    }

    #[must_use]
    pub fn risk_tier(&self) -> RiskTier {
        self.risk_tier
    }

    #[must_use]
    pub fn risk_narrative(&self) -> &'static str {
        self.risk_narrative
    }

    #[must_use]
    pub fn threshold_used(&self) -> f64 {
        self.threshold_used
    }

    #[must_use]
    pub fn context(&self) -> &ClinicalContext {
        &self.context
    }

    #[must_use]
    pub fn confidence(&self) -> Confidence {
        self.confidence
    }
}
