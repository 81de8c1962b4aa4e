//! Threshold policy: maps a clinical context to a decision threshold.

use serde::{Deserialize, Serialize};

use super::ClinicalContext;

/// Which threshold wins when a caller passes an explicit override for a
/// recognized context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdPrecedence {
    /// The context threshold wins; explicit overrides only apply to
    /// unrecognized contexts.
    #[default]
    #[serde(alias = "context")]
    ContextWins,
    /// An explicit override always wins.
    #[serde(alias = "override")]
    OverrideWins,
}

/// Decision thresholds per clinical context.
///
/// Values increase from most sensitive to most specific: a lower threshold
/// flags more positives (recall), a higher one fewer (precision).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdPolicy {
    /// Population screening
    pub screening: f64,
    /// Routine clinical visit; also used for unrecognized contexts
    pub clinical_visit: f64,
    /// Preventive medicine
    pub preventive: f64,
    /// Used by the engine when the context is unrecognized and no override
    /// is supplied
    pub fallback: f64,
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        Self {
            screening: 0.35,
            clinical_visit: 0.45,
            preventive: 0.60,
            fallback: 0.45,
        }
    }
}

impl ThresholdPolicy {
    /// Threshold for a context. Unrecognized contexts get the clinical visit
    /// threshold.
    #[must_use]
    pub fn threshold_for(&self, context: &ClinicalContext) -> f64 {
        match context {
            ClinicalContext::Screening => self.screening,
            ClinicalContext::ClinicalVisit => self.clinical_visit,
            ClinicalContext::Preventive => self.preventive,
            ClinicalContext::Other(_) => self.clinical_visit,
        }
    }

    /// Check that every threshold lies in [0, 1] and that the table is
    /// monotone (screening <= clinical visit <= preventive).
    ///
    /// # Errors
    /// Returns validation errors as a vector of strings.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        for (name, value) in [
            ("screening", self.screening),
            ("clinical_visit", self.clinical_visit),
            ("preventive", self.preventive),
            ("fallback", self.fallback),
        ] {
            if !is_probability(value) {
                errors.push(format!("Threshold {name}={value} out of range [0, 1]"));
            }
        }

        if self.screening > self.clinical_visit || self.clinical_visit > self.preventive {
            errors.push(format!(
                "Thresholds must be non-decreasing: screening={} clinical_visit={} preventive={}",
                self.screening, self.clinical_visit, self.preventive
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Finite and inside [0, 1].
pub(crate) fn is_probability(value: f64) -> bool {
    value.is_finite() && (0.0..=1.0).contains(&value)
}
