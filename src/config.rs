//! Engine configuration.
//!
//! Thresholds, override precedence and input validation are carried in an
//! explicit [`EngineConfig`] handed to the engine at construction. It can be
//! read from a JSON file, from `GLYCORISK_*` environment variables, or both
//! (file first, variables on top).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{ThresholdPolicy, ThresholdPrecedence};
use crate::{GlycoriskError, Result};

/// Path to a JSON config file applied before individual variables.
pub const CONFIG_FILE_ENV: &str = "GLYCORISK_CONFIG";
pub const SCREENING_ENV: &str = "GLYCORISK_THRESHOLD_SCREENING";
pub const CLINICAL_VISIT_ENV: &str = "GLYCORISK_THRESHOLD_CLINICAL_VISIT";
pub const PREVENTIVE_ENV: &str = "GLYCORISK_THRESHOLD_PREVENTIVE";
pub const FALLBACK_ENV: &str = "GLYCORISK_THRESHOLD_FALLBACK";
pub const PRECEDENCE_ENV: &str = "GLYCORISK_THRESHOLD_PRECEDENCE";
pub const VALIDATION_ENV: &str = "GLYCORISK_VALIDATION";

/// What the engine does with raw values outside their plausible range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Reject the call with `GlycoriskError::Validation`.
    #[default]
    Strict,
    /// Log a warning and score anyway.
    Warn,
    /// Skip range checks.
    Off,
}

impl std::str::FromStr for ValidationMode {
    type Err = GlycoriskError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "warn" => Ok(Self::Warn),
            "off" => Ok(Self::Off),
            other => Err(GlycoriskError::Config(format!(
                "Unknown validation mode {other:?} (expected strict, warn or off)"
            ))),
        }
    }
}

/// Configuration of a [`crate::DecisionEngine`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Threshold table
    pub thresholds: ThresholdPolicy,

    /// Whether a recognized context or an explicit override wins
    pub precedence: ThresholdPrecedence,

    /// Raw input range checking
    pub validation: ValidationMode,
}

impl EngineConfig {
    /// Check the threshold table.
    ///
    /// # Errors
    /// Returns `GlycoriskError::Config` listing every problem found.
    pub fn validate(&self) -> Result<()> {
        self.thresholds
            .validate()
            .map_err(|errors| GlycoriskError::Config(errors.join("; ")))
    }

    /// Load configuration from a JSON file. Missing fields keep their
    /// defaults.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed, or the result does
    /// not validate.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        tracing::debug!("Loaded engine config from {:?}", path);
        Ok(config)
    }

    /// Load configuration from the process environment.
    ///
    /// # Errors
    /// See [`EngineConfig::from_lookup`].
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    /// Returns `GlycoriskError::Config` if a variable cannot be parsed or the
    /// resulting table does not validate.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(CONFIG_FILE_ENV) {
            Some(path) if !path.trim().is_empty() => Self::from_file(Path::new(path.trim()))?,
            _ => Self::default(),
        };

        let thresholds = &mut config.thresholds;
        for (key, slot) in [
            (SCREENING_ENV, &mut thresholds.screening),
            (CLINICAL_VISIT_ENV, &mut thresholds.clinical_visit),
            (PREVENTIVE_ENV, &mut thresholds.preventive),
            (FALLBACK_ENV, &mut thresholds.fallback),
        ] {
            if let Some(raw) = lookup(key) {
                *slot = raw.trim().parse::<f64>().map_err(|e| {
                    GlycoriskError::Config(format!("{key}={raw:?} is not a number: {e}"))
                })?;
            }
        }

        if let Some(raw) = lookup(PRECEDENCE_ENV) {
            config.precedence = match raw.trim().to_ascii_lowercase().as_str() {
                "context" | "context_wins" => ThresholdPrecedence::ContextWins,
                "override" | "override_wins" => ThresholdPrecedence::OverrideWins,
                other => {
                    return Err(GlycoriskError::Config(format!(
                        "{PRECEDENCE_ENV}={other:?} (expected context or override)"
                    )))
                }
            };
        }

        if let Some(raw) = lookup(VALIDATION_ENV) {
            config.validation = raw.parse()?;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Interpret a boolean-ish environment value.
#[must_use]
pub fn parse_bool(value: &str) -> bool {
    matches!(value.trim(), "1" | "true" | "TRUE" | "yes" | "YES")
}
