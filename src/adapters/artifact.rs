//! Model artifact adapter: loads a fitted scaler + classifier from JSON.
//!
//! # Layout
//!
//! A model directory contains `model.json` and, optionally, `manifest.json`
//! binding file names to SHA-256 digests:
//!
//! ```json
//! { "files": { "model.json": "<sha256 hex>" } }
//! ```
//!
//! When a manifest is present every file it lists must hash to the recorded
//! digest. Loading can be told to require a manifest.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::linear::{LogisticRegression, StandardScaler};

const MODEL_FILE: &str = "model.json";
const MANIFEST_FILE: &str = "manifest.json";

/// Errors raised while loading a model artifact.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Model artifact not found: {0:?}")]
    NotFound(PathBuf),

    #[error("Failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Manifest required but missing at {0:?}")]
    ManifestMissing(PathBuf),

    #[error("Manifest does not bind the model file")]
    ManifestIncomplete,

    #[error("File hash mismatch for {0}")]
    HashMismatch(String),

    #[error("Inconsistent model parameters: {0}")]
    Inconsistent(String),
}

/// Fitted model as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Column order the model was fitted on
    pub feature_names: Vec<String>,

    pub scaler: StandardScaler,

    pub classifier: LogisticRegression,

    /// Free-form description shown in the front end
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct Manifest {
    files: BTreeMap<String, String>,
}

impl ModelArtifact {
    /// Load an artifact from a model directory or directly from its
    /// `model.json`.
    ///
    /// # Errors
    /// Returns error if the files cannot be read or parsed, the manifest does
    /// not match, or the parameters are inconsistent.
    pub fn load(path: &Path, require_manifest: bool) -> Result<Self, ArtifactError> {
        let (base_dir, model_path) = if path.is_dir() {
            (path.to_path_buf(), path.join(MODEL_FILE))
        } else {
            let parent = path.parent().unwrap_or_else(|| Path::new("."));
            (parent.to_path_buf(), path.to_path_buf())
        };

        if !model_path.exists() {
            return Err(ArtifactError::NotFound(model_path));
        }

        let manifest_path = base_dir.join(MANIFEST_FILE);
        if manifest_path.exists() {
            verify_manifest(&base_dir, &manifest_path, &model_path)?;
        } else if require_manifest {
            return Err(ArtifactError::ManifestMissing(manifest_path));
        } else {
            tracing::warn!("Loading model without integrity manifest from {:?}", model_path);
        }

        let bytes = read(&model_path)?;
        let artifact: Self = serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Parse {
            path: model_path.clone(),
            source,
        })?;
        artifact.check_consistency()?;

        tracing::info!(
            "Loaded model from {:?} (n_features={})",
            model_path,
            artifact.feature_names.len()
        );

        Ok(artifact)
    }

    /// Check that every parameter vector has one entry per feature.
    ///
    /// # Errors
    /// Returns `ArtifactError::Inconsistent` describing the first mismatch.
    pub fn check_consistency(&self) -> Result<(), ArtifactError> {
        let n = self.feature_names.len();
        if n == 0 {
            return Err(ArtifactError::Inconsistent("no features".into()));
        }

        for (name, len) in [
            ("scaler.mean", self.scaler.mean.len()),
            ("scaler.scale", self.scaler.scale.len()),
            ("classifier.coefficients", self.classifier.coefficients.len()),
        ] {
            if len != n {
                return Err(ArtifactError::Inconsistent(format!(
                    "{name} has {len} entries, expected {n}"
                )));
            }
        }

        let all_finite = self
            .scaler
            .mean
            .iter()
            .chain(&self.scaler.scale)
            .chain(&self.classifier.coefficients)
            .chain(std::iter::once(&self.classifier.intercept))
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(ArtifactError::Inconsistent(
                "non-finite parameter value".into(),
            ));
        }

        Ok(())
    }

    /// Split into the shared parts the engine consumes.
    #[must_use]
    pub fn into_parts(self) -> (LogisticRegression, StandardScaler, Vec<String>) {
        (self.classifier, self.scaler, self.feature_names)
    }
}

fn read(path: &Path) -> Result<Vec<u8>, ArtifactError> {
    std::fs::read(path).map_err(|source| ArtifactError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

fn verify_manifest(
    base_dir: &Path,
    manifest_path: &Path,
    model_path: &Path,
) -> Result<(), ArtifactError> {
    let content = read(manifest_path)?;
    let manifest: Manifest =
        serde_json::from_slice(&content).map_err(|source| ArtifactError::Parse {
            path: manifest_path.to_path_buf(),
            source,
        })?;

    let model_name = model_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| MODEL_FILE.to_string());
    if !manifest.files.contains_key(&model_name) {
        return Err(ArtifactError::ManifestIncomplete);
    }

    for (rel, expected_hex) in &manifest.files {
        let actual_hex = sha256_hex(&read(&base_dir.join(rel))?);
        if !constant_time_eq_str(&actual_hex, &expected_hex.to_ascii_lowercase()) {
            return Err(ArtifactError::HashMismatch(rel.clone()));
        }
    }

    tracing::debug!("Manifest verified ({} files)", manifest.files.len());
    Ok(())
}

// Constant-time compare for ASCII strings (used for SHA-256 hex digests).
fn constant_time_eq_str(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff: u8 = 0;
    for (x, y) in a.as_bytes().iter().zip(b.as_bytes().iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
