//! Patient feature vector for diabetes risk prediction.
//!
//! Eight clinical measurements in the column order the classifier was
//! fitted on.

use serde::{Deserialize, Serialize};

use crate::GlycoriskError;

/// Number of features the engine expects.
pub const FEATURE_COUNT: usize = 8;

/// Canonical feature names, in column order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "gestation_count",
    "fasting_glucose",
    "diastolic_bp",
    "skinfold_thickness",
    "serum_insulin",
    "body_mass_index",
    "genetic_risk_score",
    "age",
];

/// Clinical features for one patient.
///
/// A zero in a measurement column means "not measured" in the reference
/// dataset, so zeros pass validation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct PatientFeatures {
    /// Number of pregnancies (non-negative integer)
    pub gestation_count: f64,

    /// Fasting plasma glucose in mg/dL
    pub fasting_glucose: f64,

    /// Diastolic blood pressure in mmHg
    pub diastolic_bp: f64,

    /// Triceps skinfold thickness in mm
    pub skinfold_thickness: f64,

    /// 2-hour serum insulin in mu U/ml
    pub serum_insulin: f64,

    /// Body mass index in kg/m²
    pub body_mass_index: f64,

    /// Family-history genetic risk score (nominal 0.1-2.5)
    pub genetic_risk_score: f64,

    /// Age in years (non-negative integer)
    pub age: f64,
}

impl PatientFeatures {
    /// Convert features to a vector in canonical order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<f64> {
        vec![
            self.gestation_count,
            self.fasting_glucose,
            self.diastolic_bp,
            self.skinfold_thickness,
            self.serum_insulin,
            self.body_mass_index,
            self.genetic_risk_score,
            self.age,
        ]
    }

    /// Create features from a vector in canonical order.
    ///
    /// # Errors
    /// Returns `GlycoriskError::Schema` if the vector length is not 8.
    pub fn from_vec(v: &[f64]) -> Result<Self, GlycoriskError> {
        if v.len() != FEATURE_COUNT {
            return Err(GlycoriskError::Schema(format!(
                "Expected {FEATURE_COUNT} features, got {}",
                v.len()
            )));
        }

        Ok(Self {
            gestation_count: v[0],
            fasting_glucose: v[1],
            diastolic_bp: v[2],
            skinfold_thickness: v[3],
            serum_insulin: v[4],
            body_mass_index: v[5],
            genetic_risk_score: v[6],
            age: v[7],
        })
    }

    /// Validate that all features are finite and within plausible ranges.
    ///
    /// # Errors
    /// Returns validation errors as a vector of strings.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        check_range(&mut errors, "Gestation count", self.gestation_count, 0.0, 20.0);
        check_integer(&mut errors, "Gestation count", self.gestation_count);
        check_range(&mut errors, "Fasting glucose", self.fasting_glucose, 0.0, 500.0);
        check_range(&mut errors, "Diastolic BP", self.diastolic_bp, 0.0, 200.0);
        check_range(
            &mut errors,
            "Skinfold thickness",
            self.skinfold_thickness,
            0.0,
            120.0,
        );
        check_range(&mut errors, "Serum insulin", self.serum_insulin, 0.0, 1000.0);
        check_range(&mut errors, "Body mass index", self.body_mass_index, 0.0, 80.0);
        check_range(
            &mut errors,
            "Genetic risk score",
            self.genetic_risk_score,
            0.0,
            3.0,
        );
        check_range(&mut errors, "Age", self.age, 0.0, 120.0);
        check_integer(&mut errors, "Age", self.age);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn check_range(errors: &mut Vec<String>, name: &str, value: f64, min: f64, max: f64) {
    if !value.is_finite() {
        errors.push(format!("{name} must be a finite number, got {value}"));
    } else if !(min..=max).contains(&value) {
        errors.push(format!("{name} {value} out of range [{min}, {max}]"));
    }
}

fn check_integer(errors: &mut Vec<String>, name: &str, value: f64) {
    if value.is_finite() && value.fract() != 0.0 {
        errors.push(format!("{name} {value} must be a whole number"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PatientFeatures {
        PatientFeatures {
            gestation_count: 2.0,
            fasting_glucose: 110.0,
            diastolic_bp: 75.0,
            skinfold_thickness: 25.0,
            serum_insulin: 100.0,
            body_mass_index: 28.5,
            genetic_risk_score: 0.4,
            age: 35.0,
        }
    }

    #[test]
    fn test_features_to_vec() {
        let vec = sample().to_vec();
        assert_eq!(vec.len(), FEATURE_COUNT);
        assert_eq!(vec, vec![2.0, 110.0, 75.0, 25.0, 100.0, 28.5, 0.4, 35.0]);
    }

    #[test]
    fn test_features_from_vec() {
        let v = [4.0, 160.0, 85.0, 30.0, 150.0, 35.0, 0.8, 45.0];
        let features = PatientFeatures::from_vec(&v).expect("Should parse");
        assert_eq!(features.fasting_glucose, 160.0);
        assert_eq!(features.age, 45.0);
    }

    #[test]
    fn test_from_vec_wrong_length() {
        let short = [2.0, 110.0, 75.0, 25.0, 100.0, 28.5, 0.4];
        let err = PatientFeatures::from_vec(&short).unwrap_err();
        assert!(matches!(err, GlycoriskError::Schema(_)));
    }

    #[test]
    fn test_validation() {
        assert!(sample().validate().is_ok());
        // Unmeasured columns are encoded as zero.
        assert!(PatientFeatures::default().validate().is_ok());

        let invalid = PatientFeatures {
            gestation_count: -1.0,
            age: 35.5,
            genetic_risk_score: f64::NAN,
            ..sample()
        };
        let errors = invalid.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_feature_names_are_unique() {
        let mut names = FEATURE_NAMES.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), FEATURE_COUNT);
    }
}
