//! Predefined patients used by the demonstration screens.

use crate::domain::ClinicalContext;

/// A demonstration patient with the context it is scored in.
#[derive(Debug, Clone)]
pub struct ClinicalCase {
    pub name: &'static str,
    pub description: &'static str,
    pub features: [f64; 8],
    pub context: ClinicalContext,
}

/// Four patients spanning the risk range.
pub const CLINICAL_CASES: [ClinicalCase; 4] = [
    ClinicalCase {
        name: "Patient A - Low risk",
        description: "Young, no pregnancies, normal glucose, normal BMI",
        features: [0.0, 85.0, 65.0, 20.0, 80.0, 22.0, 0.2, 25.0],
        context: ClinicalContext::ClinicalVisit,
    },
    ClinicalCase {
        name: "Patient B - Moderate risk",
        description: "Adult, prediabetic glucose, overweight, some risk factors",
        features: [2.0, 110.0, 75.0, 25.0, 100.0, 28.5, 0.4, 35.0],
        context: ClinicalContext::ClinicalVisit,
    },
    ClinicalCase {
        name: "Patient C - High risk",
        description: "Several pregnancies, hyperglycemia, obesity",
        features: [4.0, 160.0, 85.0, 30.0, 150.0, 35.0, 0.8, 45.0],
        context: ClinicalContext::Screening,
    },
    ClinicalCase {
        name: "Patient D - Older adult with risk factors",
        description: "Older adult, several pregnancies, family history",
        features: [6.0, 140.0, 90.0, 35.0, 200.0, 32.0, 1.2, 65.0],
        context: ClinicalContext::Preventive,
    },
];

/// Index into [`CLINICAL_CASES`] of the case shown as a full report.
pub const DETAILED_CASE: usize = 1;

/// Borderline patient for the threshold comparison screen.
pub const BORDERLINE_PATIENT: [f64; 8] = [2.0, 125.0, 80.0, 28.0, 120.0, 29.0, 0.5, 40.0];
