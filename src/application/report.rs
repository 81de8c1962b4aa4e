//! Plain-text rendering of prediction results.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};

use super::decision::ContextComparison;
use crate::domain::{PatientFeatures, PredictionResult};

const RULE_WIDTH: usize = 70;

const URGENT_WORKUP: &[&str] = &[
    "Urgent complementary diagnostic work-up",
    "Oral glucose tolerance test (OGTT)",
    "Glycated hemoglobin (HbA1c)",
    "Endocrinology follow-up",
];

const MONITORING: &[&str] = &[
    "Regular blood glucose monitoring",
    "Re-evaluation in 6 months",
    "Nutritional counselling",
    "Regular physical activity",
];

const HEALTHY_LIFESTYLE: &[&str] = &[
    "Keep a healthy lifestyle",
    "Annual routine check-up",
    "Primary prevention",
];

/// Display labels for the patient table, in canonical feature order.
const FEATURE_LABELS: [&str; 8] = [
    "Pregnancies",
    "Glucose (mg/dL)",
    "Diastolic BP (mmHg)",
    "Skinfold (mm)",
    "Insulin (mu U/ml)",
    "BMI (kg/m²)",
    "Genetic risk score",
    "Age (years)",
];

/// Follow-up recommendations for a probability.
#[must_use]
pub fn recommendations(probability: f64) -> &'static [&'static str] {
    if probability >= 0.6 {
        URGENT_WORKUP
    } else if probability >= 0.4 {
        MONITORING
    } else {
        HEALTHY_LIFESTYLE
    }
}

/// Render a full report stamped with the current time.
#[must_use]
pub fn render_report(patient: &PatientFeatures, result: &PredictionResult) -> String {
    render_report_at(patient, result, Utc::now())
}

/// Render a full report with an explicit timestamp.
#[must_use]
pub fn render_report_at(
    patient: &PatientFeatures,
    result: &PredictionResult,
    generated_at: DateTime<Utc>,
) -> String {
    let mut out = String::new();
    let rule = "=".repeat(RULE_WIDTH);

    // Writing into a String cannot fail.
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "DIABETES RISK REPORT");
    let _ = writeln!(out, "Generated: {}", generated_at.format("%Y-%m-%d %H:%M UTC"));
    let _ = writeln!(out, "{rule}");

    let _ = writeln!(out, "\nPATIENT DATA:");
    for (label, value) in FEATURE_LABELS.iter().zip(patient.to_vec()) {
        let _ = writeln!(out, "   {label:<20}: {value}");
    }

    let _ = writeln!(out, "\nRESULT:");
    let _ = writeln!(out, "   Prediction         : {}", result.label());
    let _ = writeln!(
        out,
        "   Probability        : {:.1}%",
        result.probability() * 100.0
    );
    let _ = writeln!(out, "   Risk tier          : {}", result.risk_tier());
    let _ = writeln!(out, "   Clinical context   : {}", result.context().title());
    let _ = writeln!(out, "   Threshold used     : {:.2}", result.threshold_used());
    let _ = writeln!(out, "   Confidence         : {}", result.confidence());

    let _ = writeln!(out, "\nINTERPRETATION:");
    let _ = writeln!(out, "   {}", result.risk_narrative());

    let _ = writeln!(out, "\nRECOMMENDATIONS:");
    for item in recommendations(result.probability()) {
        let _ = writeln!(out, "   - {item}");
    }

    let _ = writeln!(out, "\n{rule}");
    out
}

/// One-line summary: `DIABETES (83.0%) - VERY HIGH`.
#[must_use]
pub fn render_summary(result: &PredictionResult) -> String {
    format!(
        "{} ({:.1}%) - {}",
        result.label(),
        result.probability() * 100.0,
        result.risk_tier()
    )
}

/// Table of the same patient under every context.
#[must_use]
pub fn render_comparison(comparison: &ContextComparison) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{:<20} {:<10} {:<12} {:<12}",
        "Context", "Threshold", "Prediction", "Probability"
    );
    let _ = writeln!(out, "{}", "-".repeat(60));
    for result in comparison.results() {
        let _ = writeln!(
            out,
            "{:<20} {:<10.2} {:<12} {:<12}",
            result.context().title(),
            result.threshold_used(),
            result.label().to_string(),
            format!("{:.1}%", result.probability() * 100.0)
        );
    }

    if let Some(p) = comparison.probability() {
        let _ = writeln!(
            out,
            "\nSame probability ({:.1}%) in every context; the threshold decides the label.",
            p * 100.0
        );
    }
    if comparison.labels_diverge() {
        let _ = writeln!(
            out,
            "Screening is the most sensitive context, preventive the most specific."
        );
    }

    out
}
