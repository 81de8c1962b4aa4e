//! End-to-end scoring through the public API.

use std::path::Path;
use std::sync::Arc;

use glycorisk::adapters::{LogisticRegression, ModelArtifact, StandardScaler};
use glycorisk::application::ScoringRequest;
use glycorisk::config::ValidationMode;
use glycorisk::console::{BORDERLINE_PATIENT, CLINICAL_CASES};
use glycorisk::domain::ThresholdPrecedence;
use glycorisk::ports::{Classifier, FeatureScaler, Matrix, ModelError};
use glycorisk::{
    ClinicalContext, Confidence, DecisionEngine, EngineConfig, GlycoriskError, Label, RiskTier,
};

fn reference_engine(config: EngineConfig) -> DecisionEngine<LogisticRegression, StandardScaler> {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("models");
    let artifact = ModelArtifact::load(&dir, true).expect("reference model");
    let (classifier, scaler, names) = artifact.into_parts();
    DecisionEngine::new(Arc::new(classifier), Arc::new(scaler), names, config).expect("engine")
}

struct Fixed(f64);

impl Classifier for Fixed {
    fn predict_proba(&self, rows: &[Vec<f64>]) -> Result<Matrix, ModelError> {
        Ok(rows.iter().map(|_| vec![1.0 - self.0, self.0]).collect())
    }
}

struct Identity;

impl FeatureScaler for Identity {
    fn transform(&self, rows: &[Vec<f64>]) -> Result<Matrix, ModelError> {
        Ok(rows.to_vec())
    }
}

fn fixed_engine(p: f64) -> DecisionEngine<Fixed, Identity> {
    let names = glycorisk::domain::FEATURE_NAMES
        .iter()
        .map(|s| s.to_string())
        .collect();
    DecisionEngine::new(
        Arc::new(Fixed(p)),
        Arc::new(Identity),
        names,
        EngineConfig::default(),
    )
    .expect("engine")
}

#[test]
fn reference_model_orders_the_demo_cases() {
    let engine = reference_engine(EngineConfig::default());

    let probabilities: Vec<f64> = CLINICAL_CASES
        .iter()
        .map(|case| {
            engine
                .score(&case.features, &case.context, None)
                .expect("score")
                .probability()
        })
        .collect();

    // Low-risk patient scores lowest, hyperglycemic patient highest.
    assert!(probabilities[0] < probabilities[1]);
    assert!(probabilities[1] < probabilities[2]);

    let low = engine
        .score(&CLINICAL_CASES[0].features, &CLINICAL_CASES[0].context, None)
        .expect("score");
    assert_eq!(low.label(), Label::Negative);
    assert_eq!(low.risk_tier(), RiskTier::VeryLow);
    assert_eq!(low.confidence(), Confidence::High);

    let high = engine
        .score(&CLINICAL_CASES[2].features, &CLINICAL_CASES[2].context, None)
        .expect("score");
    assert_eq!(high.label(), Label::Positive);
    assert_eq!(high.threshold_used(), 0.35);
}

#[test]
fn borderline_patient_depends_on_context() {
    let engine = reference_engine(EngineConfig::default());
    let comparison = engine.compare_contexts(&BORDERLINE_PATIENT).expect("compare");

    let labels: Vec<Label> = comparison.results().iter().map(|r| r.label()).collect();
    assert_eq!(
        labels,
        vec![Label::Positive, Label::Positive, Label::Negative]
    );
    assert!(comparison.labels_diverge());
    assert!(comparison.probability().is_some());
}

#[test]
fn threshold_precedence() {
    let engine = fixed_engine(0.5);
    let features = BORDERLINE_PATIENT.to_vec();

    let recognized = engine
        .score(&features, &ClinicalContext::Preventive, Some(0.3))
        .expect("score");
    assert_eq!(recognized.threshold_used(), 0.60);
    assert_eq!(recognized.label(), Label::Negative);

    let unknown = ClinicalContext::parse("emergency");
    let overridden = engine.score(&features, &unknown, Some(0.3)).expect("score");
    assert_eq!(overridden.threshold_used(), 0.3);
    assert_eq!(overridden.label(), Label::Positive);

    let fallback = engine.score(&features, &unknown, None).expect("score");
    assert_eq!(fallback.threshold_used(), 0.45);

    let config = EngineConfig {
        precedence: ThresholdPrecedence::OverrideWins,
        ..EngineConfig::default()
    };
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("models");
    let (classifier, scaler, names) = ModelArtifact::load(&dir, false)
        .expect("reference model")
        .into_parts();
    let engine = DecisionEngine::new(Arc::new(classifier), Arc::new(scaler), names, config)
        .expect("engine");
    let result = engine
        .score(&features, &ClinicalContext::Preventive, Some(0.3))
        .expect("score");
    assert_eq!(result.threshold_used(), 0.3);
}

#[test]
fn invalid_inputs_are_rejected() {
    let engine = fixed_engine(0.5);

    assert!(matches!(
        engine.score(&[1.0; 7], &ClinicalContext::Screening, None),
        Err(GlycoriskError::Schema(_))
    ));
    assert!(matches!(
        engine.score(&BORDERLINE_PATIENT, &ClinicalContext::parse("triage"), Some(1.5)),
        Err(GlycoriskError::InvalidThreshold(_))
    ));
    assert!(matches!(
        engine.score(&[1.0; 7], &ClinicalContext::parse("triage"), Some(2.0)),
        Err(GlycoriskError::Schema(_))
    ));

    // A recognized context ignores the override, valid or not.
    let ignored = engine
        .score(&BORDERLINE_PATIENT, &ClinicalContext::Screening, Some(1.5))
        .expect("context threshold applies");
    assert_eq!(ignored.threshold_used(), 0.35);

    let mut out_of_range = BORDERLINE_PATIENT;
    out_of_range[1] = 900.0;
    assert!(matches!(
        engine.score(&out_of_range, &ClinicalContext::Screening, None),
        Err(GlycoriskError::Validation(_))
    ));

    let lenient = EngineConfig {
        validation: ValidationMode::Warn,
        ..EngineConfig::default()
    };
    let engine = reference_engine(lenient);
    assert!(engine
        .score(&out_of_range, &ClinicalContext::Screening, None)
        .is_ok());
}

#[test]
fn batch_keeps_order_and_isolates_failures() {
    let engine = fixed_engine(0.4);
    let requests = vec![
        ScoringRequest::new(BORDERLINE_PATIENT.to_vec(), ClinicalContext::Screening),
        ScoringRequest::new(vec![1.0; 3], ClinicalContext::Screening),
        ScoringRequest::new(BORDERLINE_PATIENT.to_vec(), ClinicalContext::Preventive),
    ];

    let results = engine.score_batch(&requests);
    assert_eq!(results.len(), 3);
    assert_eq!(
        results[0].as_ref().expect("first").label(),
        Label::Positive
    );
    assert!(results[1].is_err());
    assert_eq!(
        results[2].as_ref().expect("third").label(),
        Label::Negative
    );
}
