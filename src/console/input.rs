//! Line-oriented input collection for the interactive screen.

use std::io::{BufRead, Write};

use crate::domain::{ClinicalContext, PatientFeatures};

/// Errors raised while reading patient data from the terminal.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("{field}: {value:?} is not a number")]
    NotANumber { field: &'static str, value: String },

    #[error("{field}: {value:?} is not a whole number")]
    NotAnInteger { field: &'static str, value: String },

    #[error("Input closed")]
    Eof,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Clone, Copy)]
enum Kind {
    Integer,
    Decimal,
}

/// Prompts in canonical feature order.
const PROMPTS: [(&str, &str, Kind); 8] = [
    ("Pregnancies", "Number of pregnancies (0-17): ", Kind::Integer),
    ("Glucose", "Fasting glucose (mg/dL, e.g. 110): ", Kind::Decimal),
    ("Diastolic BP", "Diastolic blood pressure (mmHg, e.g. 80): ", Kind::Decimal),
    ("Skinfold", "Triceps skinfold thickness (mm, e.g. 25): ", Kind::Decimal),
    ("Insulin", "Serum insulin (mu U/ml, e.g. 100): ", Kind::Decimal),
    ("BMI", "BMI (kg/m², e.g. 28.5): ", Kind::Decimal),
    ("Genetic risk score", "Genetic risk score (0.1-2.5, e.g. 0.5): ", Kind::Decimal),
    ("Age", "Age (years, e.g. 35): ", Kind::Integer),
];

/// Read one trimmed line. `None` on end of input.
///
/// # Errors
/// Returns error if reading fails.
pub fn read_line<R: BufRead>(input: &mut R) -> std::io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Print a prompt and read the answer.
///
/// # Errors
/// Returns `InputError::Eof` when input is closed.
pub fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    text: &str,
) -> Result<String, InputError> {
    write!(out, "{text}")?;
    out.flush()?;
    read_line(input)?.ok_or(InputError::Eof)
}

/// Parse a decimal value.
///
/// # Errors
/// Returns `InputError::NotANumber` if parsing fails or the value is not finite.
pub fn parse_decimal(field: &'static str, raw: &str) -> Result<f64, InputError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| InputError::NotANumber {
            field,
            value: raw.to_string(),
        })
}

/// Parse a whole number.
///
/// # Errors
/// Returns `InputError::NotAnInteger` if the value is not an integer.
pub fn parse_integer(field: &'static str, raw: &str) -> Result<f64, InputError> {
    raw.trim()
        .parse::<i64>()
        .map(|v| v as f64)
        .map_err(|_| InputError::NotAnInteger {
            field,
            value: raw.to_string(),
        })
}

/// Map a menu choice to a context. Anything but 1/2/3 is a clinical visit.
#[must_use]
pub fn context_from_choice(choice: &str) -> ClinicalContext {
    match choice.trim() {
        "1" => ClinicalContext::Screening,
        "3" => ClinicalContext::Preventive,
        _ => ClinicalContext::ClinicalVisit,
    }
}

/// Ask for the eight features and the clinical context.
///
/// # Errors
/// Returns the first parse error, or `InputError::Eof` if input closes.
pub fn collect_patient<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
) -> Result<(PatientFeatures, ClinicalContext), InputError> {
    writeln!(out, "\nEnter the patient data:")?;

    let mut values = Vec::with_capacity(PROMPTS.len());
    for (field, text, kind) in PROMPTS {
        let raw = prompt(input, out, text)?;
        let value = match kind {
            Kind::Integer => parse_integer(field, &raw)?,
            Kind::Decimal => parse_decimal(field, &raw)?,
        };
        values.push(value);
    }

    writeln!(out, "\nSelect the clinical context:")?;
    writeln!(out, "1. Population screening (threshold 0.35 - maximum detection)")?;
    writeln!(out, "2. Clinical visit (threshold 0.45 - balanced)")?;
    writeln!(out, "3. Preventive medicine (threshold 0.60 - conservative)")?;
    let choice = prompt(input, out, "Choice (1/2/3): ")?;

    let features = PatientFeatures {
        gestation_count: values[0],
        fasting_glucose: values[1],
        diastolic_bp: values[2],
        skinfold_thickness: values[3],
        serum_insulin: values[4],
        body_mass_index: values[5],
        genetic_risk_score: values[6],
        age: values[7],
    };

    Ok((features, context_from_choice(&choice)))
}
