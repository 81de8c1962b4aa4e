//! Console application: menu loop and screens.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use super::cases::{BORDERLINE_PATIENT, CLINICAL_CASES, DETAILED_CASE};
use super::input::{self, InputError};
use crate::adapters::{LogisticRegression, ModelArtifact, StandardScaler};
use crate::application::report;
use crate::application::DecisionEngine;
use crate::config::{self, EngineConfig};
use crate::domain::{ClinicalContext, PatientFeatures, FEATURE_COUNT};
use crate::ports::{Classifier, FeatureScaler};

const MODEL_PATH_ENV: &str = "GLYCORISK_MODEL_PATH";
const REQUIRE_MANIFEST_ENV: &str = "GLYCORISK_REQUIRE_MANIFEST";
const DEFAULT_MODEL_PATH: &str = "models";

/// Menu entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOption {
    ClinicalCases,
    ThresholdComparison,
    Interactive,
    SystemInfo,
    Exit,
}

impl MenuOption {
    /// Parse a menu choice. `None` for unknown input.
    #[must_use]
    pub fn parse(choice: &str) -> Option<Self> {
        match choice.trim() {
            "1" => Some(Self::ClinicalCases),
            "2" => Some(Self::ThresholdComparison),
            "3" => Some(Self::Interactive),
            "4" => Some(Self::SystemInfo),
            "0" => Some(Self::Exit),
            _ => None,
        }
    }
}

/// Console application state.
pub struct App<C, S>
where
    C: Classifier,
    S: FeatureScaler,
{
    engine: Arc<DecisionEngine<C, S>>,
    model_description: String,
}

impl App<LogisticRegression, StandardScaler> {
    /// Build the application from the environment: engine configuration and
    /// the model artifact at `GLYCORISK_MODEL_PATH`.
    ///
    /// # Errors
    /// Returns error if the configuration is invalid or the model cannot be
    /// loaded.
    pub fn new() -> Result<Self> {
        let config = EngineConfig::from_env().context("Invalid engine configuration")?;

        let model_path = PathBuf::from(
            std::env::var(MODEL_PATH_ENV).unwrap_or_else(|_| DEFAULT_MODEL_PATH.to_string()),
        );
        let require_manifest = std::env::var(REQUIRE_MANIFEST_ENV)
            .map(|v| config::parse_bool(&v))
            .unwrap_or(false);

        let artifact = ModelArtifact::load(&model_path, require_manifest)
            .with_context(|| format!("Failed to load model from {}", model_path.display()))?;
        let description = artifact
            .description
            .clone()
            .unwrap_or_else(|| "Logistic regression".to_string());

        let (classifier, scaler, feature_names) = artifact.into_parts();
        let engine = DecisionEngine::new(Arc::new(classifier), Arc::new(scaler), feature_names, config)?;

        Ok(Self::with_engine(Arc::new(engine), description))
    }
}

impl<C, S> App<C, S>
where
    C: Classifier,
    S: FeatureScaler,
{
    /// Create an application around a pre-built engine.
    #[must_use]
    pub fn with_engine(engine: Arc<DecisionEngine<C, S>>, model_description: String) -> Self {
        Self {
            engine,
            model_description,
        }
    }

    /// Run the menu loop until the user exits or input ends.
    ///
    /// # Errors
    /// Returns error if writing to `out` fails.
    pub fn run<R: BufRead, W: Write>(&self, input: &mut R, out: &mut W) -> Result<()> {
        self.print_banner(out)?;

        loop {
            print_menu(out)?;
            let Some(choice) = input::read_line(input)? else {
                writeln!(out)?;
                break;
            };

            match MenuOption::parse(&choice) {
                Some(MenuOption::ClinicalCases) => self.clinical_cases(out)?,
                Some(MenuOption::ThresholdComparison) => self.threshold_comparison(out)?,
                Some(MenuOption::Interactive) => self.interactive(input, out)?,
                Some(MenuOption::SystemInfo) => self.system_info(out)?,
                Some(MenuOption::Exit) => {
                    writeln!(out, "Goodbye.")?;
                    break;
                }
                None => writeln!(out, "Error: unknown option {choice:?}")?,
            }
        }

        tracing::info!("Console session ended");
        Ok(())
    }

    fn print_banner<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "{}", "=".repeat(70))?;
        writeln!(out, "GLYCORISK - DIABETES RISK DECISION SUPPORT")?;
        writeln!(out, "Model: {}", self.model_description)?;
        writeln!(out, "{}", "=".repeat(70))?;
        Ok(())
    }

    fn clinical_cases<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "\nCLINICAL CASES")?;
        writeln!(out, "{}", "-".repeat(70))?;

        let mut detailed = None;
        for (idx, case) in CLINICAL_CASES.iter().enumerate() {
            writeln!(out, "\n{}", case.name)?;
            writeln!(out, "   {}", case.description)?;

            match self.engine.score(&case.features, &case.context, None) {
                Ok(result) => {
                    writeln!(
                        out,
                        "   [{}] {}",
                        case.context.title(),
                        report::render_summary(&result)
                    )?;
                    if idx == DETAILED_CASE {
                        detailed = Some((case, result));
                    }
                }
                Err(e) => writeln!(out, "   Error: {e}")?,
            }
        }

        if let Some((case, result)) = detailed {
            let patient = PatientFeatures::from_vec(&case.features)?;
            writeln!(out, "\nDetailed report for {}:", case.name)?;
            write!(out, "{}", report::render_report(&patient, &result))?;
        }
        Ok(())
    }

    fn threshold_comparison<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "\nTHRESHOLD COMPARISON - BORDERLINE PATIENT")?;
        writeln!(out, "{}", "-".repeat(70))?;

        match self.engine.compare_contexts(&BORDERLINE_PATIENT) {
            Ok(comparison) => write!(out, "{}", report::render_comparison(&comparison))?,
            Err(e) => writeln!(out, "Error: {e}")?,
        }
        Ok(())
    }

    fn interactive<R: BufRead, W: Write>(&self, input: &mut R, out: &mut W) -> Result<()> {
        let (patient, context) = match input::collect_patient(input, out) {
            Ok(collected) => collected,
            // Menu read will see the closed input and exit.
            Err(InputError::Eof) => return Ok(()),
            Err(InputError::Io(e)) => return Err(e.into()),
            Err(e) => {
                writeln!(out, "Error: {e}")?;
                return Ok(());
            }
        };

        match self.engine.score_patient(&patient, &context, None) {
            Ok(result) => write!(out, "\n{}", report::render_report(&patient, &result))?,
            Err(e) => writeln!(out, "Error: {e}")?,
        }
        Ok(())
    }

    fn system_info<W: Write>(&self, out: &mut W) -> Result<()> {
        let config = self.engine.config();

        writeln!(out, "\nSYSTEM INFORMATION")?;
        writeln!(out, "{}", "-".repeat(70))?;
        writeln!(out, "Model      : {}", self.model_description)?;
        writeln!(out, "Features   : {FEATURE_COUNT}")?;
        for name in self.engine.feature_names() {
            writeln!(out, "   - {name}")?;
        }
        writeln!(out, "Thresholds :")?;
        for context in ClinicalContext::RECOGNIZED.iter() {
            writeln!(
                out,
                "   {:<16} {:.2}",
                context.title(),
                config.thresholds.threshold_for(context)
            )?;
        }
        writeln!(out, "   {:<16} {:.2}", "Fallback", config.thresholds.fallback)?;
        writeln!(out, "Precedence : {:?}", config.precedence)?;
        writeln!(out, "Validation : {:?}", config.validation)?;
        Ok(())
    }
}

fn print_menu<W: Write>(out: &mut W) -> Result<()> {
    writeln!(out, "\nMENU")?;
    writeln!(out, "1. Clinical cases")?;
    writeln!(out, "2. Threshold comparison")?;
    writeln!(out, "3. Enter patient data")?;
    writeln!(out, "4. System information")?;
    writeln!(out, "0. Exit")?;
    write!(out, "Option: ")?;
    out.flush()?;
    Ok(())
}
