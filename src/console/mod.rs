//! Console front end: a line-oriented menu over any `BufRead`/`Write` pair.
//!
//! Screens:
//! - Predefined clinical cases
//! - Threshold comparison for a borderline patient
//! - Interactive patient entry
//! - System information

mod app;
mod cases;
mod input;

pub use app::{App, MenuOption};
pub use cases::{ClinicalCase, BORDERLINE_PATIENT, CLINICAL_CASES};
pub use input::InputError;
