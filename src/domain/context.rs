//! Clinical context in which a prediction is requested.
//!
//! The context selects the decision threshold: screening favors recall,
//! preventive care favors precision, a clinical visit sits in between.

use serde::{Deserialize, Serialize};

/// Clinical use case attached to a scoring call.
///
/// Parsing never fails: any tag that is not one of the three recognized
/// contexts is kept verbatim as [`ClinicalContext::Other`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ClinicalContext {
    /// Population screening (most sensitive threshold)
    Screening,
    /// Routine clinical visit (balanced threshold)
    #[default]
    ClinicalVisit,
    /// Preventive medicine (most specific threshold)
    Preventive,
    /// Any unrecognized tag
    Other(String),
}

impl ClinicalContext {
    /// The three recognized contexts, from most sensitive to most specific.
    pub const RECOGNIZED: [ClinicalContext; 3] = [
        ClinicalContext::Screening,
        ClinicalContext::ClinicalVisit,
        ClinicalContext::Preventive,
    ];

    /// Parse a context tag. Matching is case-insensitive and ignores
    /// surrounding whitespace; `-` and ` ` are accepted in place of `_`.
    #[must_use]
    pub fn parse(tag: &str) -> Self {
        let normalized = tag.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "screening" => Self::Screening,
            "clinical_visit" => Self::ClinicalVisit,
            "preventive" => Self::Preventive,
            _ => Self::Other(tag.to_string()),
        }
    }

    /// Whether this context has an entry in the threshold table.
    #[must_use]
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    /// Canonical tag.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Screening => "screening",
            Self::ClinicalVisit => "clinical_visit",
            Self::Preventive => "preventive",
            Self::Other(tag) => tag,
        }
    }

    /// Human-readable title ("Clinical Visit").
    #[must_use]
    pub fn title(&self) -> String {
        self.as_str()
            .split('_')
            .filter(|w| !w.is_empty())
            .map(|w| {
                let mut chars = w.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl From<String> for ClinicalContext {
    fn from(tag: String) -> Self {
        Self::parse(&tag)
    }
}

impl From<&str> for ClinicalContext {
    fn from(tag: &str) -> Self {
        Self::parse(tag)
    }
}

impl From<ClinicalContext> for String {
    fn from(context: ClinicalContext) -> Self {
        context.as_str().to_string()
    }
}

impl std::fmt::Display for ClinicalContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_clinical_visit() {
        assert_eq!(ClinicalContext::default(), ClinicalContext::ClinicalVisit);
    }

    #[test]
    fn test_parse_recognized_tags() {
        assert_eq!(ClinicalContext::parse("screening"), ClinicalContext::Screening);
        assert_eq!(
            ClinicalContext::parse("Clinical-Visit"),
            ClinicalContext::ClinicalVisit
        );
        assert_eq!(ClinicalContext::parse(" PREVENTIVE "), ClinicalContext::Preventive);
    }

    #[test]
    fn test_parse_unknown_tag_is_kept() {
        let ctx = ClinicalContext::parse("emergency");
        assert_eq!(ctx, ClinicalContext::Other("emergency".to_string()));
        assert!(!ctx.is_recognized());
        assert_eq!(ctx.to_string(), "emergency");
    }

    #[test]
    fn test_title() {
        assert_eq!(ClinicalContext::ClinicalVisit.title(), "Clinical Visit");
        assert_eq!(ClinicalContext::Screening.title(), "Screening");
    }

    #[test]
    fn test_serde_as_plain_string() {
        let json = serde_json::to_string(&ClinicalContext::Preventive).expect("serialize");
        assert_eq!(json, "\"preventive\"");

        let back: ClinicalContext = serde_json::from_str("\"screening\"").expect("deserialize");
        assert_eq!(back, ClinicalContext::Screening);
    }
}
