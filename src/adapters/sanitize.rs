//! Log redaction for patient data.
//!
//! Every formatted log line goes through [`SanitizingMakeWriter`] on its way
//! to the sink. A line is first tested against all rules at once; only rules
//! that match are applied. Rules cover record identifiers (UUIDs, MRNs),
//! contact details, `patient=` fields and dumps of whole feature vectors.
//!
//! Redaction is a fallback. Scoring code logs context, thresholds and
//! outcomes, never the raw measurements.

use std::borrow::Cow;
use std::io::{self, Write};
use std::sync::OnceLock;

use regex::{Regex, RegexSet};
use tracing_subscriber::fmt::MakeWriter;

const MAX_BYTES_ENV: &str = "GLYCORISK_SANITIZE_MAX_BYTES";
const DEFAULT_MAX_BYTES: usize = 16 * 1024;

/// (pattern, replacement)
const RULES: [(&str, &str); 6] = [
    (
        r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}",
        "[REDACTED-UUID]",
    ),
    (r"\bMRN[:\s]?\d{6,10}\b", "[REDACTED-MRN]"),
    (
        r"(?i)\b[a-z0-9](?:[a-z0-9._%+-]{0,62}[a-z0-9])?@(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,}\b",
        "[REDACTED-EMAIL]",
    ),
    (
        r"\b(?:\+?1[-.\s]?)?\(?[0-9]{3}\)?[-.\s]?[0-9]{3}[-.\s]?[0-9]{4}\b",
        "[REDACTED-PHONE]",
    ),
    (
        r"(?i)\bpatient(?:_id)?\s*[:=]\s*[^\s,;]+",
        "patient=[REDACTED]",
    ),
    // Eight or more numbers in brackets: a full feature vector.
    (
        r"\[\s*-?\d+(?:\.\d+)?(?:\s*,\s*-?\d+(?:\.\d+)?){7,}\s*\]",
        "[REDACTED-FEATURES]",
    ),
];

/// Compiled rule table.
struct Redactor {
    matcher: RegexSet,
    rules: Vec<(Regex, &'static str)>,
    max_bytes: usize,
}

impl Redactor {
    fn compile(max_bytes: usize) -> Result<Self, regex::Error> {
        let matcher = RegexSet::new(RULES.iter().map(|&(pattern, _)| pattern))?;
        let rules = RULES
            .iter()
            .map(|&(pattern, replacement)| Ok((Regex::new(pattern)?, replacement)))
            .collect::<Result<Vec<_>, regex::Error>>()?;
        Ok(Self {
            matcher,
            rules,
            max_bytes,
        })
    }

    fn global() -> &'static Self {
        static REDACTOR: OnceLock<Redactor> = OnceLock::new();
        REDACTOR.get_or_init(|| {
            let max_bytes = std::env::var(MAX_BYTES_ENV)
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
                .filter(|&v| v > 0)
                .unwrap_or(DEFAULT_MAX_BYTES);
            // The rule table is a compile-time constant.
            Self::compile(max_bytes).expect("redaction rules compile")
        })
    }

    /// Longest prefix within `max_bytes` that ends on a char boundary.
    fn bounded<'a>(&self, input: &'a str) -> (&'a str, bool) {
        if input.len() <= self.max_bytes {
            return (input, false);
        }
        let end = (0..=self.max_bytes)
            .rev()
            .find(|&i| input.is_char_boundary(i))
            .unwrap_or(0);
        (&input[..end], true)
    }

    fn redact<'a>(&self, input: &'a str) -> Cow<'a, str> {
        let (text, truncated) = self.bounded(input);
        let hits = self.matcher.matches(text);
        if !hits.matched_any() && !truncated {
            return Cow::Borrowed(input);
        }

        let mut out = Cow::Borrowed(text);
        for idx in hits.iter() {
            let (regex, replacement) = &self.rules[idx];
            let replaced = match regex.replace_all(&out, *replacement) {
                Cow::Owned(replaced) => Some(replaced),
                Cow::Borrowed(_) => None,
            };
            if let Some(replaced) = replaced {
                out = Cow::Owned(replaced);
            }
        }

        if truncated {
            let mut owned = out.into_owned();
            owned.push_str(" [TRUNCATED]");
            out = Cow::Owned(owned);
        }
        out
    }

    fn detects(&self, input: &str) -> bool {
        self.matcher.is_match(self.bounded(input).0)
    }
}

/// Redact patient data from a string.
#[must_use]
pub fn sanitize(input: &str) -> String {
    Redactor::global().redact(input).into_owned()
}

/// Whether a string contains anything a rule would redact.
#[must_use]
pub fn contains_pii(input: &str) -> bool {
    Redactor::global().detects(input)
}

/// `MakeWriter` wrapper that redacts each complete line before it reaches
/// the inner writer.
#[derive(Debug, Clone)]
pub struct SanitizingMakeWriter<M> {
    inner: M,
}

impl<M> SanitizingMakeWriter<M> {
    #[must_use]
    pub fn new(inner: M) -> Self {
        Self { inner }
    }
}

impl<'a, M> MakeWriter<'a> for SanitizingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = SanitizingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        SanitizingWriter {
            inner: self.inner.make_writer(),
            pending: Vec::new(),
            redactor: Redactor::global(),
        }
    }
}

/// Line-buffering writer produced by [`SanitizingMakeWriter`].
pub struct SanitizingWriter<W> {
    inner: W,
    pending: Vec<u8>,
    redactor: &'static Redactor,
}

impl<W: Write> SanitizingWriter<W> {
    fn emit(&mut self, bytes: &[u8]) -> io::Result<()> {
        let text = String::from_utf8_lossy(bytes);
        self.inner
            .write_all(self.redactor.redact(&text).as_bytes())
    }

    fn drain_lines(&mut self) -> io::Result<()> {
        let Some(last_newline) = self.pending.iter().rposition(|&b| b == b'\n') else {
            return Ok(());
        };
        let complete: Vec<u8> = self.pending.drain(..=last_newline).collect();
        for line in complete.split_inclusive(|&b| b == b'\n') {
            self.emit(line)?;
        }
        Ok(())
    }
}

impl<W: Write> Write for SanitizingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        self.drain_lines()?;

        // A formatter that never emits a newline must not grow the buffer
        // without bound.
        if self.pending.len() > self.redactor.max_bytes.saturating_mul(2) {
            let overflow = std::mem::take(&mut self.pending);
            self.emit(&overflow)?;
            self.inner.write_all(b"\n")?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.drain_lines()?;
        if !self.pending.is_empty() {
            let rest = std::mem::take(&mut self.pending);
            self.emit(&rest)?;
        }
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn writer(sink: &mut Vec<u8>) -> SanitizingWriter<&mut Vec<u8>> {
        SanitizingWriter {
            inner: sink,
            pending: Vec::new(),
            redactor: Redactor::global(),
        }
    }

    #[test]
    fn test_sanitize_uuid() {
        let sanitized = sanitize("Result 550e8400-e29b-41d4-a716-446655440000 stored");
        assert_eq!(sanitized, "Result [REDACTED-UUID] stored");
    }

    #[test]
    fn test_sanitize_mrn_and_email() {
        assert!(sanitize("MRN:12345678 scored").contains("[REDACTED-MRN]"));
        assert!(sanitize("Contact: patient@hospital.com").contains("[REDACTED-EMAIL]"));
    }

    #[test]
    fn test_sanitize_patient_field() {
        let sanitized = sanitize("scored patient_id=A-1029 context=screening");
        assert_eq!(sanitized, "scored patient=[REDACTED] context=screening");
    }

    #[test]
    fn test_sanitize_feature_vector() {
        let sanitized = sanitize("features=[2, 110, 75, 25, 100, 28.5, 0.4, 35] p=0.52");
        assert_eq!(sanitized, "features=[REDACTED-FEATURES] p=0.52");
    }

    #[test]
    fn test_clean_lines_are_borrowed() {
        let input = "thresholds [0.35, 0.45, 0.6]";
        assert!(matches!(
            Redactor::global().redact(input),
            Cow::Borrowed(s) if s == input
        ));
    }

    #[test]
    fn test_contains_pii() {
        assert!(contains_pii("ID: 550e8400-e29b-41d4-a716-446655440000"));
        assert!(contains_pii("[1, 2, 3, 4, 5, 6, 7, 8]"));
        assert!(!contains_pii("Scoring complete: context=screening, label=DIABETES"));
    }

    #[test]
    fn test_truncates_long_input() {
        let redactor = Redactor::compile(16).expect("rules");
        let out = redactor.redact("prefix 0123456789abcdef suffix");
        assert_eq!(out, "prefix 012345678 [TRUNCATED]");
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let redactor = Redactor::compile(2).expect("rules");
        assert_eq!(redactor.redact("ab"), "ab");
        assert_eq!(redactor.redact("aéb"), "a [TRUNCATED]");
    }

    #[test]
    fn test_writer_redacts_per_line() {
        let mut sink = Vec::new();
        {
            let mut w = writer(&mut sink);
            w.write_all(b"scoring [4, 160, 85, 30, 150, 35.0, 0.8, 45]\nok\n")
                .expect("write");
            w.flush().expect("flush");
        }
        let out = String::from_utf8(sink).expect("utf8");
        assert_eq!(out, "scoring [REDACTED-FEATURES]\nok\n");
    }

    #[test]
    fn test_writer_holds_partial_lines_until_flush() {
        let mut sink = Vec::new();
        {
            let mut w = writer(&mut sink);
            w.write_all(b"patient=").expect("write");
            w.write_all(b"X9 done").expect("write");
            w.flush().expect("flush");
        }
        assert_eq!(String::from_utf8(sink).expect("utf8"), "patient=[REDACTED] done");
    }
}
