//! Secret Masker: replaces credential-shaped substrings with a fixed token.

use std::borrow::Cow;
use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;

use crate::extract::ExtractedFields;

pub const REDACTION_TOKEN: &str = "[REDACTED]";

const CREDENTIAL_PATTERNS: &[&str] = &[
    r"\bsk-[A-Za-z0-9_-]{10,}\b",
    r"\bAIza[0-9A-Za-z_-]{20,}\b",
    r"\bghp_[A-Za-z0-9]{20,}\b",
    r"\bAKIA[0-9A-Z]{16}\b",
    r"\bxox[bpras]-[A-Za-z0-9-]+\b",
    r"\beyJ[A-Za-z0-9_-]{10,}\.[A-Za-z0-9_-]{10,}",
    r"Bearer\s+[A-Za-z0-9._~+/-]{20,}",
    r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b",
];

#[derive(Debug, Clone)]
pub struct SecretMasker {
    patterns: Vec<Regex>,
}

impl SecretMasker {
    /// Shared masker compiled from the built-in credential patterns.
    pub fn builtin() -> &'static SecretMasker {
        static MASKER: OnceLock<SecretMasker> = OnceLock::new();
        MASKER.get_or_init(|| SecretMasker::from_patterns(CREDENTIAL_PATTERNS))
    }

    fn from_patterns(patterns: &[&str]) -> Self {
        let patterns = patterns
            .iter()
            .filter_map(|pattern| match Regex::new(pattern) {
                Ok(regex) => Some(regex),
                Err(err) => {
                    tracing::warn!(pattern, error = %err, "skipping invalid credential pattern");
                    None
                }
            })
            .collect();
        Self { patterns }
    }

    /// Masks every match in `text`. Matches from different patterns that
    /// overlap or touch are merged and replaced by a single token.
    pub fn mask<'t>(&self, text: &'t str) -> Cow<'t, str> {
        let spans = self.matched_spans(text);
        if spans.is_empty() {
            return Cow::Borrowed(text);
        }
        let mut masked = String::with_capacity(text.len());
        let mut last = 0;
        for span in spans {
            masked.push_str(&text[last..span.start]);
            masked.push_str(REDACTION_TOKEN);
            last = span.end;
        }
        masked.push_str(&text[last..]);
        Cow::Owned(masked)
    }

    pub fn mask_fields(&self, fields: ExtractedFields) -> ExtractedFields {
        ExtractedFields {
            prompt: fields.prompt.map(|prompt| self.mask(&prompt).into_owned()),
            stdout: self.mask(&fields.stdout).into_owned(),
            stderr: self.mask(&fields.stderr).into_owned(),
            ..fields
        }
    }

    fn matched_spans(&self, text: &str) -> Vec<Range<usize>> {
        let mut spans: Vec<Range<usize>> = self
            .patterns
            .iter()
            .flat_map(|pattern| pattern.find_iter(text).map(|m| m.range()))
            .collect();
        spans.sort_by_key(|span| span.start);

        let mut merged: Vec<Range<usize>> = Vec::with_capacity(spans.len());
        for span in spans {
            match merged.last_mut() {
                Some(last) if span.start <= last.end => last.end = last.end.max(span.end),
                _ => merged.push(span),
            }
        }
        merged
    }
}
