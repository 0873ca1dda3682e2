//! Line extractor: isolates the PDU hex token from a MikroTik log line
//!
//! MikroTik logs received messages as free-form text with the raw PDU
//! embedded as `pdu=<hex>`. Anything before or after the token is ignored.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use thiserror::Error;

static PDU_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"pdu=([0-9A-Fa-f]+)").expect("PDU token pattern is a valid regex")
});

/// Hex PDU as found in the log line, case preserved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PduToken(String);

impl PduToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PduToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of looking at one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// Empty or whitespace-only; skipped without a diagnostic
    Blank,
    Token(PduToken),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("cannot parse line (no PDU found): {line:?}")]
    NoPduFound { line: String },
}

/// Extract the `pdu=` token from a line without its trailing newline
pub fn extract_pdu(line: &str) -> Result<LineOutcome, ParseError> {
    if line.trim().is_empty() {
        return Ok(LineOutcome::Blank);
    }

    PDU_RE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|hex| LineOutcome::Token(PduToken(hex.as_str().to_string())))
        .ok_or_else(|| ParseError::NoPduFound {
            line: line.to_string(),
        })
}
