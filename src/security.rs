//! Secret handling
//!
//! Keys are wrapped in [`SecretString`] so they never show up in `Debug` or
//! `Display` output, and response bodies pass through a [`Redactor`] before
//! they are stored in diagnostics or logged.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

const REDACTED: &str = "***REDACTED***";

/// A string that contains sensitive information and is automatically redacted in Debug/Display
#[derive(Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        SecretString(value.into())
    }

    /// Get the actual value
    ///
    /// Only call this where the secret is sent over the wire. Never log the result.
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretString({})", REDACTED)
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        SecretString::new(value)
    }
}

impl From<&str> for SecretString {
    fn from(value: &str) -> Self {
        SecretString::new(value)
    }
}

struct Pattern {
    regex: Regex,
    replacement: &'static str,
}

fn pattern(regex: &str, replacement: &'static str) -> Pattern {
    Pattern {
        // Literal patterns below are known to compile.
        regex: Regex::new(regex).unwrap_or_else(|e| panic!("invalid redaction pattern: {}", e)),
        replacement,
    }
}

static PATTERNS: LazyLock<Vec<Pattern>> = LazyLock::new(|| {
    vec![
        // Langfuse key pairs
        pattern(r"\b(pk|sk)-lf-[A-Za-z0-9\-]+", "$1-lf-***REDACTED***"),
        pattern(r"(?i)\b(Bearer|Basic)\s+[A-Za-z0-9\-_.~+/]+=*", "$1 ***REDACTED***"),
        pattern(
            r"(?i)(x-langfuse-secret-key|secret[_-]?key|api[_-]?key)([\s:=]+)[^\s,;]+",
            "$1$2***REDACTED***",
        ),
        pattern(r"(https?://)[^:/\s]+:[^@/\s]+@", "$1***:***@"),
    ]
});

/// Scrubs credentials out of text that came back from a server
#[derive(Debug, Clone, Default)]
pub struct Redactor {
    /// Exact values to scrub in addition to the generic patterns
    known: Vec<String>,
}

impl Redactor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also scrub this exact secret, wherever it appears
    pub fn with_secret(mut self, secret: &SecretString) -> Self {
        if !secret.is_empty() {
            self.known.push(secret.expose_secret().to_string());
        }
        self
    }

    pub fn redact(&self, text: &str) -> String {
        let mut result = text.to_string();
        for known in &self.known {
            result = result.replace(known.as_str(), REDACTED);
        }
        for p in PATTERNS.iter() {
            result = p.regex.replace_all(&result, p.replacement).into_owned();
        }
        result
    }
}
