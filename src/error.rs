//! Error types for the prompt fetcher

use std::fmt;
use thiserror::Error;

use crate::candidate::Candidate;

/// Maximum number of characters of a response body kept in a diagnostic
pub(crate) const MAX_BODY_SNIPPET: usize = 300;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The HTTP client could not be constructed
    #[error("HTTP client unavailable: {0}")]
    ClientUnavailable(String),

    /// Every candidate was tried and none succeeded
    #[error("No candidate succeeded ({} attempted)", .diagnostics.len())]
    Exhausted {
        /// One entry per attempted candidate, in attempt order
        diagnostics: Vec<AttemptFailure>,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Process exit status for this error
    pub fn exit_code(&self) -> u8 {
        1
    }

    /// Per-attempt diagnostics, if this error carries any
    pub fn diagnostics(&self) -> &[AttemptFailure] {
        match self {
            Error::Exhausted { diagnostics } => diagnostics,
            _ => &[],
        }
    }
}

/// Why a single candidate failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// 401 or 403
    Auth { status: u16, message: String },
    /// Any other non-200 status
    Status { status: u16, message: String },
    /// Connection, DNS or TLS failure
    Transport(String),
    /// The per-attempt timeout elapsed
    Timeout,
    /// 200 but the body was not a prompt list
    Malformed(String),
}

/// Diagnostic recorded for one failed candidate
#[derive(Debug, Clone)]
pub struct AttemptFailure {
    pub candidate: Candidate,
    pub kind: FailureKind,
    /// Value of the `x-request-id` response header, when present
    pub request_id: Option<String>,
}

impl AttemptFailure {
    pub fn new(candidate: Candidate, kind: FailureKind) -> Self {
        Self {
            candidate,
            kind,
            request_id: None,
        }
    }

    pub fn with_request_id(mut self, request_id: Option<String>) -> Self {
        self.request_id = request_id;
        self
    }

    /// HTTP status of the failed response, if one was received
    pub fn status(&self) -> Option<u16> {
        match &self.kind {
            FailureKind::Auth { status, .. } | FailureKind::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(self.kind, FailureKind::Auth { .. })
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Auth { status: 403, message } => {
                write!(f, "access denied (status 403): {}", message)
            }
            FailureKind::Auth { status, message } => {
                write!(f, "authentication failed (status {}): {}", status, message)
            }
            FailureKind::Status { status, message } => write!(f, "status {}: {}", status, message),
            FailureKind::Transport(message) => write!(f, "request error: {}", message),
            FailureKind::Timeout => write!(f, "timed out"),
            FailureKind::Malformed(message) => write!(f, "unexpected response: {}", message),
        }
    }
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.candidate, self.kind)?;
        if let Some(ref id) = self.request_id {
            write!(f, " (request id: {})", id)?;
        }
        Ok(())
    }
}

/// Classify a non-200 status with its (already redacted) body
pub(crate) fn classify_status(status: u16, body: &str) -> FailureKind {
    let message = snippet(body, MAX_BODY_SNIPPET);
    match status {
        401 | 403 => FailureKind::Auth { status, message },
        _ => FailureKind::Status { status, message },
    }
}

/// Classify a transport-level reqwest error
pub(crate) fn classify_transport(err: &reqwest::Error) -> FailureKind {
    if err.is_timeout() {
        FailureKind::Timeout
    } else {
        FailureKind::Transport(err.to_string())
    }
}

/// Classify a failure surfaced by the middleware stack
pub(crate) fn classify_middleware(err: &reqwest_middleware::Error) -> FailureKind {
    match err {
        reqwest_middleware::Error::Reqwest(e) => classify_transport(e),
        reqwest_middleware::Error::Middleware(e) => FailureKind::Transport(e.to_string()),
    }
}

fn snippet(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    match trimmed.char_indices().nth(max_chars) {
        Some((idx, _)) => trimmed[..idx].to_string(),
        None => trimmed.to_string(),
    }
}
