//! Error types for the health checker and its lookup collaborators.

use serde::Serialize;
use thiserror::Error;

/// Failure of a single DNS or WHOIS lookup.
///
/// Always recovered inside the checker and stored in the matching check entry.
/// `Display` is the bare collaborator message so the report carries it verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum LookupError {
    /// DNS resolution failed (NXDOMAIN, no records, timeout, ...)
    #[error("{0}")]
    Dns(String),

    /// WHOIS query or parsing failed
    #[error("{0}")]
    Whois(String),
}

/// Errors that escape the checker.
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum HealthError {
    /// A fault outside the four lookup attempts (task panic, unresolved check)
    #[error("Unexpected failure: {0}")]
    UnexpectedFailure(String),

    /// Invalid collaborator configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl HealthError {
    /// Whether the error stems from user input rather than a defect.
    ///
    /// The CLI logs `warn` for `true` and `error` for `false`.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::Config(_) => true,
            Self::UnexpectedFailure(_) => false,
        }
    }
}

/// Result alias for checker operations
pub type HealthResult<T> = std::result::Result<T, HealthError>;

/// Result alias for collaborator lookups
pub type LookupResult<T> = std::result::Result<T, LookupError>;
