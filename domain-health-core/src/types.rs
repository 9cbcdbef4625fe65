//! Public types produced by the health checker.

use std::net::Ipv4Addr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of one check.
///
/// Serialized with a `status` tag; the payload sits under `result` and
/// messages under `error`:
///
/// ```json
/// { "status": "success", "result": ["ns1.example.com"] }
/// { "status": "error", "error": "ENOTFOUND" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CheckResult<T> {
    /// Not resolved yet.
    Pending,
    /// Lookup succeeded.
    Success { result: T },
    /// Lookup failed.
    Error { error: String },
    /// Lookup succeeded but the answer was incomplete.
    Warning { error: String },
}

// Manual impl: the derive would demand `T: Default`.
impl<T> Default for CheckResult<T> {
    fn default() -> Self {
        Self::Pending
    }
}

impl<T> CheckResult<T> {
    pub fn success(result: T) -> Self {
        Self::Success { result }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::Warning {
            error: message.into(),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, Self::Warning { .. })
    }

    /// Success payload, if any.
    pub fn result(&self) -> Option<&T> {
        match self {
            Self::Success { result } => Some(result),
            _ => None,
        }
    }

    /// Error or warning message, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Error { error } | Self::Warning { error } => Some(error),
            _ => None,
        }
    }
}

/// A single mail exchanger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MxRecord {
    /// Exchange host name, without trailing dot.
    pub exchange: String,
    /// MX preference (lower is preferred).
    pub priority: u16,
}

impl MxRecord {
    pub fn new(exchange: impl Into<String>, priority: u16) -> Self {
        Self {
            exchange: exchange.into(),
            priority,
        }
    }
}

/// WHOIS response with parsed registration fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhoisRecord {
    /// The queried domain name.
    pub domain: String,
    /// Domain registrar (e.g. "Cloudflare, Inc.").
    pub registrar: Option<String>,
    /// Registration creation date, as found in the response.
    pub creation_date: Option<String>,
    /// Registration expiration date, as found in the response.
    pub expiration_date: Option<String>,
    /// Last updated date, as found in the response.
    pub updated_date: Option<String>,
    /// Authoritative name servers.
    pub name_servers: Vec<String>,
    /// EPP status codes.
    pub status: Vec<String>,
    /// Raw WHOIS response text.
    pub raw: String,
}

/// Registration expiration derived from WHOIS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhoisExpiration {
    #[serde(with = "crate::utils::datetime")]
    pub expiration_date: DateTime<Utc>,
    /// `expiration_date` lies before the instant of the check.
    pub is_expired: bool,
}

impl WhoisExpiration {
    pub fn evaluate(expiration_date: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        Self {
            expiration_date,
            is_expired: expiration_date < now,
        }
    }
}

/// The four checks of one report. Every key is always present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecksBundle {
    pub ns: CheckResult<Vec<String>>,
    pub a: CheckResult<Vec<Ipv4Addr>>,
    pub mx: CheckResult<Vec<MxRecord>>,
    pub whois: CheckResult<WhoisExpiration>,
}

impl ChecksBundle {
    /// Names of the checks that are still pending, in report order.
    pub fn pending(&self) -> Vec<&'static str> {
        [
            ("ns", self.ns.is_pending()),
            ("a", self.a.is_pending()),
            ("mx", self.mx.is_pending()),
            ("whois", self.whois.is_pending()),
        ]
        .into_iter()
        .filter_map(|(name, pending)| pending.then_some(name))
        .collect()
    }
}

/// Health report for one domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainReport {
    /// The domain looks expired or abandoned.
    pub is_expired: bool,
    /// Newline-joined summary, one line per check in NS, A, MX, WHOIS order.
    pub reason: String,
    pub checks: ChecksBundle,
}
