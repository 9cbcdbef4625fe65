//! Verdict and summary derivation.
//!
//! Pure functions of a [`ChecksBundle`]; nothing else feeds the verdict.

use crate::error::{HealthError, HealthResult};
use crate::types::{CheckResult, ChecksBundle};

const PASS: &str = "✓";
const FAIL: &str = "✗";
const WARN: &str = "⚠";

/// Date layout used in summary lines.
const SUMMARY_DATE_FORMAT: &str = "%Y-%m-%d";

/// Derive `(is_expired, reason)` from fully resolved checks.
///
/// `is_expired` holds when NS or A failed, or WHOIS reports a past
/// expiration date. MX never contributes. The reason has exactly one line
/// per check, in NS, A, MX, WHOIS order.
///
/// A check still pending here means the orchestration is broken, which is
/// reported as [`HealthError::UnexpectedFailure`].
pub fn derive_verdict(checks: &ChecksBundle) -> HealthResult<(bool, String)> {
    let pending = checks.pending();
    if !pending.is_empty() {
        return Err(HealthError::UnexpectedFailure(format!(
            "checks left unresolved: {}",
            pending.join(", ")
        )));
    }

    let mut is_expired = false;
    let mut summary = Vec::with_capacity(4);

    if checks.ns.is_error() {
        summary.push(format!("{FAIL} No nameservers"));
        is_expired = true;
    } else {
        summary.push(format!("{PASS} Nameservers present"));
    }

    if checks.a.is_error() {
        summary.push(format!("{FAIL} No A records"));
        is_expired = true;
    } else {
        summary.push(format!("{PASS} A records present"));
    }

    if checks.mx.is_error() {
        summary.push(format!("{FAIL} No MX records"));
    } else {
        summary.push(format!("{PASS} MX records present"));
    }

    match &checks.whois {
        CheckResult::Success { result } if result.is_expired => {
            summary.push(format!(
                "{FAIL} WHOIS: domain expired on {}",
                result.expiration_date.format(SUMMARY_DATE_FORMAT)
            ));
            is_expired = true;
        }
        CheckResult::Success { result } => summary.push(format!(
            "{PASS} WHOIS: expires on {}",
            result.expiration_date.format(SUMMARY_DATE_FORMAT)
        )),
        CheckResult::Warning { .. } => {
            summary.push(format!("{WARN} WHOIS: no expiration date found"));
        }
        CheckResult::Error { error } => {
            summary.push(format!("{FAIL} WHOIS: {}", single_line(error)));
        }
        // Rejected above.
        CheckResult::Pending => {}
    }

    Ok((is_expired, summary.join("\n")))
}

/// Collapse whitespace runs (newlines included) into single spaces.
fn single_line(message: &str) -> String {
    message.split_whitespace().collect::<Vec<_>>().join(" ")
}
