//! The four lookups, each turned into a [`CheckResult`].
//!
//! None of these can fail: lookup errors become `Error` entries.

use std::net::Ipv4Addr;

use chrono::{DateTime, Utc};

use crate::error::LookupResult;
use crate::traits::{DnsResolver, WhoisClient};
use crate::types::{CheckResult, MxRecord, WhoisExpiration, WhoisRecord};
use crate::utils::parse_whois_date;

/// Warning stored when WHOIS answered without an expiration date.
pub const NO_EXPIRATION_DATE: &str = "no expiration date found";

pub(crate) async fn check_ns(dns: &dyn DnsResolver, domain: &str) -> CheckResult<Vec<String>> {
    into_check("NS", domain, dns.resolve_nameservers(domain).await)
}

pub(crate) async fn check_a(dns: &dyn DnsResolver, domain: &str) -> CheckResult<Vec<Ipv4Addr>> {
    into_check("A", domain, dns.resolve_ipv4_addresses(domain).await)
}

pub(crate) async fn check_mx(dns: &dyn DnsResolver, domain: &str) -> CheckResult<Vec<MxRecord>> {
    into_check("MX", domain, dns.resolve_mail_exchangers(domain).await)
}

pub(crate) async fn check_whois(
    whois: &dyn WhoisClient,
    domain: &str,
    now: DateTime<Utc>,
) -> CheckResult<WhoisExpiration> {
    let check = interpret_whois(whois.query_whois(domain).await, now);
    match &check {
        CheckResult::Success { result } => log::debug!(
            "WHOIS check for {domain}: expires {} (expired: {})",
            result.expiration_date,
            result.is_expired
        ),
        other => log::debug!(
            "WHOIS check for {domain}: {}",
            other.message().unwrap_or_default()
        ),
    }
    check
}

fn into_check<T>(kind: &str, domain: &str, outcome: LookupResult<T>) -> CheckResult<T> {
    match outcome {
        Ok(result) => {
            log::debug!("{kind} check for {domain}: ok");
            CheckResult::success(result)
        }
        Err(e) => {
            log::debug!("{kind} check for {domain} failed: {e}");
            CheckResult::error(e.to_string())
        }
    }
}

/// Map a WHOIS answer to the expiration check.
///
/// - expiration field present and parseable → `Success`, expired if before `now`
/// - expiration field present but unreadable → `Error`
/// - no expiration field → `Warning`
/// - query failed → `Error`
pub(crate) fn interpret_whois(
    outcome: LookupResult<WhoisRecord>,
    now: DateTime<Utc>,
) -> CheckResult<WhoisExpiration> {
    let record = match outcome {
        Ok(record) => record,
        Err(e) => return CheckResult::error(e.to_string()),
    };

    let Some(raw_date) = record.expiration_date.as_deref() else {
        return CheckResult::warning(NO_EXPIRATION_DATE);
    };

    match parse_whois_date(raw_date) {
        Some(expiration_date) => {
            CheckResult::success(WhoisExpiration::evaluate(expiration_date, now))
        }
        None => CheckResult::error(format!("Unrecognized expiration date: {raw_date}")),
    }
}
