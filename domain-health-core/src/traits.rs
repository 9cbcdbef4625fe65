//! Lookup collaborator traits.
//!
//! Implementations:
//! - [`crate::HickoryDnsResolver`] / [`crate::WhoisRustClient`]: real network lookups
//! - test fakes returning canned data
//!
//! Implementations hold no per-call state and may be shared across concurrent checks.

use std::net::Ipv4Addr;

use async_trait::async_trait;

use crate::error::LookupResult;
use crate::types::{MxRecord, WhoisRecord};

/// DNS resolution used by the NS, A and MX checks.
#[async_trait]
pub trait DnsResolver: Send + Sync {
    /// Nameserver host names for `domain`, without trailing dots.
    async fn resolve_nameservers(&self, domain: &str) -> LookupResult<Vec<String>>;

    /// IPv4 addresses for `domain`.
    async fn resolve_ipv4_addresses(&self, domain: &str) -> LookupResult<Vec<Ipv4Addr>>;

    /// Mail exchangers for `domain`.
    async fn resolve_mail_exchangers(&self, domain: &str) -> LookupResult<Vec<MxRecord>>;
}

/// Registration data lookup used by the WHOIS check.
#[async_trait]
pub trait WhoisClient: Send + Sync {
    /// Query WHOIS for `domain`.
    ///
    /// A response without an expiration date is still `Ok`; the checker
    /// reports it as a warning.
    async fn query_whois(&self, domain: &str) -> LookupResult<WhoisRecord>;
}
