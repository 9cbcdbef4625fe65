//! Domain health checks.
//!
//! Decides whether a domain is healthy or expired/abandoned by combining four
//! independent lookups: NS presence, A presence, MX presence and WHOIS
//! expiration. Lookups go through the [`DnsResolver`] and [`WhoisClient`]
//! traits; [`HickoryDnsResolver`] and [`WhoisRustClient`] are the network
//! implementations.

mod config;
mod error;
mod services;
mod traits;
mod types;
pub mod utils;

pub use config::{CheckerConfig, DnsConfig, WhoisConfig};
pub use error::{HealthError, HealthResult, LookupError, LookupResult};
pub use services::{
    DomainHealthChecker, HickoryDnsResolver, NO_EXPIRATION_DATE, WhoisRustClient, derive_verdict,
};
pub use traits::{DnsResolver, WhoisClient};
pub use types::{
    CheckResult, ChecksBundle, DomainReport, MxRecord, WhoisExpiration, WhoisRecord,
};
