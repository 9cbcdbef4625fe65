//! Collaborator configuration.
//!
//! Deadlines live here, on the resolver and WHOIS client; the checker itself
//! never times out a lookup.

use std::net::IpAddr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

const DEFAULT_DNS_TIMEOUT_SECS: u64 = 5;
const DEFAULT_DNS_ATTEMPTS: usize = 2;
const DEFAULT_WHOIS_TIMEOUT_SECS: u64 = 15;
const DEFAULT_WHOIS_FOLLOW: u16 = 1;

/// Configuration for both lookup collaborators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckerConfig {
    pub dns: DnsConfig,
    pub whois: WhoisConfig,
}

/// DNS resolver settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DnsConfig {
    /// Query this nameserver instead of the system configuration.
    pub nameserver: Option<IpAddr>,
    /// Per-query timeout in seconds.
    pub timeout_secs: u64,
    /// Attempts per query before giving up.
    pub attempts: usize,
}

impl Default for DnsConfig {
    fn default() -> Self {
        Self {
            nameserver: None,
            timeout_secs: DEFAULT_DNS_TIMEOUT_SECS,
            attempts: DEFAULT_DNS_ATTEMPTS,
        }
    }
}

impl DnsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// WHOIS client settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WhoisConfig {
    /// Always query this server (`host` or `host:port`) instead of the TLD map.
    pub server: Option<String>,
    /// Timeout for the whole query in seconds.
    pub timeout_secs: u64,
    /// How many registrar referrals to follow.
    pub follow: u16,
}

impl Default for WhoisConfig {
    fn default() -> Self {
        Self {
            server: None,
            timeout_secs: DEFAULT_WHOIS_TIMEOUT_SECS,
            follow: DEFAULT_WHOIS_FOLLOW,
        }
    }
}

impl WhoisConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
