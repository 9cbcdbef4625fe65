//! WHOIS collaborator backed by whois-rust.

use std::collections::HashSet;

use async_trait::async_trait;
use regex::Regex;
use whois_rust::{WhoIs, WhoIsLookupOptions, WhoIsServerValue};

use crate::config::WhoisConfig;
use crate::error::{HealthError, HealthResult, LookupError, LookupResult};
use crate::traits::WhoisClient;
use crate::types::WhoisRecord;

/// Embedded WHOIS server mapping (TLD → server).
const WHOIS_SERVERS: &str = include_str!("whois_servers.json");

/// Registry consulted for TLDs missing from the embedded map; its `refer:`
/// line names the authoritative server.
const IANA_WHOIS_SERVER: &str = "whois.iana.org";

/// Patterns recognising the registration expiration line, tried in order.
const EXPIRATION_PATTERNS: &[&str] = &[
    r"(?i)Registry Expiry Date:\s*(.+)",
    r"(?i)Registrar Registration Expiration Date:\s*(.+)",
    r"(?i)Expir(?:y|ation) Date:\s*(.+)",
    r"(?i)Expiration Time:\s*(.+)",
    r"(?i)paid-till:\s*(.+)",
    r"(?im)^\s*Expires(?: On)?:\s*(.+)",
    r"(?im)^\s*Valid Until:\s*(.+)",
    r"(?im)^\s*renewal date:\s*(.+)",
];

/// [`WhoisClient`] querying registry servers through whois-rust.
pub struct WhoisRustClient {
    whois: WhoIs,
    known_suffixes: HashSet<String>,
    config: WhoisConfig,
}

impl WhoisRustClient {
    /// Build a client from the embedded server map.
    pub fn new(config: WhoisConfig) -> HealthResult<Self> {
        let whois = WhoIs::from_string(WHOIS_SERVERS).map_err(|e| {
            HealthError::Config(format!("Failed to initialize WHOIS client: {e}"))
        })?;
        let known_suffixes = serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(
            WHOIS_SERVERS,
        )
        .map_err(|e| HealthError::Config(format!("Invalid WHOIS server map: {e}")))?
        .into_iter()
        .map(|(suffix, _)| suffix)
        .filter(|suffix| suffix != "_")
        .collect();
        if let Some(server) = &config.server {
            WhoIsServerValue::from_string(server)
                .map_err(|e| HealthError::Config(format!("Invalid WHOIS server {server}: {e}")))?;
        }
        Ok(Self {
            whois,
            known_suffixes,
            config,
        })
    }

    /// Whether the embedded map has a server for `domain` or one of its
    /// parent suffixes, matched the way whois-rust walks the map.
    fn has_mapped_server(&self, domain: &str) -> bool {
        let domain = domain.to_ascii_lowercase();
        let mut suffix = domain.as_str();
        loop {
            if self.known_suffixes.contains(suffix) {
                return true;
            }
            match suffix.split_once('.') {
                Some((_, parent)) => suffix = parent,
                None => return false,
            }
        }
    }

    /// Server to query explicitly, or `None` to let the embedded map decide.
    fn explicit_server(&self, domain: &str) -> Option<&str> {
        match &self.config.server {
            Some(server) => Some(server.as_str()),
            None if self.has_mapped_server(domain) => None,
            None => Some(IANA_WHOIS_SERVER),
        }
    }

    fn lookup_options(&self, domain: &str) -> LookupResult<WhoIsLookupOptions> {
        let mut options = WhoIsLookupOptions::from_string(domain)
            .map_err(|e| LookupError::Whois(format!("Invalid domain: {e}")))?;
        options.follow = self.config.follow;
        options.timeout = Some(self.config.timeout());
        if let Some(server) = self.explicit_server(domain) {
            if self.config.server.is_none() {
                log::debug!("No WHOIS server mapped for {domain}, asking {server}");
                options.follow = options.follow.max(1);
            }
            options.server = Some(
                WhoIsServerValue::from_string(server)
                    .map_err(|e| LookupError::Whois(format!("Invalid WHOIS server: {e}")))?,
            );
        }
        Ok(options)
    }
}

#[async_trait]
impl WhoisClient for WhoisRustClient {
    async fn query_whois(&self, domain: &str) -> LookupResult<WhoisRecord> {
        let options = self.lookup_options(domain)?;
        let raw = self
            .whois
            .lookup_async(options)
            .await
            .map_err(|e| LookupError::Whois(format!("WHOIS query failed: {e}")))?;

        Ok(parse_whois_response(domain, &raw))
    }
}

/// Parse structured fields from a raw WHOIS response.
pub(crate) fn parse_whois_response(domain: &str, raw: &str) -> WhoisRecord {
    WhoisRecord {
        domain: domain.to_string(),
        registrar: extract_field(
            raw,
            &[
                r"(?i)Registrar:\s*(.+)",
                r"(?i)Registrar Name:\s*(.+)",
                r"(?i)Sponsoring Registrar:\s*(.+)",
            ],
        ),
        creation_date: extract_field(
            raw,
            &[
                r"(?i)Creation Date:\s*(.+)",
                r"(?i)Created Date:\s*(.+)",
                r"(?i)Created:\s*(.+)",
                r"(?i)Registration Time:\s*(.+)",
                r"(?i)Registration Date:\s*(.+)",
            ],
        ),
        expiration_date: extract_field(raw, EXPIRATION_PATTERNS),
        updated_date: extract_field(
            raw,
            &[
                r"(?i)Updated Date:\s*(.+)",
                r"(?i)Last Updated:\s*(.+)",
                r"(?i)Last Modified:\s*(.+)",
            ],
        ),
        name_servers: extract_name_servers(raw),
        status: extract_status(raw),
        raw: raw.to_string(),
    }
}

/// Try multiple regex patterns and return the first non-empty match.
fn extract_field(text: &str, patterns: &[&str]) -> Option<String> {
    for pattern in patterns {
        if let Ok(re) = Regex::new(pattern)
            && let Some(caps) = re.captures(text)
            && let Some(m) = caps.get(1)
        {
            let value = m.as_str().trim().to_string();
            if !value.is_empty() {
                return Some(value);
            }
        }
    }
    None
}

fn extract_name_servers(text: &str) -> Vec<String> {
    let mut servers = Vec::new();
    let patterns = [r"(?i)Name Server:\s*(.+)", r"(?i)nserver:\s*(.+)"];

    for pattern in patterns {
        if let Ok(re) = Regex::new(pattern) {
            for caps in re.captures_iter(text) {
                if let Some(m) = caps.get(1) {
                    let server = m.as_str().trim().trim_end_matches('.').to_lowercase();
                    if !server.is_empty() && !servers.contains(&server) {
                        servers.push(server);
                    }
                }
            }
        }
    }

    servers
}

/// EPP status codes; only the first token of each line is kept.
fn extract_status(text: &str) -> Vec<String> {
    let mut statuses = Vec::new();
    let patterns = [r"(?i)Domain Status:\s*(.+)", r"(?i)state:\s*(.+)"];

    for pattern in patterns {
        if let Ok(re) = Regex::new(pattern) {
            for caps in re.captures_iter(text) {
                if let Some(status) = caps
                    .get(1)
                    .and_then(|m| m.as_str().split_whitespace().next())
                    .map(|s| s.trim_end_matches(',').to_string())
                    && !status.is_empty()
                    && !statuses.contains(&status)
                {
                    statuses.push(status);
                }
            }
        }
    }

    statuses
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_field_first_pattern_wins() {
        let text = "Registrar: First\nSponsoring Registrar: Second";
        let result = extract_field(
            text,
            &[
                r"(?i)Registrar:\s*(.+)",
                r"(?i)Sponsoring Registrar:\s*(.+)",
            ],
        );
        assert_eq!(result, Some("First".to_string()));
    }

    #[test]
    fn test_extract_field_empty_value() {
        let result = extract_field("Registrar: ", &[r"(?i)Registrar:\s*(.*)"]);
        assert_eq!(result, None);
    }

    #[test]
    fn test_expiration_patterns() {
        let cases = [
            ("Registry Expiry Date: 2028-09-14T04:00:00Z", "2028-09-14T04:00:00Z"),
            (
                "Registrar Registration Expiration Date: 2030-01-01T00:00:00Z",
                "2030-01-01T00:00:00Z",
            ),
            ("Expiry date:  13-Aug-2024", "13-Aug-2024"),
            ("Expiration Time: 2026-03-17 12:48:36", "2026-03-17 12:48:36"),
            ("paid-till: 2025-12-01T00:00:00Z", "2025-12-01T00:00:00Z"),
            ("expires:      2027-05-01", "2027-05-01"),
            ("Expires On: 2031-02-02", "2031-02-02"),
            ("Valid Until: 2029-06-30", "2029-06-30"),
            ("renewal date: 2029-07-01", "2029-07-01"),
        ];
        for (raw, expected) in cases {
            assert_eq!(
                extract_field(raw, EXPIRATION_PATTERNS).as_deref(),
                Some(expected),
                "pattern failed for {raw:?}"
            );
        }
    }

    #[test]
    fn test_expiration_strips_carriage_return() {
        let raw = "Domain Name: EXAMPLE.COM\r\nRegistry Expiry Date: 2099-01-01T00:00:00Z\r\n";
        assert_eq!(
            extract_field(raw, EXPIRATION_PATTERNS).as_deref(),
            Some("2099-01-01T00:00:00Z")
        );
    }

    #[test]
    fn test_expires_needs_line_start() {
        let raw = "Remarks: the password expires: never mind";
        assert_eq!(extract_field(raw, EXPIRATION_PATTERNS), None);
    }

    #[test]
    fn test_extract_name_servers_dedup_and_lowercase() {
        let text = "Name Server: NS1.EXAMPLE.COM\nName Server: ns1.example.com.\nnserver: ns2.example.com";
        assert_eq!(
            extract_name_servers(text),
            vec!["ns1.example.com", "ns2.example.com"]
        );
    }

    #[test]
    fn test_extract_status() {
        let text = "Domain Status: clientTransferProhibited https://icann.org/epp#clientTransferProhibited\nDomain Status: clientDeleteProhibited https://icann.org\nstate: REGISTERED, DELEGATED";
        assert_eq!(
            extract_status(text),
            vec![
                "clientTransferProhibited",
                "clientDeleteProhibited",
                "REGISTERED"
            ]
        );
    }

    #[test]
    fn test_parse_whois_response_full() {
        let raw = r"Domain Name: EXAMPLE.COM
Registrar: Example Registrar Inc.
Creation Date: 1995-08-14T04:00:00Z
Registry Expiry Date: 2024-08-13T04:00:00Z
Updated Date: 2023-08-14T07:01:44Z
Name Server: A.IANA-SERVERS.NET
Name Server: B.IANA-SERVERS.NET
Domain Status: clientDeleteProhibited https://icann.org
Domain Status: clientTransferProhibited https://icann.org";

        let result = parse_whois_response("example.com", raw);
        assert_eq!(result.domain, "example.com");
        assert_eq!(result.registrar.as_deref(), Some("Example Registrar Inc."));
        assert_eq!(result.creation_date.as_deref(), Some("1995-08-14T04:00:00Z"));
        assert_eq!(
            result.expiration_date.as_deref(),
            Some("2024-08-13T04:00:00Z")
        );
        assert_eq!(result.updated_date.as_deref(), Some("2023-08-14T07:01:44Z"));
        assert_eq!(result.name_servers.len(), 2);
        assert_eq!(result.status.len(), 2);
        assert_eq!(result.raw, raw);
    }

    #[test]
    fn test_parse_whois_response_no_match() {
        let result = parse_whois_response("unregistered.com", "No match for \"UNREGISTERED.COM\".");
        assert!(result.expiration_date.is_none());
        assert!(result.registrar.is_none());
        assert!(result.name_servers.is_empty());
    }

    #[test]
    fn test_client_builds_from_embedded_servers() {
        assert!(WhoisRustClient::new(WhoisConfig::default()).is_ok());
    }

    #[test]
    fn test_lookup_options_apply_config() {
        let client = WhoisRustClient::new(WhoisConfig {
            server: Some("whois.verisign-grs.com".to_string()),
            timeout_secs: 7,
            follow: 3,
        })
        .unwrap();
        let options = client.lookup_options("example.com").unwrap();
        assert_eq!(options.follow, 3);
        assert_eq!(options.timeout, Some(std::time::Duration::from_secs(7)));
        assert!(options.server.is_some());
    }

    #[test]
    fn test_mapped_tld_uses_embedded_map() {
        let client = WhoisRustClient::new(WhoisConfig::default()).unwrap();
        assert!(client.has_mapped_server("example.com"));
        assert!(client.has_mapped_server("WWW.Example.COM"));
        assert_eq!(client.explicit_server("example.com"), None);
        assert!(client.lookup_options("example.com").unwrap().server.is_none());
    }

    #[test]
    fn test_unmapped_tld_falls_back_to_iana() {
        let client = WhoisRustClient::new(WhoisConfig {
            follow: 0,
            ..WhoisConfig::default()
        })
        .unwrap();
        assert!(!client.has_mapped_server("example.bank"));
        assert_eq!(client.explicit_server("example.bank"), Some("whois.iana.org"));

        let options = client.lookup_options("example.bank").unwrap();
        assert!(options.server.is_some());
        // IANA only refers onward, so at least one hop is needed.
        assert_eq!(options.follow, 1);
    }

    #[test]
    fn test_configured_server_overrides_fallback() {
        let client = WhoisRustClient::new(WhoisConfig {
            server: Some("whois.nic.bank".to_string()),
            follow: 0,
            ..WhoisConfig::default()
        })
        .unwrap();
        assert_eq!(client.explicit_server("example.bank"), Some("whois.nic.bank"));
        assert_eq!(client.lookup_options("example.bank").unwrap().follow, 0);
    }

    #[tokio::test]
    #[ignore]
    async fn test_query_whois_real() {
        let client = WhoisRustClient::new(WhoisConfig::default()).unwrap();
        let record = client.query_whois("google.com").await.unwrap();
        assert_eq!(record.domain, "google.com");
        assert!(record.expiration_date.is_some());
    }
}
