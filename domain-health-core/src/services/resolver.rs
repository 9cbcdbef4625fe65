//! DNS collaborator backed by hickory-resolver.

use std::net::{IpAddr, Ipv4Addr};

use async_trait::async_trait;
use hickory_resolver::{
    TokioResolver,
    config::{NameServerConfigGroup, ResolverConfig, ResolverOpts},
    name_server::TokioConnectionProvider,
};

use crate::config::DnsConfig;
use crate::error::{LookupError, LookupResult};
use crate::traits::DnsResolver;
use crate::types::MxRecord;

/// [`DnsResolver`] using a hickory `TokioResolver`.
///
/// Targets the nameserver from [`DnsConfig`] when set, otherwise the host
/// system configuration (e.g. `/etc/resolv.conf`). If the system configuration
/// cannot be loaded, it falls back to Hickory's default upstream set.
pub struct HickoryDnsResolver {
    resolver: TokioResolver,
    label: String,
}

impl HickoryDnsResolver {
    pub fn new(config: &DnsConfig) -> Self {
        let mut opts = ResolverOpts::default();
        opts.timeout = config.timeout();
        opts.attempts = config.attempts;

        let (resolver, label) = match config.nameserver {
            Some(ip) => (build_resolver_for_ns(ip, opts), ip.to_string()),
            None => build_system_resolver(opts),
        };
        Self { resolver, label }
    }

    /// Human-readable list of the nameservers this resolver queries.
    pub fn nameservers(&self) -> &str {
        &self.label
    }
}

#[async_trait]
impl DnsResolver for HickoryDnsResolver {
    async fn resolve_nameservers(&self, domain: &str) -> LookupResult<Vec<String>> {
        let response = self.resolver.ns_lookup(domain).await.map_err(dns_error)?;
        Ok(response.iter().map(|ns| trim_dot(&ns.to_string())).collect())
    }

    async fn resolve_ipv4_addresses(&self, domain: &str) -> LookupResult<Vec<Ipv4Addr>> {
        let response = self.resolver.ipv4_lookup(domain).await.map_err(dns_error)?;
        Ok(response.iter().map(|a| a.0).collect())
    }

    async fn resolve_mail_exchangers(&self, domain: &str) -> LookupResult<Vec<MxRecord>> {
        let response = self.resolver.mx_lookup(domain).await.map_err(dns_error)?;
        Ok(response
            .iter()
            .map(|mx| MxRecord::new(trim_dot(&mx.exchange().to_string()), mx.preference()))
            .collect())
    }
}

fn dns_error(e: impl std::fmt::Display) -> LookupError {
    LookupError::Dns(e.to_string())
}

fn trim_dot(name: &str) -> String {
    name.trim_end_matches('.').to_string()
}

/// Deduplicate nameserver IP addresses from a resolver configuration.
fn dedup_ips(config: &ResolverConfig) -> Vec<String> {
    let mut ips: Vec<String> = Vec::new();
    for ns in config.name_servers() {
        let ip = ns.socket_addr.ip().to_string();
        if !ips.contains(&ip) {
            ips.push(ip);
        }
    }
    ips
}

fn label_for(config: &ResolverConfig) -> String {
    let ips = dedup_ips(config);
    if ips.is_empty() {
        "Default".to_string()
    } else {
        ips.join(", ")
    }
}

/// Build a resolver that targets a specific nameserver IP.
fn build_resolver_for_ns(ns_ip: IpAddr, opts: ResolverOpts) -> TokioResolver {
    let config = ResolverConfig::from_parts(
        None,
        vec![],
        NameServerConfigGroup::from_ips_clear(&[ns_ip], 53, true),
    );
    TokioResolver::builder_with_config(config, TokioConnectionProvider::default())
        .with_options(opts)
        .build()
}

/// Build a resolver using the host system DNS configuration (with fallback).
fn build_system_resolver(opts: ResolverOpts) -> (TokioResolver, String) {
    #[cfg(any(unix, target_os = "windows"))]
    {
        match hickory_resolver::system_conf::read_system_conf() {
            Ok((config, _system_opts)) => {
                let label = label_for(&config);
                let resolver =
                    TokioResolver::builder_with_config(config, TokioConnectionProvider::default())
                        .with_options(opts)
                        .build();
                return (resolver, label);
            }
            Err(e) => {
                log::warn!(
                    "Failed to load system DNS configuration, falling back to defaults: {e}"
                );
            }
        }
    }

    let config = ResolverConfig::default();
    let label = label_for(&config);
    let resolver = TokioResolver::builder_with_config(config, TokioConnectionProvider::default())
        .with_options(opts)
        .build();
    (resolver, label)
}
