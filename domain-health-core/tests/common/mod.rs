//! Fake lookup collaborators for checker tests.

#![allow(dead_code, clippy::unwrap_used)]

use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use domain_health_core::{
    DnsResolver, DomainHealthChecker, LookupError, LookupResult, MxRecord, WhoisClient,
    WhoisRecord,
};
use tokio::sync::Barrier;

/// Fixed reference instant for expiration comparisons.
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
}

/// DNS fake with one canned outcome per record type.
#[derive(Clone)]
pub struct FakeDns {
    pub ns: LookupResult<Vec<String>>,
    pub a: LookupResult<Vec<Ipv4Addr>>,
    pub mx: LookupResult<Vec<MxRecord>>,
    pub calls: Arc<AtomicUsize>,
    pub domains: Arc<Mutex<Vec<String>>>,
    pub barrier: Option<Arc<Barrier>>,
    pub panic_on_mx: bool,
}

impl FakeDns {
    /// Every lookup answers with plausible data.
    pub fn healthy() -> Self {
        Self {
            ns: Ok(vec!["ns1.example.com".into(), "ns2.example.com".into()]),
            a: Ok(vec![Ipv4Addr::new(93, 184, 216, 34)]),
            mx: Ok(vec![MxRecord::new("mail.example.com", 10)]),
            calls: Arc::new(AtomicUsize::new(0)),
            domains: Arc::default(),
            barrier: None,
            panic_on_mx: false,
        }
    }

    pub fn with_ns(mut self, ns: LookupResult<Vec<String>>) -> Self {
        self.ns = ns;
        self
    }

    pub fn with_a(mut self, a: LookupResult<Vec<Ipv4Addr>>) -> Self {
        self.a = a;
        self
    }

    pub fn with_mx(mut self, mx: LookupResult<Vec<MxRecord>>) -> Self {
        self.mx = mx;
        self
    }

    pub fn with_barrier(mut self, barrier: Arc<Barrier>) -> Self {
        self.barrier = Some(barrier);
        self
    }

    pub fn panicking_mx(mut self) -> Self {
        self.panic_on_mx = true;
        self
    }

    async fn enter(&self, domain: &str) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.domains.lock().unwrap().push(domain.to_string());
        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }
    }
}

#[async_trait]
impl DnsResolver for FakeDns {
    async fn resolve_nameservers(&self, domain: &str) -> LookupResult<Vec<String>> {
        self.enter(domain).await;
        self.ns.clone()
    }

    async fn resolve_ipv4_addresses(&self, domain: &str) -> LookupResult<Vec<Ipv4Addr>> {
        self.enter(domain).await;
        self.a.clone()
    }

    async fn resolve_mail_exchangers(&self, domain: &str) -> LookupResult<Vec<MxRecord>> {
        self.enter(domain).await;
        assert!(!self.panic_on_mx, "resolver crashed");
        self.mx.clone()
    }
}

/// WHOIS fake answering with a fixed record or error.
#[derive(Clone)]
pub struct FakeWhois {
    pub outcome: LookupResult<WhoisRecord>,
    pub calls: Arc<AtomicUsize>,
    pub domains: Arc<Mutex<Vec<String>>>,
    pub barrier: Option<Arc<Barrier>>,
    /// Never answer; `dropped` flips once the pending query is dropped.
    pub hang: bool,
    pub dropped: Arc<AtomicBool>,
}

impl FakeWhois {
    pub fn expiring(date: &str) -> Self {
        Self::answering(WhoisRecord {
            domain: "example.com".into(),
            registrar: Some("Example Registrar Inc.".into()),
            expiration_date: Some(date.into()),
            ..WhoisRecord::default()
        })
    }

    pub fn without_expiration() -> Self {
        Self::answering(WhoisRecord {
            domain: "no-expiry-field.com".into(),
            registrar: Some("Example Registrar Inc.".into()),
            ..WhoisRecord::default()
        })
    }

    pub fn failing(message: &str) -> Self {
        Self::with_outcome(Err(LookupError::Whois(message.into())))
    }

    /// A query that never completes.
    pub fn hanging() -> Self {
        Self {
            hang: true,
            ..Self::without_expiration()
        }
    }

    fn answering(record: WhoisRecord) -> Self {
        Self::with_outcome(Ok(record))
    }

    fn with_outcome(outcome: LookupResult<WhoisRecord>) -> Self {
        Self {
            outcome,
            calls: Arc::new(AtomicUsize::new(0)),
            domains: Arc::default(),
            barrier: None,
            hang: false,
            dropped: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_barrier(mut self, barrier: Arc<Barrier>) -> Self {
        self.barrier = Some(barrier);
        self
    }
}

#[async_trait]
impl WhoisClient for FakeWhois {
    async fn query_whois(&self, domain: &str) -> LookupResult<WhoisRecord> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.domains.lock().unwrap().push(domain.to_string());
        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }
        if self.hang {
            let _flag = SetOnDrop(Arc::clone(&self.dropped));
            std::future::pending::<()>().await;
        }
        self.outcome.clone()
    }
}

struct SetOnDrop(Arc<AtomicBool>);

impl Drop for SetOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

pub fn dns_error(message: &str) -> LookupError {
    LookupError::Dns(message.into())
}

pub fn checker(dns: FakeDns, whois: FakeWhois) -> DomainHealthChecker {
    DomainHealthChecker::new(Arc::new(dns), Arc::new(whois))
}
