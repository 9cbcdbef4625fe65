//! Domain health checker and its concrete collaborators.

mod checks;
mod resolver;
mod verdict;
mod whois;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use chrono::{DateTime, Utc};
use tokio::task::{JoinError, JoinHandle};

use crate::error::{HealthError, HealthResult};
use crate::traits::{DnsResolver, WhoisClient};
use crate::types::{ChecksBundle, DomainReport};

pub use checks::NO_EXPIRATION_DATE;
pub use resolver::HickoryDnsResolver;
pub use verdict::derive_verdict;
pub use whois::WhoisRustClient;

/// Trim whitespace and a single trailing root dot.
///
/// No further validation: a malformed name just makes the lookups fail.
fn normalize_domain(domain: &str) -> &str {
    let domain = domain.trim();
    domain.strip_suffix('.').unwrap_or(domain)
}

/// Combines NS, A, MX and WHOIS lookups into one expired/healthy verdict.
///
/// The checker holds no per-call state; one instance can serve concurrent
/// checks for different domains.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use domain_health_core::{
///     CheckerConfig, DomainHealthChecker, HickoryDnsResolver, WhoisRustClient,
/// };
/// # async fn demo() -> domain_health_core::HealthResult<()> {
/// let config = CheckerConfig::default();
/// let checker = DomainHealthChecker::new(
///     Arc::new(HickoryDnsResolver::new(&config.dns)),
///     Arc::new(WhoisRustClient::new(config.whois)?),
/// );
/// let report = checker.check("example.com").await?;
/// println!("{}", report.reason);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct DomainHealthChecker {
    dns: Arc<dyn DnsResolver>,
    whois: Arc<dyn WhoisClient>,
}

impl DomainHealthChecker {
    #[must_use]
    pub fn new(dns: Arc<dyn DnsResolver>, whois: Arc<dyn WhoisClient>) -> Self {
        Self { dns, whois }
    }

    /// Check `domain` against the current time.
    pub async fn check(&self, domain: &str) -> HealthResult<DomainReport> {
        self.check_at(domain, Utc::now()).await
    }

    /// Check `domain`, judging WHOIS expiration against `now`.
    ///
    /// The four lookups run concurrently and independently; a failed lookup
    /// is recorded in the report and never aborts the others. Only a fault
    /// outside the lookups (a panicking task, an unresolved check) is
    /// returned as [`HealthError::UnexpectedFailure`].
    ///
    /// Dropping the returned future aborts the lookups still in flight.
    pub async fn check_at(&self, domain: &str, now: DateTime<Utc>) -> HealthResult<DomainReport> {
        let domain = normalize_domain(domain);
        self.run_checks(domain, now).await.inspect_err(|e| {
            log::error!("Domain check for {domain} failed: {e}");
        })
    }

    async fn run_checks(&self, domain: &str, now: DateTime<Utc>) -> HealthResult<DomainReport> {
        let ns = {
            let (dns, domain) = (Arc::clone(&self.dns), domain.to_string());
            spawn_check(async move { checks::check_ns(dns.as_ref(), &domain).await })
        };
        let a = {
            let (dns, domain) = (Arc::clone(&self.dns), domain.to_string());
            spawn_check(async move { checks::check_a(dns.as_ref(), &domain).await })
        };
        let mx = {
            let (dns, domain) = (Arc::clone(&self.dns), domain.to_string());
            spawn_check(async move { checks::check_mx(dns.as_ref(), &domain).await })
        };
        let whois = {
            let (client, domain) = (Arc::clone(&self.whois), domain.to_string());
            spawn_check(async move { checks::check_whois(client.as_ref(), &domain, now).await })
        };

        let (ns, a, mx, whois) = tokio::join!(ns, a, mx, whois);
        let checks = ChecksBundle {
            ns: ns.map_err(|e| task_failure("NS", &e))?,
            a: a.map_err(|e| task_failure("A", &e))?,
            mx: mx.map_err(|e| task_failure("MX", &e))?,
            whois: whois.map_err(|e| task_failure("WHOIS", &e))?,
        };

        let (is_expired, reason) = derive_verdict(&checks)?;
        log::info!("Domain {domain} checked: expired={is_expired}");

        Ok(DomainReport {
            is_expired,
            reason,
            checks,
        })
    }
}

/// Handle to a spawned check that aborts the task when dropped, so a
/// cancelled `check` does not leave lookups running in the background.
struct CheckTask<T>(JoinHandle<T>);

impl<T> Future for CheckTask<T> {
    type Output = Result<T, JoinError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.0).poll(cx)
    }
}

impl<T> Drop for CheckTask<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

fn spawn_check<F>(future: F) -> CheckTask<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    CheckTask(tokio::spawn(future))
}

fn task_failure(kind: &str, error: &JoinError) -> HealthError {
    HealthError::UnexpectedFailure(format!("{kind} check task failed: {error}"))
}
