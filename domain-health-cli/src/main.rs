//! `domain-health` entry point.
//!
//! Checks one domain and prints the report. Exit codes: 0 healthy, 2 expired,
//! 1 when the check itself could not be completed.

mod args;
mod config;
mod output;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use domain_health_core::{DomainHealthChecker, HealthError, HickoryDnsResolver, WhoisRustClient};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use args::Cli;

const EXIT_EXPIRED: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli).await {
        Ok(true) => ExitCode::from(EXIT_EXPIRED),
        Ok(false) => ExitCode::SUCCESS,
        Err(e) => {
            if is_expected_failure(&e) {
                tracing::warn!("{e:#}");
            } else {
                tracing::error!("{e:#}");
            }
            ExitCode::FAILURE
        }
    }
}

/// Bad input or configuration, as opposed to a fault in the checker.
fn is_expected_failure(error: &anyhow::Error) -> bool {
    error
        .downcast_ref::<HealthError>()
        .is_none_or(HealthError::is_expected)
}

/// Logs go to stderr so stdout carries only the report.
fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time(),
        )
        .with(EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

/// Returns whether the domain was judged expired.
async fn run(cli: &Cli) -> Result<bool> {
    let config = config::load(cli)?;

    let dns = HickoryDnsResolver::new(&config.dns);
    tracing::debug!("Using DNS servers: {}", dns.nameservers());
    let whois = WhoisRustClient::new(config.whois)?;

    let checker = DomainHealthChecker::new(Arc::new(dns), Arc::new(whois));
    let report = checker.check(&cli.domain).await?;

    if cli.json {
        println!("{}", output::render_json(&report)?);
    } else {
        println!("{}", output::render_human(&cli.domain, &report));
    }

    Ok(report.is_expired)
}
