use std::net::IpAddr;
use std::path::PathBuf;

use clap::Parser;

/// Check whether a domain is healthy or expired/abandoned.
#[derive(Debug, Parser)]
#[command(name = "domain-health", version)]
pub struct Cli {
    /// Domain to check (e.g. example.com)
    pub domain: String,

    /// Print the full report as JSON
    #[arg(long)]
    pub json: bool,

    /// TOML config file (default: <config dir>/domain-health/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Query this DNS server instead of the system resolver
    #[arg(long, value_name = "IP")]
    pub nameserver: Option<IpAddr>,

    /// Per-lookup timeout in seconds, for both DNS and WHOIS
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Verbose logging (debug level)
    #[arg(short, long)]
    pub verbose: bool,
}
