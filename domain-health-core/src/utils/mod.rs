//! Shared helpers.

pub mod datetime;

pub use datetime::parse_whois_date;
