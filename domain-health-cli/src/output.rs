use anyhow::Result;
use domain_health_core::DomainReport;

pub fn render_human(domain: &str, report: &DomainReport) -> String {
    let verdict = if report.is_expired {
        "EXPIRED or abandoned"
    } else {
        "healthy"
    };
    format!("{domain}\n{}\n\nVerdict: {verdict}", report.reason)
}

pub fn render_json(report: &DomainReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
