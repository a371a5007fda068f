//! Health command - probe external services

use anyhow::Result;
use console::style;
use repocat::config::Config;
use repocat::health::{check_all, default_probes, OverallStatus};

pub fn run(config: &Config, format: &str) -> Result<()> {
    let report = check_all(&default_probes(config));

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let overall = match report.status {
        OverallStatus::Healthy => style("healthy").green().bold(),
        OverallStatus::Degraded => style("degraded").yellow().bold(),
    };
    println!("\nStatus: {}\n", overall);

    for service in &report.services {
        if service.is_up() {
            println!(
                "  {} {:<12} {}",
                style("✓").green(),
                service.service,
                style(format!("{}ms", service.response_time_ms)).dim()
            );
        } else {
            println!(
                "  {} {:<12} {}",
                style("✗").red(),
                service.service,
                style(service.error.as_deref().unwrap_or("down")).red()
            );
        }
    }
    println!();
    Ok(())
}
