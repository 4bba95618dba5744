//! Styled terminal rendering of a finished audit report.

use console::{style, StyledObject};

use crate::models::{AuditReport, Finding, Severity};

fn grade_styled(grade: &str, text: String) -> StyledObject<String> {
    match grade {
        "A+" | "A" => style(text).green().bold(),
        "B+" | "B" => style(text).cyan().bold(),
        "C" => style(text).yellow().bold(),
        _ => style(text).red().bold(),
    }
}

fn severity_styled(severity: Severity) -> StyledObject<&'static str> {
    match severity {
        Severity::Critical => style("CRITICAL").red().bold(),
        Severity::High => style("HIGH").red(),
        Severity::Medium => style("MEDIUM").yellow(),
        Severity::Low => style("LOW").cyan(),
        Severity::Info => style("INFO").dim(),
    }
}

fn print_finding(finding: &Finding) {
    println!(
        "  [{}] {}",
        severity_styled(finding.severity),
        style(&finding.title).bold()
    );
    println!("      {}", style(&finding.description).dim());
    if !finding.recommendation.is_empty() {
        println!("      {} {}", style("→").dim(), finding.recommendation);
    }
    if !finding.characteristic.is_empty() {
        println!(
            "      {} {}",
            style("characteristic:").dim(),
            style(&finding.characteristic).dim()
        );
    }
    println!();
}

/// Print the full report to stdout.
pub fn print_report(report: &AuditReport) {
    let rule = style("─".repeat(60)).dim();

    println!();
    println!("{}", style("BLE Security Audit Report").cyan().bold());
    println!("{rule}");
    println!(
        "  Device:  {} ({})",
        style(&report.device_name).bold(),
        report.device_address
    );
    println!("  Time:    {}", report.timestamp);
    let auth = if report.connection_no_auth {
        style("No authentication required").red()
    } else {
        style("Authentication required").green()
    };
    println!("  Auth:    {auth}");
    println!("{rule}");
    println!("  Services:        {}", report.total_services);
    println!("  Characteristics: {}", report.total_characteristics);
    println!("    Readable:  {}", report.readable_chars);
    println!("    Writable:  {}", report.writable_chars);
    println!("    Notify:    {}", report.notify_chars);
    println!("{rule}");

    let summary = format!("Score: {:.1}/10   Grade: {}", report.score, report.grade);
    println!("  {}", grade_styled(&report.grade, summary));
    println!();

    if !report.findings.is_empty() {
        println!(
            "{}",
            style(format!("Findings ({})", report.findings.len())).bold()
        );
        println!();
        // Most severe first; insertion order within each severity
        for severity in Severity::all() {
            for finding in report.findings.iter().filter(|f| f.severity == severity) {
                print_finding(finding);
            }
        }
    }

    if !report.exposed_data.is_empty() {
        println!(
            "{}",
            style("Exposed Data (readable without auth)").red().bold()
        );
        let width = report
            .exposed_data
            .keys()
            .map(|k| k.len())
            .max()
            .unwrap_or(0);
        for (field, value) in &report.exposed_data {
            let shown = if value.chars().count() > 80 {
                format!("{}...", value.chars().take(80).collect::<String>())
            } else {
                value.clone()
            };
            println!("  {}  {}", style(format!("{field:width$}")).cyan(), shown);
        }
        println!();
    }

    println!(
        "  Critical: {}  High: {}  Medium: {}  Low: {}  Info: {}",
        style(report.count_by_severity(Severity::Critical)).red().bold(),
        style(report.count_by_severity(Severity::High)).red(),
        style(report.count_by_severity(Severity::Medium)).yellow(),
        style(report.count_by_severity(Severity::Low)).cyan(),
        style(report.count_by_severity(Severity::Info)).dim(),
    );
    println!();
}
