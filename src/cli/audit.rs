use std::sync::Arc;
use std::time::Duration;

use console::style;
use tokio::sync::mpsc;

use crate::audit::{AuditEvent, SecurityAuditor, PHASES};
use crate::ble::{BleAdapter, BtleplugAdapter};
use crate::cli::commands::AuditArgs;
use crate::config::BlescopeConfig;
use crate::errors::BlescopeError;
use crate::models::Severity;
use crate::reporting::{print_report, write_report};

pub async fn handle_audit(args: AuditArgs, config: &BlescopeConfig) -> Result<(), BlescopeError> {
    let adapter = Arc::new(BtleplugAdapter::new().await?);

    let address = match args.address {
        Some(address) => address,
        None => match pick_target(adapter.as_ref(), config).await? {
            Some(address) => address,
            None => return Ok(()),
        },
    };

    println!();
    println!("{}", style("Starting BLE Security Audit").red().bold());
    println!("{} {address}", style("Target:").bold());
    println!();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            render_event(&event);
        }
    });

    let timeout =
        Duration::from_secs_f64(args.timeout.unwrap_or(config.scan.connect_timeout_secs));
    let auditor = SecurityAuditor::new(adapter).with_event_channel(tx);
    let report = auditor.audit(&address, timeout).await;
    drop(auditor);
    let _ = printer.await;

    print_report(&report);

    if args.export {
        let path = write_report(&report, &config.logging.log_dir)?;
        println!("{}", style(format!("Report exported: {}", path.display())).dim());
    }
    Ok(())
}

async fn pick_target(
    adapter: &dyn BleAdapter,
    config: &BlescopeConfig,
) -> Result<Option<String>, BlescopeError> {
    let duration = Duration::from_secs_f64(config.scan.duration_secs);
    let spinner = super::scan::scan_spinner("Scanning for devices to audit...");
    let devices = adapter.discover(duration).await?;
    spinner.finish_and_clear();

    if devices.is_empty() {
        println!("{}", style("No devices found").yellow());
        return Ok(None);
    }
    super::print_device_list(&devices);
    Ok(super::prompt_selection(devices.len())?.map(|i| devices[i].address.clone()))
}

fn render_event(event: &AuditEvent) {
    match event {
        AuditEvent::PhaseStarted {
            index,
            display_name,
        } => {
            println!(
                "{} [{}/{}] {}",
                style("---").cyan().bold(),
                index + 1,
                PHASES.len(),
                style(display_name).cyan().bold(),
            );
        }
        AuditEvent::FindingDiscovered { title, severity } => {
            let sev = match severity {
                Severity::Critical => style(severity.label()).red().bold(),
                Severity::High => style(severity.label()).red(),
                Severity::Medium => style(severity.label()).yellow(),
                Severity::Low => style(severity.label()).cyan(),
                Severity::Info => style(severity.label()).dim(),
            };
            println!("  {} [{sev}] {title}", style("!").yellow());
        }
        AuditEvent::Completed { score, grade } => {
            println!(
                "  {} Audit complete: score {score:.1}/10, grade {grade}",
                style("✔").green(),
            );
        }
    }
}
