use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::ble::{BleAdapter, BtleplugAdapter};
use crate::cli::commands::ScanArgs;
use crate::config::BlescopeConfig;
use crate::errors::BlescopeError;
use crate::session;

pub async fn handle_scan(args: ScanArgs, config: &BlescopeConfig) -> Result<(), BlescopeError> {
    let adapter = BtleplugAdapter::new().await?;
    let duration = Duration::from_secs_f64(args.timeout.unwrap_or(config.scan.duration_secs));

    let spinner = scan_spinner(&format!(
        "Scanning for devices ({:.0}s)...",
        duration.as_secs_f64()
    ));
    let devices = adapter.discover(duration).await?;
    spinner.finish_and_clear();

    if devices.is_empty() {
        println!("{}", style("No devices found").yellow());
        return Ok(());
    }

    println!("{}", style(format!("Found {} device(s):", devices.len())).cyan().bold());
    super::print_device_list(&devices);

    if let Some(index) = super::prompt_selection(devices.len())? {
        session::run(&adapter, &devices[index].address, config).await?;
    }
    Ok(())
}

pub(crate) fn scan_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("  {spinner:.cyan} {msg}")
            .unwrap(),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(std::time::Duration::from_millis(120));
    spinner
}
