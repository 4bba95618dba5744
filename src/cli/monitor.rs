use std::time::Duration;

use console::style;
use tokio_util::sync::CancellationToken;

use crate::ble::BtleplugAdapter;
use crate::cli::commands::MonitorArgs;
use crate::config::BlescopeConfig;
use crate::errors::BlescopeError;
use crate::monitor::RssiMonitor;

pub async fn handle_monitor(
    args: MonitorArgs,
    _config: &BlescopeConfig,
) -> Result<(), BlescopeError> {
    let adapter = BtleplugAdapter::new().await?;

    println!("{}", style("Starting BLE Signal Monitor...").cyan().bold());
    println!(
        "{}",
        style("Scanning for BLE advertisements. Press Ctrl+C to stop.").dim()
    );

    let cancel = CancellationToken::new();
    let ctrl_c_cancel = cancel.clone();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        ctrl_c_cancel.cancel();
    });

    let mut monitor = RssiMonitor::new();
    monitor
        .run(&adapter, Duration::from_secs_f64(args.duration), cancel)
        .await?;

    println!(
        "\n{}",
        style(format!(
            "Stopped. Tracked {} device(s), {} packets.",
            monitor.device_count(),
            monitor.packet_count
        ))
        .yellow()
    );
    Ok(())
}
