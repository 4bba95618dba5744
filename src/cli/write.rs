use std::time::Duration;

use console::style;

use crate::ble::{BleAdapter, BtleplugAdapter};
use crate::cli::commands::WriteArgs;
use crate::config::BlescopeConfig;
use crate::errors::BlescopeError;

pub async fn handle_write(args: WriteArgs, config: &BlescopeConfig) -> Result<(), BlescopeError> {
    let adapter = BtleplugAdapter::new().await?;
    let timeout = Duration::from_secs_f64(config.scan.connect_timeout_secs);

    println!("Writing to {} on {}...", args.characteristic, args.address);
    let connection = adapter.connect(&args.address, timeout).await?;
    let result = connection
        .write(&args.characteristic, args.message.as_bytes())
        .await;
    let _ = connection.disconnect().await;
    result?;

    println!("{} Write successful", style("✔").green());
    Ok(())
}
