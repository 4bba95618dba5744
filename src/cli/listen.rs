use std::time::Duration;

use console::style;
use data_encoding::HEXLOWER;

use crate::ble::{BleAdapter, BtleplugAdapter};
use crate::cli::commands::ListenArgs;
use crate::config::BlescopeConfig;
use crate::errors::BlescopeError;

pub async fn handle_listen(args: ListenArgs, config: &BlescopeConfig) -> Result<(), BlescopeError> {
    let adapter = BtleplugAdapter::new().await?;
    let timeout = Duration::from_secs_f64(config.scan.connect_timeout_secs);

    println!(
        "Listening on {} of {}. Press Ctrl+C to stop.",
        args.characteristic, args.address
    );
    let connection = adapter.connect(&args.address, timeout).await?;
    let mut rx = match connection.subscribe(&args.characteristic).await {
        Ok(rx) => rx,
        Err(e) => {
            let _ = connection.disconnect().await;
            return Err(e);
        }
    };

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            value = rx.recv() => {
                let Some(value) = value else { break };
                println!(
                    "{} hex={}  text={}",
                    style("→").blue(),
                    HEXLOWER.encode(&value),
                    String::from_utf8_lossy(&value)
                );
            }
        }
    }

    let _ = connection.unsubscribe(&args.characteristic).await;
    let _ = connection.disconnect().await;
    println!("{} Stopped & Disconnected", style("✔").yellow());
    Ok(())
}
