use std::sync::Arc;

use console::style;

use crate::api::{self, AppState};
use crate::ble::{BleAdapter, BtleplugAdapter};
use crate::cli::commands::ServeArgs;
use crate::config::BlescopeConfig;
use crate::errors::BlescopeError;

pub async fn handle_serve(args: ServeArgs, config: &BlescopeConfig) -> Result<(), BlescopeError> {
    let adapter: Arc<dyn BleAdapter> = Arc::new(BtleplugAdapter::new().await?);
    let state = AppState::new(adapter);

    let host = args.host.unwrap_or_else(|| config.dashboard.host.clone());
    let port = args.port.unwrap_or(config.dashboard.port);

    println!("{}", style("BLE Web Dashboard").cyan().bold());
    println!(
        "  {} {}",
        style("API base:").dim(),
        style(format!("http://{host}:{port}/api")).bold()
    );

    api::serve(state, &host, port).await
}
