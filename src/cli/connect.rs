use crate::ble::BtleplugAdapter;
use crate::cli::commands::ConnectArgs;
use crate::config::BlescopeConfig;
use crate::errors::BlescopeError;
use crate::session;

pub async fn handle_connect(
    args: ConnectArgs,
    config: &BlescopeConfig,
) -> Result<(), BlescopeError> {
    let adapter = BtleplugAdapter::new().await?;
    session::run(&adapter, &args.address, config).await
}
