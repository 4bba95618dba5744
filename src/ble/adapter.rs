use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::errors::BlescopeError;

use super::types::{Advertisement, FoundDevice, ServiceInfo};

/// Capabilities the toolkit needs from a BLE central.
///
/// The production implementation is [`super::BtleplugAdapter`]; tests drive
/// the audit engine and the API against an in-memory fake.
#[async_trait]
pub trait BleAdapter: Send + Sync {
    /// Scan for `duration` and return every peripheral seen.
    async fn discover(&self, duration: Duration) -> Result<Vec<FoundDevice>, BlescopeError>;

    /// Collect advertisement events for `duration`, then stop the scanner.
    ///
    /// With `address_filter` set, only events from that address (matched
    /// case-insensitively) are returned. The scanner is stopped on every
    /// exit path, including cancellation of the returned future.
    async fn collect_advertisements(
        &self,
        address_filter: Option<&str>,
        duration: Duration,
    ) -> Result<Vec<Advertisement>, BlescopeError>;

    /// Start a continuous advertisement feed. Dropping the receiver stops
    /// the underlying scan.
    async fn stream_advertisements(
        &self,
    ) -> Result<mpsc::Receiver<Advertisement>, BlescopeError>;

    /// Connect to a peripheral by address without initiating pairing.
    async fn connect(
        &self,
        address: &str,
        timeout: Duration,
    ) -> Result<Box<dyn BleConnection>, BlescopeError>;
}

/// An open GATT connection.
#[async_trait]
pub trait BleConnection: Send + Sync {
    /// Walk the attribute table: services in discovery order, each with its
    /// characteristics and descriptor UUIDs.
    async fn enumerate(&self) -> Result<Vec<ServiceInfo>, BlescopeError>;

    async fn read(&self, characteristic: &str) -> Result<Vec<u8>, BlescopeError>;

    async fn write(&self, characteristic: &str, payload: &[u8]) -> Result<(), BlescopeError>;

    /// Subscribe to notifications/indications; values arrive on the returned
    /// channel until `unsubscribe` or disconnect.
    async fn subscribe(
        &self,
        characteristic: &str,
    ) -> Result<mpsc::Receiver<Vec<u8>>, BlescopeError>;

    async fn unsubscribe(&self, characteristic: &str) -> Result<(), BlescopeError>;

    /// Best-effort, idempotent.
    async fn disconnect(&self) -> Result<(), BlescopeError>;
}
