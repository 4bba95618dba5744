//! Production [`BleAdapter`] backed by btleplug.

use std::time::Duration;

use async_trait::async_trait;
use btleplug::api::{
    Central, CentralEvent, CharPropFlags, Characteristic, Manager as _, Peripheral as _,
    ScanFilter, WriteType,
};
use btleplug::platform::{Adapter, Manager, Peripheral};
use futures::StreamExt;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::errors::BlescopeError;

use super::adapter::{BleAdapter, BleConnection};
use super::types::{Advertisement, CharProps, CharacteristicInfo, FoundDevice, ServiceInfo};

/// Stops the scan when dropped, so an early return or a cancelled future
/// never leaks an active scanner.
struct ScanGuard {
    adapter: Adapter,
    armed: bool,
}

impl ScanGuard {
    fn new(adapter: Adapter) -> Self {
        Self {
            adapter,
            armed: true,
        }
    }

    /// The caller stopped the scan itself; skip the drop-time stop.
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for ScanGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let adapter = self.adapter.clone();
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                if let Err(e) = adapter.stop_scan().await {
                    debug!(error = %e, "Failed to stop leaked scan");
                }
            });
        }
    }
}

pub struct BtleplugAdapter {
    adapter: Adapter,
}

impl BtleplugAdapter {
    /// Open the first Bluetooth adapter on the system.
    pub async fn new() -> Result<Self, BlescopeError> {
        let manager = Manager::new().await?;
        let adapter = manager
            .adapters()
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                BlescopeError::NoAdapter("no Bluetooth adapters present on this host".into())
            })?;
        Ok(Self { adapter })
    }

    async fn lookup(&self, address: &str) -> Result<Option<Peripheral>, BlescopeError> {
        for p in self.adapter.peripherals().await? {
            if peripheral_matches(&p, address) {
                return Ok(Some(p));
            }
        }
        Ok(None)
    }

    /// Find a peripheral by address, scanning until it shows up. The caller
    /// bounds this with a timeout; the guard stops the scan either way.
    async fn find_peripheral(&self, address: &str) -> Result<Peripheral, BlescopeError> {
        if let Some(p) = self.lookup(address).await? {
            return Ok(p);
        }
        self.adapter.start_scan(ScanFilter::default()).await?;
        let mut guard = ScanGuard::new(self.adapter.clone());
        let peripheral = loop {
            tokio::time::sleep(Duration::from_millis(250)).await;
            if let Some(p) = self.lookup(address).await? {
                break p;
            }
        };
        let _ = self.adapter.stop_scan().await;
        guard.disarm();
        Ok(peripheral)
    }

    async fn advertisement_for(&self, id: &btleplug::platform::PeripheralId) -> Option<Advertisement> {
        let peripheral = self.adapter.peripheral(id).await.ok()?;
        let props = peripheral.properties().await.ok()??;
        Some(Advertisement {
            address: peripheral_address(&peripheral),
            name: props.local_name,
            rssi: props.rssi,
            tx_power: props.tx_power_level,
            service_uuids: props.services.iter().map(|u| u.to_string()).collect(),
            manufacturer_ids: props.manufacturer_data.keys().copied().collect(),
        })
    }
}

#[async_trait]
impl BleAdapter for BtleplugAdapter {
    async fn discover(&self, duration: Duration) -> Result<Vec<FoundDevice>, BlescopeError> {
        self.adapter.start_scan(ScanFilter::default()).await?;
        let mut guard = ScanGuard::new(self.adapter.clone());
        tokio::time::sleep(duration).await;
        let _ = self.adapter.stop_scan().await;
        guard.disarm();

        let mut devices = Vec::new();
        for p in self.adapter.peripherals().await? {
            let props = p.properties().await.ok().flatten();
            devices.push(FoundDevice {
                address: peripheral_address(&p),
                name: props.as_ref().and_then(|pr| pr.local_name.clone()),
                rssi: props.as_ref().and_then(|pr| pr.rssi),
            });
        }
        Ok(devices)
    }

    async fn collect_advertisements(
        &self,
        address_filter: Option<&str>,
        duration: Duration,
    ) -> Result<Vec<Advertisement>, BlescopeError> {
        // Subscribe before scanning so the first events are not missed.
        let mut events = self.adapter.events().await?;
        self.adapter.start_scan(ScanFilter::default()).await?;
        let mut guard = ScanGuard::new(self.adapter.clone());

        let deadline = tokio::time::sleep(duration);
        tokio::pin!(deadline);

        let mut collected = Vec::new();
        loop {
            tokio::select! {
                _ = &mut deadline => break,
                event = events.next() => {
                    let Some(event) = event else { break };
                    let id = match &event {
                        CentralEvent::DeviceDiscovered(id)
                        | CentralEvent::DeviceUpdated(id)
                        | CentralEvent::ManufacturerDataAdvertisement { id, .. }
                        | CentralEvent::ServiceDataAdvertisement { id, .. }
                        | CentralEvent::ServicesAdvertisement { id, .. } => id.clone(),
                        _ => continue,
                    };
                    let Some(ad) = self.advertisement_for(&id).await else { continue };
                    if let Some(filter) = address_filter {
                        if !ad.address.eq_ignore_ascii_case(filter) {
                            continue;
                        }
                    }
                    collected.push(ad);
                }
            }
        }

        let _ = self.adapter.stop_scan().await;
        guard.disarm();
        Ok(collected)
    }

    async fn stream_advertisements(
        &self,
    ) -> Result<mpsc::Receiver<Advertisement>, BlescopeError> {
        let mut events = self.adapter.events().await?;
        self.adapter.start_scan(ScanFilter::default()).await?;

        let (tx, rx) = mpsc::channel(64);
        let adapter = self.adapter.clone();
        let feeder = BtleplugAdapter {
            adapter: adapter.clone(),
        };
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = tx.closed() => break,
                    event = events.next() => {
                        let Some(event) = event else { break };
                        let id = match &event {
                            CentralEvent::DeviceDiscovered(id)
                            | CentralEvent::DeviceUpdated(id)
                            | CentralEvent::ManufacturerDataAdvertisement { id, .. }
                            | CentralEvent::ServiceDataAdvertisement { id, .. }
                            | CentralEvent::ServicesAdvertisement { id, .. } => id.clone(),
                            _ => continue,
                        };
                        let Some(ad) = feeder.advertisement_for(&id).await else { continue };
                        if tx.send(ad).await.is_err() {
                            break;
                        }
                    }
                }
            }
            if let Err(e) = adapter.stop_scan().await {
                debug!(error = %e, "Failed to stop advertisement stream scan");
            }
        });
        Ok(rx)
    }

    async fn connect(
        &self,
        address: &str,
        timeout: Duration,
    ) -> Result<Box<dyn BleConnection>, BlescopeError> {
        let connected = tokio::time::timeout(timeout, async {
            let peripheral = self.find_peripheral(address).await?;
            peripheral.connect().await?;
            if let Err(e) = peripheral.discover_services().await {
                // The link is up; enumeration is retried by callers.
                warn!(error = %e, "Service discovery failed during connect");
            }
            Ok::<_, BlescopeError>(peripheral)
        })
        .await
        .map_err(|_| {
            BlescopeError::Timeout(format!(
                "connection to {address} timed out after {:.1}s",
                timeout.as_secs_f64()
            ))
        })??;

        Ok(Box::new(BtleplugConnection {
            peripheral: connected,
        }))
    }
}

pub struct BtleplugConnection {
    peripheral: Peripheral,
}

/// A cancelled audit or session future must not leave the link up.
impl Drop for BtleplugConnection {
    fn drop(&mut self) {
        let peripheral = self.peripheral.clone();
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                if peripheral.is_connected().await.unwrap_or(false) {
                    let _ = peripheral.disconnect().await;
                }
            });
        }
    }
}

impl BtleplugConnection {
    fn find_characteristic(&self, uuid: &str) -> Result<Characteristic, BlescopeError> {
        let wanted = normalize_uuid(uuid);
        for service in self.peripheral.services() {
            for characteristic in &service.characteristics {
                if characteristic.uuid.to_string().eq_ignore_ascii_case(&wanted) {
                    return Ok(characteristic.clone());
                }
            }
        }
        Err(BlescopeError::CharacteristicNotFound(uuid.to_string()))
    }
}

#[async_trait]
impl BleConnection for BtleplugConnection {
    async fn enumerate(&self) -> Result<Vec<ServiceInfo>, BlescopeError> {
        let mut services = Vec::new();
        for service in self.peripheral.services() {
            let mut characteristics = Vec::new();
            for c in &service.characteristics {
                characteristics.push(CharacteristicInfo {
                    uuid: c.uuid.to_string(),
                    properties: props_from_flags(c.properties),
                    descriptors: c.descriptors.iter().map(|d| d.uuid.to_string()).collect(),
                });
            }
            services.push(ServiceInfo {
                uuid: service.uuid.to_string(),
                characteristics,
            });
        }
        Ok(services)
    }

    async fn read(&self, characteristic: &str) -> Result<Vec<u8>, BlescopeError> {
        let c = self.find_characteristic(characteristic)?;
        Ok(self.peripheral.read(&c).await?)
    }

    async fn write(&self, characteristic: &str, payload: &[u8]) -> Result<(), BlescopeError> {
        let c = self.find_characteristic(characteristic)?;
        let write_type = if c.properties.contains(CharPropFlags::WRITE) {
            WriteType::WithResponse
        } else {
            WriteType::WithoutResponse
        };
        Ok(self.peripheral.write(&c, payload, write_type).await?)
    }

    async fn subscribe(
        &self,
        characteristic: &str,
    ) -> Result<mpsc::Receiver<Vec<u8>>, BlescopeError> {
        let c = self.find_characteristic(characteristic)?;
        self.peripheral.subscribe(&c).await?;
        let mut notifications = self.peripheral.notifications().await?;

        let (tx, rx) = mpsc::channel(64);
        let uuid = c.uuid;
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = tx.closed() => break,
                    n = notifications.next() => {
                        let Some(n) = n else { break };
                        if n.uuid == uuid && tx.send(n.value).await.is_err() {
                            break;
                        }
                    }
                }
            }
        });
        Ok(rx)
    }

    async fn unsubscribe(&self, characteristic: &str) -> Result<(), BlescopeError> {
        let c = self.find_characteristic(characteristic)?;
        Ok(self.peripheral.unsubscribe(&c).await?)
    }

    async fn disconnect(&self) -> Result<(), BlescopeError> {
        if self.peripheral.is_connected().await.unwrap_or(false) {
            self.peripheral.disconnect().await?;
        }
        Ok(())
    }
}

fn peripheral_matches(p: &Peripheral, address: &str) -> bool {
    p.address().to_string().eq_ignore_ascii_case(address)
        || p.id().to_string().eq_ignore_ascii_case(address)
}

/// Stable address string for a peripheral. macOS reports an all-zero MAC,
/// so fall back to the platform peripheral id there.
fn peripheral_address(p: &Peripheral) -> String {
    let address = p.address().to_string();
    if address == "00:00:00:00:00:00" {
        p.id().to_string()
    } else {
        address
    }
}

/// Accept bare 16-bit hex by expanding it to the Bluetooth Base form.
fn normalize_uuid(uuid: &str) -> String {
    let uuid = uuid.trim().to_lowercase();
    if uuid.len() == 4 && uuid.chars().all(|c| c.is_ascii_hexdigit()) {
        format!("0000{uuid}-0000-1000-8000-00805f9b34fb")
    } else {
        uuid
    }
}

fn props_from_flags(flags: CharPropFlags) -> CharProps {
    CharProps {
        read: flags.contains(CharPropFlags::READ),
        write: flags.contains(CharPropFlags::WRITE),
        write_without_response: flags.contains(CharPropFlags::WRITE_WITHOUT_RESPONSE),
        notify: flags.contains(CharPropFlags::NOTIFY),
        indicate: flags.contains(CharPropFlags::INDICATE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_expands_short_uuids() {
        assert_eq!(
            normalize_uuid("2A19"),
            "00002a19-0000-1000-8000-00805f9b34fb"
        );
        assert_eq!(
            normalize_uuid("6E400002-B5A3-F393-E0A9-E50E24DCCA9E"),
            "6e400002-b5a3-f393-e0a9-e50e24dcca9e"
        );
    }

    #[test]
    fn props_map_from_flags() {
        let flags = CharPropFlags::READ | CharPropFlags::NOTIFY;
        let props = props_from_flags(flags);
        assert!(props.read && props.notify);
        assert!(!props.writable());
    }
}
