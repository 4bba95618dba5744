//! In-memory BLE adapter for exercising the audit engine and API without
//! hardware.

#![allow(dead_code)]

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use blescope::ble::{
    Advertisement, BleAdapter, BleConnection, CharProps, CharacteristicInfo, FoundDevice,
    ServiceInfo,
};
use blescope::errors::BlescopeError;

#[derive(Default, Clone)]
pub struct FakeAdapter {
    pub advertisements: Vec<Advertisement>,
    /// Simulate a device that requires pairing before any connection.
    pub refuse_connect: bool,
    pub services: Vec<ServiceInfo>,
    /// Values returned by reads, keyed by full characteristic UUID. A
    /// readable characteristic missing here refuses the read.
    pub char_values: HashMap<String, Vec<u8>>,
}

#[async_trait]
impl BleAdapter for FakeAdapter {
    async fn discover(&self, _duration: Duration) -> Result<Vec<FoundDevice>, BlescopeError> {
        let mut seen = Vec::new();
        let mut devices = Vec::new();
        for ad in &self.advertisements {
            if seen.contains(&ad.address) {
                continue;
            }
            seen.push(ad.address.clone());
            devices.push(FoundDevice {
                address: ad.address.clone(),
                name: ad.name.clone(),
                rssi: ad.rssi,
            });
        }
        Ok(devices)
    }

    async fn collect_advertisements(
        &self,
        address_filter: Option<&str>,
        _duration: Duration,
    ) -> Result<Vec<Advertisement>, BlescopeError> {
        Ok(self
            .advertisements
            .iter()
            .filter(|ad| match address_filter {
                Some(filter) => ad.address.eq_ignore_ascii_case(filter),
                None => true,
            })
            .cloned()
            .collect())
    }

    async fn stream_advertisements(
        &self,
    ) -> Result<mpsc::Receiver<Advertisement>, BlescopeError> {
        let (tx, rx) = mpsc::channel(64);
        let ads = self.advertisements.clone();
        tokio::spawn(async move {
            for ad in ads {
                if tx.send(ad).await.is_err() {
                    break;
                }
            }
        });
        Ok(rx)
    }

    async fn connect(
        &self,
        _address: &str,
        _timeout: Duration,
    ) -> Result<Box<dyn BleConnection>, BlescopeError> {
        if self.refuse_connect {
            return Err(BlescopeError::Connection(
                "connection refused (pairing required)".into(),
            ));
        }
        Ok(Box::new(FakeConnection {
            services: self.services.clone(),
            values: self.char_values.clone(),
        }))
    }
}

pub struct FakeConnection {
    services: Vec<ServiceInfo>,
    values: HashMap<String, Vec<u8>>,
}

#[async_trait]
impl BleConnection for FakeConnection {
    async fn enumerate(&self) -> Result<Vec<ServiceInfo>, BlescopeError> {
        Ok(self.services.clone())
    }

    async fn read(&self, characteristic: &str) -> Result<Vec<u8>, BlescopeError> {
        self.values
            .get(characteristic)
            .cloned()
            .ok_or_else(|| BlescopeError::Bluetooth("read not permitted".into()))
    }

    async fn write(&self, _characteristic: &str, _payload: &[u8]) -> Result<(), BlescopeError> {
        Ok(())
    }

    async fn subscribe(
        &self,
        _characteristic: &str,
    ) -> Result<mpsc::Receiver<Vec<u8>>, BlescopeError> {
        let (_tx, rx) = mpsc::channel(1);
        Ok(rx)
    }

    async fn unsubscribe(&self, _characteristic: &str) -> Result<(), BlescopeError> {
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), BlescopeError> {
        Ok(())
    }
}

pub const TARGET: &str = "AA:BB:CC:DD:EE:FF";

pub fn base_uuid(short: &str) -> String {
    format!("0000{short}-0000-1000-8000-00805f9b34fb")
}

pub fn service(short: &str, characteristics: Vec<CharacteristicInfo>) -> ServiceInfo {
    ServiceInfo {
        uuid: base_uuid(short),
        characteristics,
    }
}

pub fn characteristic(short: &str, properties: CharProps) -> CharacteristicInfo {
    CharacteristicInfo {
        uuid: base_uuid(short),
        properties,
        descriptors: Vec::new(),
    }
}

pub fn readable() -> CharProps {
    CharProps {
        read: true,
        ..Default::default()
    }
}

pub fn writable() -> CharProps {
    CharProps {
        write: true,
        ..Default::default()
    }
}

pub fn write_without_response() -> CharProps {
    CharProps {
        write_without_response: true,
        ..Default::default()
    }
}

pub fn notifying() -> CharProps {
    CharProps {
        notify: true,
        ..Default::default()
    }
}

pub fn indicating() -> CharProps {
    CharProps {
        indicate: true,
        ..Default::default()
    }
}

pub fn advertisement(address: &str) -> Advertisement {
    Advertisement {
        address: address.to_string(),
        name: None,
        rssi: Some(-60),
        tx_power: None,
        service_uuids: Vec::new(),
        manufacturer_ids: Vec::new(),
    }
}
