use serde::{Deserialize, Serialize};

/// A peripheral seen during discovery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoundDevice {
    pub address: String,
    pub name: Option<String>,
    pub rssi: Option<i16>,
}

/// One advertisement event, flattened from the platform's broadcast data.
#[derive(Debug, Clone)]
pub struct Advertisement {
    pub address: String,
    pub name: Option<String>,
    pub rssi: Option<i16>,
    pub tx_power: Option<i16>,
    pub service_uuids: Vec<String>,
    /// Company identifiers present in manufacturer-specific data.
    pub manufacturer_ids: Vec<u16>,
}

/// Capability flags advertised by a characteristic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharProps {
    pub read: bool,
    pub write: bool,
    pub write_without_response: bool,
    pub notify: bool,
    pub indicate: bool,
}

impl CharProps {
    /// Either write mode.
    pub fn writable(&self) -> bool {
        self.write || self.write_without_response
    }

    /// Notify or indicate.
    pub fn subscribable(&self) -> bool {
        self.notify || self.indicate
    }

    pub fn labels(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.read {
            out.push("read");
        }
        if self.write {
            out.push("write");
        }
        if self.write_without_response {
            out.push("write-without-response");
        }
        if self.notify {
            out.push("notify");
        }
        if self.indicate {
            out.push("indicate");
        }
        out
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacteristicInfo {
    pub uuid: String,
    pub properties: CharProps,
    pub descriptors: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub uuid: String,
    pub characteristics: Vec<CharacteristicInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writable_covers_both_write_modes() {
        let wwr = CharProps {
            write_without_response: true,
            ..Default::default()
        };
        let w = CharProps {
            write: true,
            ..Default::default()
        };
        assert!(wwr.writable());
        assert!(w.writable());
        assert!(!CharProps::default().writable());
    }

    #[test]
    fn subscribable_covers_notify_and_indicate() {
        let n = CharProps {
            notify: true,
            ..Default::default()
        };
        let i = CharProps {
            indicate: true,
            ..Default::default()
        };
        assert!(n.subscribable());
        assert!(i.subscribable());
    }

    #[test]
    fn labels_follow_flag_order() {
        let props = CharProps {
            read: true,
            notify: true,
            ..Default::default()
        };
        assert_eq!(props.labels(), vec!["read", "notify"]);
    }
}
