//! Timestamped logging of BLE operations to disk.
//!
//! Each session produces a human-readable `.log` file and a structured
//! `.json` twin under the log directory. The logger is a sink attached by
//! the interactive session and one-shot commands; the audit engine never
//! logs packets itself.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use data_encoding::HEXLOWER;
use serde::Serialize;

use crate::errors::BlescopeError;

#[derive(Debug, Clone, Serialize)]
pub struct PacketEntry {
    pub timestamp: String,
    pub direction: String,
    pub operation: String,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hex: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogSummary {
    pub total_packets: usize,
    pub operations: BTreeMap<String, usize>,
    pub log_file: PathBuf,
    pub json_file: PathBuf,
}

pub struct PacketLogger {
    address: String,
    log_file: PathBuf,
    json_file: PathBuf,
    file: File,
    entries: Vec<PacketEntry>,
}

impl PacketLogger {
    pub fn new(address: &str, log_dir: &Path) -> Result<Self, BlescopeError> {
        std::fs::create_dir_all(log_dir)?;
        let slug = address.replace(':', "-");
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let log_file = log_dir.join(format!("{slug}_{stamp}.log"));
        let json_file = log_dir.join(format!("{slug}_{stamp}.json"));

        let mut file = File::create(&log_file)?;
        let bar = "=".repeat(70);
        writeln!(file, "{bar}")?;
        writeln!(file, "  BLE Packet Log")?;
        writeln!(file, "  Device:  {slug}")?;
        writeln!(file, "  Started: {}", Local::now().to_rfc3339())?;
        writeln!(file, "{bar}")?;
        file.flush()?;

        Ok(Self {
            address: slug,
            log_file,
            json_file,
            file,
            entries: Vec::new(),
        })
    }

    fn log(
        &mut self,
        direction: &str,
        operation: &str,
        detail: String,
        raw: Option<&[u8]>,
    ) -> Result<(), BlescopeError> {
        let clock = Local::now().format("%H:%M:%S%.3f");
        writeln!(self.file, "[{clock}] {direction} {operation:12} | {detail}")?;
        self.file.flush()?;

        self.entries.push(PacketEntry {
            timestamp: Local::now().to_rfc3339(),
            direction: direction.to_string(),
            operation: operation.to_string(),
            detail,
            hex: raw.map(|d| HEXLOWER.encode(d)),
            length: raw.map(|d| d.len()),
            text: raw.map(|d| String::from_utf8_lossy(d).into_owned()),
        });
        Ok(())
    }

    fn payload_detail(char_uuid: &str, data: &[u8]) -> String {
        let hex = if data.is_empty() {
            "(empty)".to_string()
        } else {
            HEXLOWER.encode(data)
        };
        let mut detail = format!("Char: {char_uuid}  Data[{}]: {hex}", data.len());
        let text = String::from_utf8_lossy(data);
        if !text.is_empty() && text.chars().all(|c| !c.is_control()) {
            detail.push_str(&format!("  ({text})"));
        }
        detail
    }

    pub fn log_connect(&mut self, address: &str) -> Result<(), BlescopeError> {
        self.log("-->", "CONNECT", format!("Address: {address}"), None)
    }

    pub fn log_disconnect(&mut self) -> Result<(), BlescopeError> {
        let detail = format!("Device: {}", self.address);
        self.log("<--", "DISCONNECT", detail, None)
    }

    pub fn log_scan(&mut self, device_count: usize) -> Result<(), BlescopeError> {
        self.log("...", "SCAN", format!("Found {device_count} device(s)"), None)
    }

    pub fn log_services(
        &mut self,
        service_count: usize,
        char_count: usize,
    ) -> Result<(), BlescopeError> {
        let detail = format!("{service_count} services, {char_count} characteristics");
        self.log("<--", "SERVICES", detail, None)
    }

    pub fn log_read(&mut self, char_uuid: &str, data: &[u8]) -> Result<(), BlescopeError> {
        self.log("<--", "READ", Self::payload_detail(char_uuid, data), Some(data))
    }

    pub fn log_write(&mut self, char_uuid: &str, data: &[u8]) -> Result<(), BlescopeError> {
        self.log("-->", "WRITE", Self::payload_detail(char_uuid, data), Some(data))
    }

    pub fn log_notify(&mut self, char_uuid: &str, data: &[u8]) -> Result<(), BlescopeError> {
        self.log("<==", "NOTIFY", Self::payload_detail(char_uuid, data), Some(data))
    }

    pub fn log_error(&mut self, operation: &str, error: &str) -> Result<(), BlescopeError> {
        self.log("!! ", "ERROR", format!("{operation}: {error}"), None)
    }

    pub fn log_info(&mut self, message: &str) -> Result<(), BlescopeError> {
        self.log("   ", "INFO", message.to_string(), None)
    }

    pub fn summary(&self) -> LogSummary {
        let mut operations = BTreeMap::new();
        for entry in &self.entries {
            *operations.entry(entry.operation.clone()).or_insert(0) += 1;
        }
        LogSummary {
            total_packets: self.entries.len(),
            operations,
            log_file: self.log_file.clone(),
            json_file: self.json_file.clone(),
        }
    }

    /// Flush the text log and write the structured JSON twin.
    pub fn close(mut self) -> Result<LogSummary, BlescopeError> {
        self.file.flush()?;
        let summary = self.summary();
        let document = serde_json::json!({
            "device": self.address,
            "session_start": self.entries.first().map(|e| e.timestamp.clone()),
            "session_end": Local::now().to_rfc3339(),
            "total_packets": self.entries.len(),
            "packets": self.entries,
        });
        std::fs::write(&self.json_file, serde_json::to_string_pretty(&document)?)?;
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn logs_operations_and_counts_them() {
        let dir = TempDir::new().unwrap();
        let mut logger = PacketLogger::new("AA:BB:CC:DD:EE:FF", dir.path()).unwrap();
        logger.log_connect("AA:BB:CC:DD:EE:FF").unwrap();
        logger.log_read("2a19", &[0x64]).unwrap();
        logger.log_read("2a00", b"widget").unwrap();
        logger.log_write("2a00", b"hello").unwrap();
        logger.log_disconnect().unwrap();

        let summary = logger.summary();
        assert_eq!(summary.total_packets, 5);
        assert_eq!(summary.operations["READ"], 2);
        assert_eq!(summary.operations["WRITE"], 1);

        let text = std::fs::read_to_string(&summary.log_file).unwrap();
        assert!(text.contains("BLE Packet Log"));
        assert!(text.contains("Data[1]: 64"));
        assert!(text.contains("(widget)"));
    }

    #[test]
    fn close_writes_structured_json() {
        let dir = TempDir::new().unwrap();
        let mut logger = PacketLogger::new("AA:BB:CC:DD:EE:FF", dir.path()).unwrap();
        logger.log_notify("2a37", &[0x00, 0x48]).unwrap();
        let summary = logger.close().unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&summary.json_file).unwrap()).unwrap();
        assert_eq!(json["device"], "AA-BB-CC-DD-EE-FF");
        assert_eq!(json["total_packets"], 1);
        assert_eq!(json["packets"][0]["operation"], "NOTIFY");
        assert_eq!(json["packets"][0]["hex"], "0048");
        assert_eq!(json["packets"][0]["length"], 2);
    }

    #[test]
    fn filenames_use_address_slug() {
        let dir = TempDir::new().unwrap();
        let logger = PacketLogger::new("AA:BB:CC:DD:EE:FF", dir.path()).unwrap();
        let summary = logger.summary();
        let name = summary.log_file.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("AA-BB-CC-DD-EE-FF_"));
        assert!(name.ends_with(".log"));
    }
}
