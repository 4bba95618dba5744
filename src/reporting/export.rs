//! Flat JSON export of a finished audit report.
//!
//! The document shape below is the contract consumed by file export and the
//! web API; field names and nesting must stay stable.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::BlescopeError;
use crate::models::{AuditReport, Finding};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceIdentity {
    pub address: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeStats {
    pub total_services: usize,
    pub total_characteristics: usize,
    pub readable: usize,
    pub writable: usize,
    pub notify: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportDocument {
    pub device: DeviceIdentity,
    pub timestamp: String,
    pub score: f64,
    pub grade: String,
    pub connection_no_auth: bool,
    pub stats: AttributeStats,
    pub findings: Vec<Finding>,
    pub exposed_data: BTreeMap<String, String>,
}

impl ReportDocument {
    pub fn from_report(report: &AuditReport) -> Self {
        Self {
            device: DeviceIdentity {
                address: report.device_address.clone(),
                name: report.device_name.clone(),
            },
            timestamp: report.timestamp.clone(),
            score: round_score(report.score),
            grade: report.grade.clone(),
            connection_no_auth: report.connection_no_auth,
            stats: AttributeStats {
                total_services: report.total_services,
                total_characteristics: report.total_characteristics,
                readable: report.readable_chars,
                writable: report.writable_chars,
                notify: report.notify_chars,
            },
            findings: report.findings.clone(),
            exposed_data: report.exposed_data.clone(),
        }
    }
}

/// One decimal place, matching the displayed score.
fn round_score(score: f64) -> f64 {
    (score * 10.0).round() / 10.0
}

/// Write the report document to `<dir>/audit_<address>_<date>.json` and
/// return the path.
pub fn write_report(report: &AuditReport, dir: &Path) -> Result<PathBuf, BlescopeError> {
    std::fs::create_dir_all(dir)?;
    let date = report.timestamp.get(..10).unwrap_or("undated");
    let filename = format!("audit_{}_{date}.json", report.device_address.replace(':', "-"));
    let path = dir.join(filename);
    let document = ReportDocument::from_report(report);
    std::fs::write(&path, serde_json::to_string_pretty(&document)?)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_rounds_to_one_decimal() {
        assert_eq!(round_score(9.499999), 9.5);
        assert_eq!(round_score(10.0), 10.0);
        assert_eq!(round_score(0.04), 0.0);
    }
}
