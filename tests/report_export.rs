use std::collections::BTreeMap;

use blescope::models::{AuditReport, Finding, Severity};
use blescope::reporting::{write_report, ReportDocument};
use tempfile::TempDir;

fn sample_report() -> AuditReport {
    let mut report = AuditReport::new("AA:BB:CC:DD:EE:FF");
    report.device_name = "Thermo".into();
    report.connection_no_auth = true;
    report.total_services = 2;
    report.total_characteristics = 5;
    report.readable_chars = 3;
    report.writable_chars = 1;
    report.notify_chars = 1;
    report.add_finding(Finding {
        severity: Severity::Medium,
        title: "No Authentication Required".into(),
        description: "Device accepted connection without pairing or bonding.".into(),
        characteristic: String::new(),
        service: String::new(),
        recommendation: "Implement BLE pairing.".into(),
        data: String::new(),
    });
    report.add_finding(Finding {
        severity: Severity::Low,
        title: "2 Notification Characteristic(s) Available".into(),
        description: "Openly subscribable.".into(),
        characteristic: String::new(),
        service: String::new(),
        recommendation: String::new(),
        data: String::new(),
    });
    report.exposed_data = BTreeMap::from([
        ("Manufacturer Name String".to_string(), "Acme".to_string()),
        ("Serial Number String".to_string(), "SN-1".to_string()),
    ]);
    report.calculate_grade();
    report
}

#[test]
fn export_shape_matches_contract() {
    let report = sample_report();
    let value = serde_json::to_value(ReportDocument::from_report(&report)).unwrap();

    assert_eq!(value["device"]["address"], "AA:BB:CC:DD:EE:FF");
    assert_eq!(value["device"]["name"], "Thermo");
    assert_eq!(value["score"], 8.5);
    assert_eq!(value["grade"], "A");
    assert_eq!(value["connection_no_auth"], true);
    assert_eq!(value["stats"]["total_services"], 2);
    assert_eq!(value["stats"]["total_characteristics"], 5);
    assert_eq!(value["stats"]["readable"], 3);
    assert_eq!(value["stats"]["writable"], 1);
    assert_eq!(value["stats"]["notify"], 1);
    assert_eq!(value["findings"][0]["severity"], "MEDIUM");
    assert_eq!(value["findings"][0]["title"], "No Authentication Required");
    assert_eq!(value["findings"][0]["characteristic"], "");
    assert_eq!(value["findings"][1]["severity"], "LOW");
    assert_eq!(value["exposed_data"]["Serial Number String"], "SN-1");
}

#[test]
fn export_is_idempotent() {
    let report = sample_report();
    let first = serde_json::to_string(&ReportDocument::from_report(&report)).unwrap();
    let second = serde_json::to_string(&ReportDocument::from_report(&report)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn findings_keep_insertion_order() {
    let report = sample_report();
    let document = ReportDocument::from_report(&report);
    assert_eq!(document.findings[0].severity, Severity::Medium);
    assert_eq!(document.findings[1].severity, Severity::Low);
}

#[test]
fn exported_score_is_rounded_to_one_decimal() {
    let mut report = sample_report();
    report.score = 7.333_333;
    let document = ReportDocument::from_report(&report);
    assert_eq!(document.score, 7.3);
}

#[test]
fn write_report_persists_parseable_json() {
    let dir = TempDir::new().unwrap();
    let report = sample_report();
    let path = write_report(&report, dir.path()).unwrap();

    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("audit_AA-BB-CC-DD-EE-FF_"));
    assert!(name.ends_with(".json"));

    let parsed: ReportDocument =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(parsed.device.address, report.device_address);
    assert_eq!(parsed.grade, report.grade);
    assert_eq!(parsed.findings.len(), report.findings.len());
}

#[test]
fn document_round_trips_through_serde() {
    let report = sample_report();
    let document = ReportDocument::from_report(&report);
    let json = serde_json::to_string(&document).unwrap();
    let parsed: ReportDocument = serde_json::from_str(&json).unwrap();
    assert_eq!(serde_json::to_string(&parsed).unwrap(), json);
}
