mod common;

use std::sync::Arc;
use std::time::Duration;

use blescope::audit::SecurityAuditor;
use blescope::models::Severity;

use common::*;

const TIMEOUT: Duration = Duration::from_secs(5);

async fn run_audit(adapter: FakeAdapter) -> blescope::models::AuditReport {
    SecurityAuditor::new(Arc::new(adapter))
        .audit(TARGET, TIMEOUT)
        .await
}

#[tokio::test]
async fn refused_connection_exits_early_with_single_info_finding() {
    let report = run_audit(FakeAdapter {
        refuse_connect: true,
        ..Default::default()
    })
    .await;

    assert_eq!(report.findings.len(), 1);
    assert_eq!(report.findings[0].severity, Severity::Info);
    assert_eq!(report.findings[0].title, "Connection Requires Authentication");
    assert!(!report.connection_no_auth);
    assert_eq!(report.total_services, 0);
    assert_eq!(report.total_characteristics, 0);
    assert!(report.exposed_data.is_empty());
    assert_eq!(report.score, 10.0);
    assert_eq!(report.grade, "A+");
}

#[tokio::test]
async fn open_connection_is_a_medium_finding() {
    let report = run_audit(FakeAdapter::default()).await;

    assert!(report.connection_no_auth);
    assert_eq!(report.findings.len(), 1);
    assert_eq!(report.findings[0].severity, Severity::Medium);
    assert_eq!(report.findings[0].title, "No Authentication Required");
    assert_eq!(report.score, 9.0);
    assert_eq!(report.grade, "A+");
}

#[tokio::test]
async fn enumeration_counts_all_property_classes() {
    let adapter = FakeAdapter {
        services: vec![
            service(
                "180f",
                vec![
                    characteristic("2a19", readable()),
                    characteristic("2a1b", notifying()),
                ],
            ),
            service(
                "ff00",
                vec![
                    characteristic("ff01", writable()),
                    characteristic("ff02", write_without_response()),
                    characteristic("ff03", indicating()),
                ],
            ),
        ],
        ..Default::default()
    };
    let report = run_audit(adapter).await;

    assert_eq!(report.total_services, 2);
    assert_eq!(report.total_characteristics, 5);
    assert_eq!(report.readable_chars, 1);
    assert_eq!(report.writable_chars, 2);
    // notify counter includes indicate
    assert_eq!(report.notify_chars, 2);
}

#[tokio::test]
async fn readable_serial_number_is_exposed_and_flagged() {
    let mut adapter = FakeAdapter {
        services: vec![service("180a", vec![characteristic("2a25", readable())])],
        ..Default::default()
    };
    adapter
        .char_values
        .insert(base_uuid("2a25"), b"SN-1234".to_vec());

    let report = run_audit(adapter).await;

    assert_eq!(
        report.exposed_data.get("Serial Number String").map(String::as_str),
        Some("SN-1234")
    );
    let sensitive: Vec<_> = report
        .findings
        .iter()
        .filter(|f| f.title == "Sensitive Data Readable: Serial Number")
        .collect();
    assert_eq!(sensitive.len(), 1);
    assert_eq!(sensitive[0].severity, Severity::Medium);
    assert_eq!(sensitive[0].data, "SN-1234");
    assert_eq!(sensitive[0].characteristic, base_uuid("2a25"));
    assert_eq!(sensitive[0].service, base_uuid("180a"));

    // Device Information Service itself is a separate medium finding
    assert_eq!(
        report
            .findings
            .iter()
            .filter(|f| f.title == "Device Information Service Exposed")
            .count(),
        1
    );
}

#[tokio::test]
async fn unreadable_characteristics_are_silently_skipped() {
    // Readable flag set, but no value configured: the read fails
    let adapter = FakeAdapter {
        services: vec![service("180f", vec![characteristic("2a19", readable())])],
        ..Default::default()
    };
    let report = run_audit(adapter).await;

    assert!(report.exposed_data.is_empty());
    assert_eq!(report.findings.len(), 1); // only the no-auth finding
}

#[tokio::test]
async fn unknown_characteristic_exposed_data_keys_by_uuid() {
    let mut adapter = FakeAdapter {
        services: vec![service("ff00", vec![characteristic("ff01", readable())])],
        ..Default::default()
    };
    adapter
        .char_values
        .insert(base_uuid("ff01"), b"hello".to_vec());

    let report = run_audit(adapter).await;
    assert_eq!(
        report.exposed_data.get(&base_uuid("ff01")).map(String::as_str),
        Some("hello")
    );
}

#[tokio::test]
async fn hid_service_yields_exactly_one_critical() {
    let adapter = FakeAdapter {
        services: vec![service(
            "1812",
            vec![
                characteristic("2a4a", readable()),
                characteristic("2a4b", readable()),
                characteristic("2a4d", notifying()),
            ],
        )],
        ..Default::default()
    };
    let report = run_audit(adapter).await;

    let critical: Vec<_> = report
        .findings
        .iter()
        .filter(|f| f.severity == Severity::Critical)
        .collect();
    assert_eq!(critical.len(), 1);
    assert_eq!(critical[0].title, "HID Service Exposed Without Auth");
}

#[tokio::test]
async fn write_without_response_flagged_per_characteristic_plus_aggregate() {
    let adapter = FakeAdapter {
        services: vec![service(
            "ff00",
            vec![
                characteristic("ff01", write_without_response()),
                characteristic("ff02", write_without_response()),
                characteristic("ff03", writable()),
            ],
        )],
        ..Default::default()
    };
    let report = run_audit(adapter).await;

    let high: Vec<_> = report
        .findings
        .iter()
        .filter(|f| f.title == "Write-Without-Response Enabled")
        .collect();
    assert_eq!(high.len(), 2);
    assert!(high.iter().all(|f| f.severity == Severity::High));

    let aggregate: Vec<_> = report
        .findings
        .iter()
        .filter(|f| f.title.contains("Writable Characteristic(s) Without Auth"))
        .collect();
    assert_eq!(aggregate.len(), 1);
    assert_eq!(aggregate[0].severity, Severity::Medium);
    assert!(aggregate[0].title.starts_with("3 "));
}

#[tokio::test]
async fn no_writable_characteristics_means_no_aggregate_finding() {
    let adapter = FakeAdapter {
        services: vec![service("180f", vec![characteristic("2a19", readable())])],
        ..Default::default()
    };
    let report = run_audit(adapter).await;
    assert!(!report
        .findings
        .iter()
        .any(|f| f.title.contains("Writable Characteristic(s)")));
}

#[tokio::test]
async fn writable_device_name_is_a_spoofing_risk() {
    let adapter = FakeAdapter {
        services: vec![service("1800", vec![characteristic("2a00", writable())])],
        ..Default::default()
    };
    let report = run_audit(adapter).await;

    let spoof: Vec<_> = report
        .findings
        .iter()
        .filter(|f| f.title == "Device Name is Writable")
        .collect();
    assert_eq!(spoof.len(), 1);
    assert_eq!(spoof[0].severity, Severity::High);
}

#[tokio::test]
async fn notify_channels_produce_one_aggregate_low_finding() {
    let adapter = FakeAdapter {
        services: vec![service(
            "180d",
            vec![
                characteristic("2a37", notifying()),
                characteristic("2a38", notifying()),
                characteristic("2a39", indicating()),
            ],
        )],
        ..Default::default()
    };
    let report = run_audit(adapter).await;

    // Indicate-only characteristics do not count here
    let low: Vec<_> = report
        .findings
        .iter()
        .filter(|f| f.title == "2 Notification Characteristic(s) Available")
        .collect();
    assert_eq!(low.len(), 1);
    assert_eq!(low[0].severity, Severity::Low);
}

#[tokio::test]
async fn only_first_advertisement_produces_findings() {
    let mut first = advertisement(TARGET);
    first.service_uuids = vec![base_uuid("180f")];
    first.tx_power = Some(8);
    first.manufacturer_ids = vec![0x004c];
    let mut second = first.clone();
    second.name = Some("Gadget".into());

    let adapter = FakeAdapter {
        advertisements: vec![first, second],
        refuse_connect: true,
        ..Default::default()
    };
    let report = run_audit(adapter).await;

    // Later advertisements refresh the name without duplicating findings
    assert_eq!(report.device_name, "Gadget");
    assert_eq!(
        report
            .findings
            .iter()
            .filter(|f| f.title == "Services Advertised in Broadcast")
            .count(),
        1
    );
    assert_eq!(
        report
            .findings
            .iter()
            .filter(|f| f.title == "High TX Power (8 dBm)")
            .count(),
        1
    );
    assert_eq!(
        report
            .findings
            .iter()
            .filter(|f| f.title == "Manufacturer Data in Advertisement")
            .count(),
        1
    );
    // Plus the early-exit info finding
    assert_eq!(report.findings.len(), 4);
    assert_eq!(report.score, 9.0);
}

#[tokio::test]
async fn low_tx_power_is_not_flagged() {
    let mut ad = advertisement(TARGET);
    ad.tx_power = Some(4);
    let adapter = FakeAdapter {
        advertisements: vec![ad],
        refuse_connect: true,
        ..Default::default()
    };
    let report = run_audit(adapter).await;
    assert!(!report.findings.iter().any(|f| f.title.starts_with("High TX Power")));
}

#[tokio::test]
async fn advertisements_from_other_devices_are_ignored() {
    let mut stranger = advertisement("11:22:33:44:55:66");
    stranger.service_uuids = vec![base_uuid("1812")];
    let adapter = FakeAdapter {
        advertisements: vec![stranger],
        refuse_connect: true,
        ..Default::default()
    };
    let report = run_audit(adapter).await;
    assert_eq!(report.findings.len(), 1);
    assert_eq!(report.device_name, "Unknown");
}

#[tokio::test]
async fn score_reflects_accumulated_findings() {
    // HID (critical, -3) + open connection (medium, -1) + DIS (medium, -1)
    let adapter = FakeAdapter {
        services: vec![
            service("180a", Vec::new()),
            service("1812", Vec::new()),
        ],
        ..Default::default()
    };
    let report = run_audit(adapter).await;
    assert_eq!(report.score, 5.0);
    assert_eq!(report.grade, "C");
}
