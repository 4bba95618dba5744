//! Phased security assessment of a single BLE peripheral.
//!
//! The engine drives a [`BleAdapter`] through a fixed inspection sequence and
//! accumulates everything into one [`AuditReport`]. `audit` never fails
//! outward: a refused connection is itself the most security-positive outcome
//! a device can show, and any later trouble is captured as findings or
//! ignored as ordinary BLE variability.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::ble::{BleAdapter, BleConnection, ServiceInfo};
use crate::gatt::{extract_short_uuid, resolve_characteristic, resolve_service};
use crate::models::{AuditReport, Finding, Severity};

use super::{AuditEvent, PHASES};

/// Window for the passive advertisement capture in phase 1.
const ADVERTISEMENT_WINDOW: Duration = Duration::from_secs(3);

/// Advertised transmit power above this many dBm is flagged as a range risk.
const TX_POWER_LIMIT: i16 = 4;

const DEVICE_INFO_SERVICE: &str = "180a";
const HID_SERVICE: &str = "1812";
const GENERIC_ACCESS_SERVICE: &str = "1800";
const DEVICE_NAME_CHAR: &str = "2a00";

/// Characteristics whose values should not be freely readable.
static SENSITIVE_CHARS: &[(&str, &str)] = &[
    ("2a00", "Device Name"),
    ("2a24", "Model Number"),
    ("2a25", "Serial Number"),
    ("2a26", "Firmware Revision"),
    ("2a27", "Hardware Revision"),
    ("2a28", "Software Revision"),
    ("2a29", "Manufacturer Name"),
    ("2a23", "System ID"),
    ("2a50", "PnP ID"),
    ("2a4a", "HID Information"),
    ("2a4b", "Report Map"),
];

fn sensitive_field(short_uuid: &str) -> Option<&'static str> {
    SENSITIVE_CHARS
        .iter()
        .find(|(uuid, _)| *uuid == short_uuid)
        .map(|(_, name)| *name)
}

pub struct SecurityAuditor {
    adapter: Arc<dyn BleAdapter>,
    event_tx: Option<mpsc::UnboundedSender<AuditEvent>>,
}

impl SecurityAuditor {
    pub fn new(adapter: Arc<dyn BleAdapter>) -> Self {
        Self {
            adapter,
            event_tx: None,
        }
    }

    /// Attach a channel for streaming progress to a renderer.
    pub fn with_event_channel(mut self, tx: mpsc::UnboundedSender<AuditEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    fn emit(&self, event: AuditEvent) {
        if let Some(ref tx) = self.event_tx {
            let _ = tx.send(event);
        }
    }

    fn emit_phase(&self, index: usize) {
        self.emit(AuditEvent::PhaseStarted {
            index,
            display_name: PHASES[index].display_name,
        });
    }

    /// Record a finding: emits the event, then routes through the report's
    /// single scoring entry point.
    fn add_finding(&self, report: &mut AuditReport, finding: Finding) {
        self.emit(AuditEvent::FindingDiscovered {
            title: finding.title.clone(),
            severity: finding.severity,
        });
        report.add_finding(finding);
    }

    /// Run a full security audit against `address`.
    ///
    /// `timeout` bounds only the connection attempt; a refused or timed-out
    /// connection ends the audit early with a valid, graded report.
    pub async fn audit(&self, address: &str, timeout: Duration) -> AuditReport {
        let mut report = AuditReport::new(address);

        self.emit_phase(0);
        self.scan_advertisements(address, &mut report).await;

        self.emit_phase(1);
        let connection = match self.adapter.connect(address, timeout).await {
            Ok(connection) => {
                report.connection_no_auth = true;
                self.add_finding(
                    &mut report,
                    Finding {
                        severity: Severity::Medium,
                        title: "No Authentication Required".into(),
                        description: "Device accepted connection without pairing or bonding."
                            .into(),
                        characteristic: String::new(),
                        service: String::new(),
                        recommendation:
                            "Implement BLE pairing with MITM protection (Secure Connections)."
                                .into(),
                        data: String::new(),
                    },
                );
                connection
            }
            Err(e) => {
                self.add_finding(
                    &mut report,
                    Finding {
                        severity: Severity::Info,
                        title: "Connection Requires Authentication".into(),
                        description: format!("Device refused unauthenticated connection: {e}"),
                        characteristic: String::new(),
                        service: String::new(),
                        recommendation:
                            "This is good — the device requires pairing/authentication.".into(),
                        data: String::new(),
                    },
                );
                report.calculate_grade();
                self.emit(AuditEvent::Completed {
                    score: report.score,
                    grade: report.grade.clone(),
                });
                return report;
            }
        };

        self.emit_phase(2);
        let services = match connection.enumerate().await {
            Ok(services) => services,
            Err(e) => {
                // Untrusted firmware; a broken attribute table must not
                // abort the remaining phases.
                warn!(error = %e, "Attribute enumeration failed");
                Vec::new()
            }
        };
        enumerate_services(&services, &mut report);

        self.emit_phase(3);
        self.probe_readable_chars(connection.as_ref(), &services, &mut report)
            .await;

        self.emit_phase(4);
        self.check_write_permissions(&services, &mut report);

        self.emit_phase(5);
        self.analyze_services(&services, &mut report);

        self.emit_phase(6);
        self.check_notification_security(&services, &mut report);

        if let Err(e) = connection.disconnect().await {
            debug!(error = %e, "Post-audit disconnect failed");
        }

        report.calculate_grade();
        self.emit(AuditEvent::Completed {
            score: report.score,
            grade: report.grade.clone(),
        });
        report
    }

    /// Phase 1: passive capture of the target's broadcast data. Only the
    /// first matching advertisement produces findings; later ones just
    /// refresh the display name.
    async fn scan_advertisements(&self, address: &str, report: &mut AuditReport) {
        let ads = match self
            .adapter
            .collect_advertisements(Some(address), ADVERTISEMENT_WINDOW)
            .await
        {
            Ok(ads) => ads,
            Err(e) => {
                warn!(error = %e, "Advertisement scan failed");
                return;
            }
        };

        let mut evaluated = false;
        for ad in &ads {
            if let Some(name) = &ad.name {
                report.device_name = name.clone();
            }
            if evaluated {
                continue;
            }
            evaluated = true;

            if !ad.service_uuids.is_empty() {
                self.add_finding(
                    report,
                    Finding {
                        severity: Severity::Low,
                        title: "Services Advertised in Broadcast".into(),
                        description: format!(
                            "Device broadcasts {} service UUID(s) publicly: {}",
                            ad.service_uuids.len(),
                            ad.service_uuids.join(", ")
                        ),
                        characteristic: String::new(),
                        service: String::new(),
                        recommendation:
                            "Only advertise necessary service UUIDs to reduce attack surface."
                                .into(),
                        data: String::new(),
                    },
                );
            }

            if let Some(tx_power) = ad.tx_power {
                if tx_power > TX_POWER_LIMIT {
                    self.add_finding(
                        report,
                        Finding {
                            severity: Severity::Low,
                            title: format!("High TX Power ({tx_power} dBm)"),
                            description:
                                "Device is broadcasting at high power, increasing range of potential attacks."
                                    .into(),
                            characteristic: String::new(),
                            service: String::new(),
                            recommendation:
                                "Reduce TX power if device only needs short-range communication."
                                    .into(),
                            data: String::new(),
                        },
                    );
                }
            }

            if !ad.manufacturer_ids.is_empty() {
                self.add_finding(
                    report,
                    Finding {
                        severity: Severity::Info,
                        title: "Manufacturer Data in Advertisement".into(),
                        description: format!(
                            "Device broadcasts manufacturer-specific data for {} company ID(s).",
                            ad.manufacturer_ids.len()
                        ),
                        characteristic: String::new(),
                        service: String::new(),
                        recommendation:
                            "Ensure manufacturer data doesn't leak sensitive information.".into(),
                        data: String::new(),
                    },
                );
            }
        }
    }

    /// Phase 4: read every readable characteristic. An unreadable one is not
    /// a weakness; the failure is discarded on purpose.
    async fn probe_readable_chars(
        &self,
        connection: &dyn BleConnection,
        services: &[ServiceInfo],
        report: &mut AuditReport,
    ) {
        for service in services {
            for characteristic in &service.characteristics {
                if !characteristic.properties.read {
                    continue;
                }
                let data = match connection.read(&characteristic.uuid).await {
                    Ok(data) => data,
                    Err(_) => continue,
                };

                let text = String::from_utf8_lossy(&data).trim().to_string();

                let name = resolve_characteristic(&characteristic.uuid);
                let key = if name != "Unknown" {
                    name.to_string()
                } else {
                    characteristic.uuid.clone()
                };
                report.exposed_data.insert(key, text.clone());

                let Some(short) = extract_short_uuid(&characteristic.uuid) else {
                    continue;
                };
                if let Some(field) = sensitive_field(&short) {
                    self.add_finding(
                        report,
                        Finding {
                            severity: Severity::Medium,
                            title: format!("Sensitive Data Readable: {field}"),
                            description: format!(
                                "'{field}' is readable without authentication. Value: '{text}'"
                            ),
                            characteristic: characteristic.uuid.clone(),
                            service: service.uuid.clone(),
                            recommendation: format!(
                                "Protect '{field}' with encryption or authentication."
                            ),
                            data: text,
                        },
                    );
                }
            }
        }
    }

    /// Phase 5: flag-only inspection of write permissions; nothing is
    /// actually written to the device.
    fn check_write_permissions(&self, services: &[ServiceInfo], report: &mut AuditReport) {
        let mut open_writes: Vec<(String, &'static str)> = Vec::new();

        for service in services {
            for characteristic in &service.characteristics {
                let name = resolve_characteristic(&characteristic.uuid);
                if characteristic.properties.write_without_response {
                    open_writes.push((characteristic.uuid.clone(), name));
                    self.add_finding(
                        report,
                        Finding {
                            severity: Severity::High,
                            title: "Write-Without-Response Enabled".into(),
                            description: format!(
                                "Characteristic '{name}' ({}) allows write-without-response. \
                                 An attacker can send data without any acknowledgment or pairing.",
                                characteristic.uuid
                            ),
                            characteristic: characteristic.uuid.clone(),
                            service: service.uuid.clone(),
                            recommendation:
                                "Require pairing and use 'write' instead of 'write-without-response' for sensitive commands."
                                    .into(),
                            data: String::new(),
                        },
                    );
                } else if characteristic.properties.write {
                    open_writes.push((characteristic.uuid.clone(), name));
                }
            }
        }

        if !open_writes.is_empty() {
            let listed = open_writes
                .iter()
                .map(|(uuid, name)| format!("{name} ({}...)", uuid.get(..8).unwrap_or(uuid)))
                .collect::<Vec<_>>()
                .join(", ");
            self.add_finding(
                report,
                Finding {
                    severity: Severity::Medium,
                    title: format!("{} Writable Characteristic(s) Without Auth", open_writes.len()),
                    description: format!(
                        "These characteristics accept writes without authentication: {listed}"
                    ),
                    characteristic: String::new(),
                    service: String::new(),
                    recommendation:
                        "Implement write permissions that require bonding or encryption.".into(),
                    data: String::new(),
                },
            );
        }
    }

    /// Phase 6: known-risky standard services.
    fn analyze_services(&self, services: &[ServiceInfo], report: &mut AuditReport) {
        for service in services {
            let Some(short) = extract_short_uuid(&service.uuid) else {
                continue;
            };

            if short == DEVICE_INFO_SERVICE {
                self.add_finding(
                    report,
                    Finding {
                        severity: Severity::Medium,
                        title: "Device Information Service Exposed".into(),
                        description:
                            "The Device Information Service (0x180A) is accessible without \
                             authentication, potentially leaking manufacturer, model, serial \
                             number, and firmware version."
                                .into(),
                        characteristic: String::new(),
                        service: service.uuid.clone(),
                        recommendation:
                            "Restrict Device Information Service access or remove unnecessary characteristics."
                                .into(),
                        data: String::new(),
                    },
                );
            }

            if short == HID_SERVICE {
                self.add_finding(
                    report,
                    Finding {
                        severity: Severity::Critical,
                        title: "HID Service Exposed Without Auth".into(),
                        description:
                            "Human Interface Device (HID) service is accessible. An attacker \
                             could potentially inject keystrokes or mouse movements."
                                .into(),
                        characteristic: String::new(),
                        service: service.uuid.clone(),
                        recommendation: "HID service MUST require bonding with MITM protection."
                            .into(),
                        data: String::new(),
                    },
                );
            }

            if short == GENERIC_ACCESS_SERVICE {
                for characteristic in &service.characteristics {
                    let is_device_name = extract_short_uuid(&characteristic.uuid)
                        .is_some_and(|s| s == DEVICE_NAME_CHAR);
                    if is_device_name && characteristic.properties.write {
                        self.add_finding(
                            report,
                            Finding {
                                severity: Severity::High,
                                title: "Device Name is Writable".into(),
                                description:
                                    "Attacker can change the device name, enabling spoofing/impersonation attacks."
                                        .into(),
                                characteristic: characteristic.uuid.clone(),
                                service: String::new(),
                                recommendation:
                                    "Make Device Name read-only or require authentication.".into(),
                                data: String::new(),
                            },
                        );
                    }
                }
            }

            debug!(service = %resolve_service(&service.uuid), uuid = %service.uuid, "Analyzed service");
        }
    }

    /// Phase 7: openly subscribable notification channels. Indicate-only
    /// characteristics are excluded here.
    fn check_notification_security(&self, services: &[ServiceInfo], report: &mut AuditReport) {
        let notify_count = services
            .iter()
            .flat_map(|s| &s.characteristics)
            .filter(|c| c.properties.notify)
            .count();

        if notify_count > 0 {
            self.add_finding(
                report,
                Finding {
                    severity: Severity::Low,
                    title: format!("{notify_count} Notification Characteristic(s) Available"),
                    description:
                        "Any connected client can subscribe to notifications and receive data \
                         stream without additional authorization."
                            .into(),
                    characteristic: String::new(),
                    service: String::new(),
                    recommendation:
                        "Ensure notification data doesn't contain sensitive information, or \
                         require bonding before allowing subscriptions."
                            .into(),
                    data: String::new(),
                },
            );
        }
    }
}

/// Phase 3: pure counting over the attribute table.
fn enumerate_services(services: &[ServiceInfo], report: &mut AuditReport) {
    for service in services {
        report.total_services += 1;
        for characteristic in &service.characteristics {
            report.total_characteristics += 1;
            let props = &characteristic.properties;
            if props.read {
                report.readable_chars += 1;
            }
            if props.writable() {
                report.writable_chars += 1;
            }
            if props.subscribable() {
                report.notify_chars += 1;
            }
        }
    }
}
