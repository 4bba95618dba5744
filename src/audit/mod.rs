pub mod engine;

pub use engine::SecurityAuditor;

use crate::models::Severity;

pub struct PhaseDefinition {
    pub display_name: &'static str,
    pub description: &'static str,
}

/// The audit's fixed phase sequence, least invasive first: a passive scan
/// costs nothing, while service-level judgment needs the full enumeration.
pub static PHASES: &[PhaseDefinition] = &[
    PhaseDefinition {
        display_name: "Advertisement Scan",
        description: "Passive capture of the device's broadcast data",
    },
    PhaseDefinition {
        display_name: "Connection Attempt",
        description: "Unauthenticated connection without pairing",
    },
    PhaseDefinition {
        display_name: "Service Enumeration",
        description: "Walk of the GATT attribute table",
    },
    PhaseDefinition {
        display_name: "Readable Probing",
        description: "Read every readable characteristic for exposed data",
    },
    PhaseDefinition {
        display_name: "Write Permissions",
        description: "Inspection of write capability flags",
    },
    PhaseDefinition {
        display_name: "Service Risks",
        description: "Known-risky standard services",
    },
    PhaseDefinition {
        display_name: "Notification Security",
        description: "Openly subscribable notification channels",
    },
];

/// Progress events streamed to an attached consumer (CLI renderer, API).
#[derive(Debug, Clone)]
pub enum AuditEvent {
    PhaseStarted {
        index: usize,
        display_name: &'static str,
    },
    FindingDiscovered {
        title: String,
        severity: Severity,
    },
    Completed {
        score: f64,
        grade: String,
    },
}
