use std::collections::BTreeMap;

use chrono::Local;
use serde::{Deserialize, Serialize};

use super::finding::Finding;

/// Accumulating result of one security audit session.
///
/// The report is created empty when the audit starts, mutated in place by
/// each phase, finalized by a single `calculate_grade` call and then only
/// read. `add_finding` is the sole scoring entry point: no phase touches
/// `score` or `grade` directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditReport {
    pub device_address: String,
    pub device_name: String,
    pub timestamp: String,
    pub connection_no_auth: bool,
    pub total_services: usize,
    pub total_characteristics: usize,
    pub readable_chars: usize,
    pub writable_chars: usize,
    pub notify_chars: usize,
    pub findings: Vec<Finding>,
    pub exposed_data: BTreeMap<String, String>,
    pub score: f64,
    pub grade: String,
}

impl AuditReport {
    pub fn new(address: &str) -> Self {
        Self {
            device_address: address.to_string(),
            device_name: "Unknown".to_string(),
            timestamp: Local::now().to_rfc3339(),
            connection_no_auth: false,
            total_services: 0,
            total_characteristics: 0,
            readable_chars: 0,
            writable_chars: 0,
            notify_chars: 0,
            findings: Vec::new(),
            exposed_data: BTreeMap::new(),
            score: 10.0,
            grade: "A+".to_string(),
        }
    }

    /// Record a finding and deduct its severity weight, floored at 0.
    pub fn add_finding(&mut self, finding: Finding) {
        self.score = (self.score - finding.severity.weight()).max(0.0);
        self.findings.push(finding);
    }

    /// Derive the letter grade from the current score. Idempotent; called
    /// once by the engine after the last phase.
    pub fn calculate_grade(&mut self) {
        self.grade = grade_for_score(self.score).to_string();
    }

    pub fn count_by_severity(&self, severity: super::Severity) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == severity)
            .count()
    }
}

/// Map a 0..10 score to a letter grade.
pub fn grade_for_score(score: f64) -> &'static str {
    if score >= 9.0 {
        "A+"
    } else if score >= 8.0 {
        "A"
    } else if score >= 7.0 {
        "B+"
    } else if score >= 6.0 {
        "B"
    } else if score >= 5.0 {
        "C"
    } else if score >= 4.0 {
        "D"
    } else {
        "F"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Severity;

    fn finding(severity: Severity) -> Finding {
        Finding {
            severity,
            title: "test".into(),
            description: String::new(),
            characteristic: String::new(),
            service: String::new(),
            recommendation: String::new(),
            data: String::new(),
        }
    }

    #[test]
    fn score_deductions_accumulate() {
        let mut report = AuditReport::new("AA:BB:CC:DD:EE:FF");
        report.add_finding(finding(Severity::Critical));
        report.add_finding(finding(Severity::High));
        report.add_finding(finding(Severity::Low));
        report.add_finding(finding(Severity::Info));
        assert_eq!(report.score, 10.0 - 3.0 - 2.0 - 0.5);
        assert_eq!(report.findings.len(), 4);
    }

    #[test]
    fn score_is_floored_at_zero() {
        let mut report = AuditReport::new("AA:BB:CC:DD:EE:FF");
        for _ in 0..5 {
            report.add_finding(finding(Severity::Critical));
        }
        assert_eq!(report.score, 0.0);
        report.calculate_grade();
        assert_eq!(report.grade, "F");
    }

    #[test]
    fn grade_breakpoints() {
        assert_eq!(grade_for_score(10.0), "A+");
        assert_eq!(grade_for_score(9.0), "A+");
        assert_eq!(grade_for_score(8.5), "A");
        assert_eq!(grade_for_score(8.0), "A");
        assert_eq!(grade_for_score(7.0), "B+");
        assert_eq!(grade_for_score(6.0), "B");
        assert_eq!(grade_for_score(5.0), "C");
        assert_eq!(grade_for_score(4.0), "D");
        assert_eq!(grade_for_score(3.9), "F");
        assert_eq!(grade_for_score(0.0), "F");
    }

    #[test]
    fn calculate_grade_is_idempotent() {
        let mut report = AuditReport::new("AA:BB:CC:DD:EE:FF");
        report.add_finding(finding(Severity::Medium));
        report.calculate_grade();
        let first = report.grade.clone();
        report.calculate_grade();
        assert_eq!(report.grade, first);
        assert_eq!(first, "A+");
    }
}
