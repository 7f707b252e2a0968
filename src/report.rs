//! Availability reporting

use crate::aggregator::DomainStatus;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

/// Availability of one domain at a point in time
#[derive(Debug, Clone, Serialize)]
pub struct AvailabilityRow {
    pub domain: String,
    pub total_checks: u64,
    pub up_checks: u64,
    pub availability_percent: u64,
}

/// Snapshot emitted after each probing round
#[derive(Debug, Clone, Serialize)]
pub struct AvailabilityReport {
    pub generated_at: DateTime<Utc>,
    pub rows: Vec<AvailabilityRow>,
}

impl AvailabilityReport {
    /// Build a report from an aggregator snapshot
    pub fn from_snapshot(snapshot: Vec<(String, DomainStatus)>) -> Self {
        let rows = snapshot
            .into_iter()
            .map(|(domain, status)| AvailabilityRow {
                domain,
                total_checks: status.total_checks,
                up_checks: status.up_checks,
                availability_percent: status.availability_percent(),
            })
            .collect();

        Self {
            generated_at: Utc::now(),
            rows,
        }
    }
}

/// Destination for per-round availability reports.
///
/// The monitor only knows this seam; swapping the destination is a
/// reporter concern, not a scheduling concern.
#[async_trait]
pub trait AvailabilityReporter: Send + Sync {
    async fn report(&self, report: &AvailabilityReport);
}

/// Default reporter: one log line per domain
#[derive(Debug, Default)]
pub struct LogReporter;

#[async_trait]
impl AvailabilityReporter for LogReporter {
    async fn report(&self, report: &AvailabilityReport) {
        for row in &report.rows {
            info!("{} has {}% availability", row.domain, row.availability_percent);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_rows_carry_rounded_percentages() {
        let report = AvailabilityReport::from_snapshot(vec![
            (
                "api.example.com".to_string(),
                DomainStatus {
                    total_checks: 3,
                    up_checks: 2,
                },
            ),
            (
                "example.com".to_string(),
                DomainStatus {
                    total_checks: 4,
                    up_checks: 4,
                },
            ),
        ]);

        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.rows[0].domain, "api.example.com");
        assert_eq!(report.rows[0].availability_percent, 67);
        assert_eq!(report.rows[1].availability_percent, 100);
    }

    #[test]
    fn test_empty_snapshot_yields_empty_report() {
        let report = AvailabilityReport::from_snapshot(Vec::new());
        assert!(report.rows.is_empty());
    }
}
