//! Per-domain accumulation of probe outcomes

use serde::Serialize;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// Running tally for one domain.
///
/// Counters only ever increase during a run; `up_checks` can never
/// exceed `total_checks`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DomainStatus {
    pub total_checks: u64,
    pub up_checks: u64,
}

impl DomainStatus {
    /// Availability as a whole-number percentage
    pub fn availability_percent(&self) -> u64 {
        if self.total_checks == 0 {
            return 0;
        }

        ((self.up_checks * 100) as f64 / self.total_checks as f64).round() as u64
    }
}

/// Accumulates check counters keyed by domain.
///
/// Entries are created lazily on the first recorded check and live for
/// the rest of the run. The map sits behind a write lock so concurrent
/// record calls for the same domain cannot lose updates.
#[derive(Debug, Default)]
pub struct DomainAggregator {
    domains: RwLock<HashMap<String, DomainStatus>>,
}

impl DomainAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one check for a domain, counting it as up when `is_up`
    pub async fn record(&self, domain: &str, is_up: bool) {
        let mut domains = self.domains.write().await;
        let status = domains.entry(domain.to_string()).or_default();

        status.total_checks += 1;
        if is_up {
            status.up_checks += 1;
        }

        debug!(
            "Recorded check for {}: {}/{} up",
            domain, status.up_checks, status.total_checks
        );
    }

    /// Counters for every known domain as of the call instant, sorted
    /// by domain for deterministic reporting
    pub async fn snapshot(&self) -> Vec<(String, DomainStatus)> {
        let domains = self.domains.read().await;

        let mut entries: Vec<(String, DomainStatus)> = domains
            .iter()
            .map(|(domain, status)| (domain.clone(), *status))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        entries
    }

    /// Number of distinct domains observed so far
    pub async fn len(&self) -> usize {
        self.domains.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.domains.read().await.is_empty()
    }
}
