//! Endpoint list loading for the uptime monitor

use crate::endpoint::Endpoint;
use crate::errors::{MonitorError, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Load the endpoint list from a YAML file (or JSON, by extension).
///
/// This is the fatal startup path: any failure here terminates the
/// process, there is nothing to monitor without a valid list.
pub fn load_endpoints(path: &Path) -> Result<Vec<Endpoint>> {
    let raw = fs::read_to_string(path)?;

    let endpoints: Vec<Endpoint> = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(&raw)?,
        _ => serde_yaml::from_str(&raw)?,
    };

    if endpoints.is_empty() {
        return Err(MonitorError::Config(
            "at least one endpoint must be configured".to_string(),
        ));
    }

    for endpoint in &endpoints {
        endpoint.validate().map_err(MonitorError::Config)?;
    }

    debug!("Loaded {} endpoints from {}", endpoints.len(), path.display());

    Ok(endpoints)
}
