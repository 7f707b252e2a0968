//! Endpoint descriptors and domain-key extraction

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One HTTP target to probe repeatedly.
///
/// Loaded once at startup and immutable for the process lifetime. Only
/// `url` is mandatory; `method` falls back to GET when absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoint {
    pub name: String,

    pub url: String,

    #[serde(default)]
    pub method: Option<String>,

    #[serde(default)]
    pub headers: HashMap<String, String>,

    #[serde(default)]
    pub body: Option<String>,
}

impl Endpoint {
    /// Create a descriptor with just a name and URL
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            method: None,
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Request method to use, defaulting to GET
    pub fn method(&self) -> &str {
        self.method.as_deref().unwrap_or("GET")
    }

    /// Aggregation key for this endpoint's URL
    pub fn domain(&self) -> Option<&str> {
        extract_domain(&self.url)
    }

    /// Validate the descriptor shape
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.name.is_empty() {
            return Err("endpoint name cannot be empty".to_string());
        }

        if self.url.is_empty() {
            return Err(format!("endpoint '{}' has an empty url", self.name));
        }

        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            return Err(format!(
                "endpoint '{}' url must be an absolute http:// or https:// URL, got '{}'",
                self.name, self.url
            ));
        }

        if extract_domain(&self.url).is_none() {
            return Err(format!(
                "endpoint '{}' url '{}' has no host to aggregate by",
                self.name, self.url
            ));
        }

        Ok(())
    }
}

/// Extract the authority (host, and port if present) from a URL.
///
/// The domain key is the substring between the scheme separator `//` and
/// the next `/`, or the end of the string. Returns `None` when the URL
/// has no separator or an empty authority.
pub fn extract_domain(url: &str) -> Option<&str> {
    let (_, rest) = url.split_once("//")?;
    let authority = rest.split('/').next().unwrap_or(rest);

    if authority.is_empty() {
        None
    } else {
        Some(authority)
    }
}
