//! Single-shot HTTP probing and health classification

use crate::endpoint::Endpoint;
use crate::errors::Result;
use reqwest::{Client, Method};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Per-request timeout; a probe never blocks longer than this
const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// A response slower than this is unhealthy even with a 2xx status
const LATENCY_BUDGET: Duration = Duration::from_millis(500);

/// Result of a single probe.
#[derive(Debug, Clone)]
pub struct ProbeOutcome {
    /// Whether the endpoint counts as up
    pub healthy: bool,
    /// Wall-clock time from request start to response receipt
    pub latency: Duration,
    /// Response status code, when a response was received
    pub status: Option<u16>,
    /// Transport or construction error message, when the request failed
    pub error: Option<String>,
}

impl ProbeOutcome {
    /// The request could not be constructed; no time was spent on the wire
    fn construction_failure(error: String) -> Self {
        Self {
            healthy: false,
            latency: Duration::ZERO,
            status: None,
            error: Some(error),
        }
    }
}

/// Issues one HTTP request per invocation and classifies the outcome.
///
/// A probe is healthy only when the request completed without a
/// transport error, the status is 2xx, and the response arrived within
/// the latency budget. Never retries.
#[derive(Debug, Clone)]
pub struct Prober {
    client: Client,
}

impl Prober {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(PROBE_TIMEOUT)
            .user_agent(format!("uptime_monitor/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }

    /// Probe a single endpoint.
    ///
    /// Failures never escalate past this call; they come back as a down
    /// outcome with the error message attached.
    pub async fn probe(&self, endpoint: &Endpoint) -> ProbeOutcome {
        let method = match Method::from_bytes(endpoint.method().as_bytes()) {
            Ok(method) => method,
            Err(e) => {
                warn!(
                    "Failed to create request for endpoint '{}': invalid method '{}': {}",
                    endpoint.name,
                    endpoint.method(),
                    e
                );
                return ProbeOutcome::construction_failure(format!(
                    "invalid method '{}': {}",
                    endpoint.method(),
                    e
                ));
            }
        };

        let mut builder = self.client.request(method, &endpoint.url);

        for (key, value) in &endpoint.headers {
            builder = builder.header(key, value);
        }

        if let Some(body) = &endpoint.body {
            builder = builder.body(body.clone());
        }

        // Construction errors (bad URL, bad header name) surface here
        // rather than on the wire, so the latency stays at zero.
        let request = match builder.build() {
            Ok(request) => request,
            Err(e) => {
                warn!(
                    "Failed to create request for endpoint '{}': {}",
                    endpoint.name, e
                );
                return ProbeOutcome::construction_failure(e.to_string());
            }
        };

        let start = Instant::now();

        match self.client.execute(request).await {
            Ok(response) => {
                let latency = start.elapsed();
                let status = response.status();
                let healthy = status.is_success() && latency <= LATENCY_BUDGET;

                debug!(
                    "Probed endpoint '{}': status {}, {}ms",
                    endpoint.name,
                    status.as_u16(),
                    latency.as_millis()
                );

                ProbeOutcome {
                    healthy,
                    latency,
                    status: Some(status.as_u16()),
                    error: None,
                }
            }
            Err(e) => {
                let latency = start.elapsed();
                warn!("Probe of endpoint '{}' failed: {}", endpoint.name, e);

                ProbeOutcome {
                    healthy: false,
                    latency,
                    status: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fast_2xx_is_up() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let prober = Prober::new().unwrap();
        let endpoint = Endpoint::new("ok", format!("{}/health", server.uri()));
        let outcome = prober.probe(&endpoint).await;

        assert!(outcome.healthy);
        assert_eq!(outcome.status, Some(200));
        assert!(outcome.error.is_none());
        assert!(outcome.latency <= LATENCY_BUDGET);
    }

    #[tokio::test]
    async fn test_slow_2xx_is_down() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(600)))
            .mount(&server)
            .await;

        let prober = Prober::new().unwrap();
        let endpoint = Endpoint::new("slow", format!("{}/slow", server.uri()));
        let outcome = prober.probe(&endpoint).await;

        assert!(!outcome.healthy);
        assert_eq!(outcome.status, Some(200));
        assert!(outcome.latency > LATENCY_BUDGET);
    }

    #[tokio::test]
    async fn test_non_2xx_is_down() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/broken"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let prober = Prober::new().unwrap();
        let endpoint = Endpoint::new("broken", format!("{}/broken", server.uri()));
        let outcome = prober.probe(&endpoint).await;

        assert!(!outcome.healthy);
        assert_eq!(outcome.status, Some(503));
    }

    #[tokio::test]
    async fn test_transport_error_is_down() {
        // Nothing listens on the server once it is dropped
        let server = MockServer::start().await;
        let url = format!("{}/health", server.uri());
        drop(server);

        let prober = Prober::new().unwrap();
        let endpoint = Endpoint::new("gone", url);
        let outcome = prober.probe(&endpoint).await;

        assert!(!outcome.healthy);
        assert!(outcome.status.is_none());
        assert!(outcome.error.is_some());
    }

    #[tokio::test]
    async fn test_invalid_method_is_down_with_zero_latency() {
        let prober = Prober::new().unwrap();
        let endpoint =
            Endpoint::new("bad", "https://example.com/").with_method("NOT A METHOD");
        let outcome = prober.probe(&endpoint).await;

        assert!(!outcome.healthy);
        assert_eq!(outcome.latency, Duration::ZERO);
        assert!(outcome.status.is_none());
        assert!(outcome.error.is_some());
    }

    #[tokio::test]
    async fn test_descriptor_method_headers_and_body_are_sent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/submit"))
            .and(header("x-check", "uptime"))
            .and(body_string("{\"check\":true}"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let prober = Prober::new().unwrap();
        let endpoint = Endpoint::new("submit", format!("{}/submit", server.uri()))
            .with_method("POST")
            .with_header("x-check", "uptime")
            .with_body("{\"check\":true}");
        let outcome = prober.probe(&endpoint).await;

        assert!(outcome.healthy);
        assert_eq!(outcome.status, Some(204));
    }
}
