//! Evaluation configuration values.

use std::time::Duration;

use weavedrive_gateway::{GatewayEndpoints, GatewayError};

/// Configuration consumed from the evaluation environment.
///
/// The harness owns *loading* these values (environment, message tags,
/// wherever they live); the bridge only consumes the materialized result.
/// There is no global configuration state — every evaluation is handed its
/// own `DriveConfig`.
#[derive(Debug, Clone)]
pub struct DriveConfig {
    /// Comma-separated ordered gateway base URLs; first reachable wins per
    /// request.
    pub gateway_urls: String,

    /// Maximum block height visible to `get_block` in this evaluation.
    pub ceiling: u64,

    /// Per-attempt gateway timeout override.
    pub attempt_timeout: Option<Duration>,
}

impl DriveConfig {
    pub fn new(gateway_urls: impl Into<String>, ceiling: u64) -> Self {
        Self {
            gateway_urls: gateway_urls.into(),
            ceiling,
            attempt_timeout: None,
        }
    }

    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = Some(timeout);
        self
    }

    /// Materialize the endpoint policy from the configured list.
    pub fn endpoints(&self) -> Result<GatewayEndpoints, GatewayError> {
        let endpoints = GatewayEndpoints::parse(&self.gateway_urls)?;
        Ok(match self.attempt_timeout {
            Some(timeout) => endpoints.with_attempt_timeout(timeout),
            None => endpoints,
        })
    }
}
