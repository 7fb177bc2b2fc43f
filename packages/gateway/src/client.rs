//! Gateway client with sequential multi-endpoint fallback.

use tracing::{debug, warn};
use url::Url;

use crate::endpoints::GatewayEndpoints;
use crate::error::{FetchError, GatewayError};
use crate::executor::{HttpExecutor, ReqwestExecutor};

const QUERY_SERVICE_PATH: &str = "graphql";

/// Read-only client over an ordered gateway endpoint list.
///
/// Every request walks the list from the front and returns the first
/// well-formed JSON answer. Attempts are strictly sequential; endpoints are
/// never raced. The client is stateless across calls — caching belongs to the
/// evaluation layer above it.
pub struct GatewayClient {
    endpoints: GatewayEndpoints,
    executor: Box<dyn HttpExecutor>,
}

impl GatewayClient {
    /// Create a client backed by a blocking reqwest executor with the
    /// endpoint list's per-attempt timeout.
    pub fn new(endpoints: GatewayEndpoints) -> Result<Self, GatewayError> {
        let executor = ReqwestExecutor::new(endpoints.attempt_timeout())
            .map_err(|message| GatewayError::Client { message })?;
        Ok(Self {
            endpoints,
            executor: Box::new(executor),
        })
    }

    /// Create a client with a custom executor (used by tests).
    pub fn with_executor(endpoints: GatewayEndpoints, executor: Box<dyn HttpExecutor>) -> Self {
        Self {
            endpoints,
            executor,
        }
    }

    pub fn endpoints(&self) -> &GatewayEndpoints {
        &self.endpoints
    }

    /// GET `path` relative to each endpoint in order; first well-formed JSON
    /// answer wins.
    pub fn fetch_json(&self, path: &str) -> Result<serde_json::Value, GatewayError> {
        self.walk(path, |url| self.executor.get_json(url))
    }

    /// POST a query-service request to each endpoint in order.
    ///
    /// An endpoint without query-service capability fails its attempt like
    /// any other unreachable endpoint; the caller sees `NotFound` or
    /// `AllEndpointsExhausted`, never a hang.
    pub fn post_graphql(
        &self,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, GatewayError> {
        self.walk(QUERY_SERVICE_PATH, |url| self.executor.post_json(url, body))
    }

    fn walk<F>(&self, path: &str, attempt: F) -> Result<serde_json::Value, GatewayError>
    where
        F: Fn(&Url) -> Result<serde_json::Value, FetchError>,
    {
        let mut saw_not_found = false;

        for base in self.endpoints.iter() {
            let url = match GatewayEndpoints::join(base, path) {
                Ok(url) => url,
                Err(e) => {
                    warn!(gateway = %base, path, error = %e, "skipping unjoinable gateway url");
                    continue;
                }
            };

            debug!(url = %url, "gateway attempt");
            match attempt(&url) {
                Ok(value) => return Ok(value),
                Err(e) if e.is_not_found() => {
                    // Authoritative absence from this gateway; a later one
                    // may still carry the object.
                    debug!(url = %url, "gateway answered 404");
                    saw_not_found = true;
                }
                Err(e) => {
                    warn!(url = %url, error = %e, "gateway attempt failed, advancing");
                }
            }
        }

        if saw_not_found {
            Err(GatewayError::NotFound)
        } else {
            Err(GatewayError::AllEndpointsExhausted {
                attempted: self.endpoints.len(),
            })
        }
    }
}
