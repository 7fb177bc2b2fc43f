//! HTTP execution abstraction for testing.
//!
//! This module provides a trait for HTTP execution that can be mocked in
//! tests, avoiding the need for actual network calls.

use std::time::Duration;

use url::Url;

use crate::error::FetchError;

/// Trait for executing single HTTP requests against one endpoint.
///
/// Implementations can use real HTTP clients or mock responses for testing.
/// A non-2xx status and a body that fails to parse as JSON are both errors at
/// this seam; classifying them is the caller's job.
pub trait HttpExecutor: Send + Sync {
    /// GET the URL and parse the body as JSON.
    fn get_json(&self, url: &Url) -> Result<serde_json::Value, FetchError>;

    /// POST a JSON body to the URL and parse the response body as JSON.
    fn post_json(
        &self,
        url: &Url,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, FetchError>;
}

/// Production HTTP executor using reqwest's blocking client.
pub struct ReqwestExecutor {
    client: reqwest::blocking::Client,
}

impl ReqwestExecutor {
    /// Create a new executor with the given per-request timeout.
    pub fn new(timeout: Duration) -> Result<Self, String> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| e.to_string())?;

        Ok(Self { client })
    }

    fn read_json(response: reqwest::blocking::Response) -> Result<serde_json::Value, FetchError> {
        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            return Err(FetchError::Status { status });
        }

        let body_text = response.text().map_err(|e| FetchError::Network {
            message: e.to_string(),
        })?;

        serde_json::from_str(&body_text).map_err(|e| FetchError::MalformedBody {
            message: e.to_string(),
        })
    }
}

impl HttpExecutor for ReqwestExecutor {
    fn get_json(&self, url: &Url) -> Result<serde_json::Value, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| FetchError::Network {
                message: e.to_string(),
            })?;
        Self::read_json(response)
    }

    fn post_json(
        &self,
        url: &Url,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, FetchError> {
        let response = self
            .client
            .post(url.clone())
            .json(body)
            .send()
            .map_err(|e| FetchError::Network {
                message: e.to_string(),
            })?;
        Self::read_json(response)
    }
}
