//! Ordered gateway endpoint policy.
//!
//! The endpoint list is parsed once from the evaluation's gateway-list value
//! and never changes afterwards; position in the list is fallback priority.

use std::time::Duration;

use url::Url;

use crate::error::GatewayError;

const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(30);

/// An ordered list of gateway base URLs plus the per-attempt timeout.
///
/// The first endpoint that returns a well-formed answer wins; the decision is
/// made independently for every request.
#[derive(Debug, Clone)]
pub struct GatewayEndpoints {
    urls: Vec<Url>,
    attempt_timeout: Duration,
}

impl GatewayEndpoints {
    /// Parse a comma-separated list of base URLs, preserving order.
    ///
    /// Empty entries are skipped; a malformed entry is a configuration error
    /// rather than something to silently drop, since two replicas must agree
    /// on the effective endpoint list.
    pub fn parse(list: &str) -> Result<Self, GatewayError> {
        let mut urls = Vec::new();
        for entry in list.split(',') {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            let url = Url::parse(entry).map_err(|e| GatewayError::InvalidUrl {
                url: entry.to_string(),
                message: e.to_string(),
            })?;
            urls.push(url);
        }

        if urls.is_empty() {
            return Err(GatewayError::NoEndpoints);
        }

        Ok(Self {
            urls,
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
        })
    }

    /// Override the per-attempt timeout (default 30 seconds).
    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    /// Resolve a request path against a base URL.
    ///
    /// The base is treated as a directory whether or not it carries a
    /// trailing slash, so `https://arweave.net` and `https://arweave.net/`
    /// behave identically.
    pub fn join(base: &Url, path: &str) -> Result<Url, GatewayError> {
        let mut base = base.clone();
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }
        base.join(path.trim_start_matches('/'))
            .map_err(|e| GatewayError::InvalidUrl {
                url: format!("{}{}", base, path),
                message: e.to_string(),
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Url> {
        self.urls.iter()
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn attempt_timeout(&self) -> Duration {
        self.attempt_timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_single() {
        let endpoints = GatewayEndpoints::parse("https://arweave.net").unwrap();
        assert_eq!(endpoints.len(), 1);
    }

    #[test]
    fn parse_preserves_order() {
        let endpoints = GatewayEndpoints::parse("https://arweave.net,https://g8way.io").unwrap();
        let urls: Vec<String> = endpoints.iter().map(|u| u.to_string()).collect();
        assert_eq!(urls, vec!["https://arweave.net/", "https://g8way.io/"]);
    }

    #[test]
    fn parse_skips_empty_entries() {
        let endpoints = GatewayEndpoints::parse("https://arweave.net, ,https://g8way.io,").unwrap();
        assert_eq!(endpoints.len(), 2);
    }

    #[test]
    fn parse_rejects_malformed_entry() {
        let result = GatewayEndpoints::parse("https://arweave.net,not a url");
        assert!(matches!(result, Err(GatewayError::InvalidUrl { .. })));
    }

    #[test]
    fn parse_rejects_empty_list() {
        assert!(matches!(
            GatewayEndpoints::parse(""),
            Err(GatewayError::NoEndpoints)
        ));
        assert!(matches!(
            GatewayEndpoints::parse(" , "),
            Err(GatewayError::NoEndpoints)
        ));
    }

    #[test]
    fn join_with_and_without_trailing_slash() {
        let bare = Url::parse("https://arweave.net").unwrap();
        let slashed = Url::parse("https://arweave.net/").unwrap();
        assert_eq!(
            GatewayEndpoints::join(&bare, "tx/abc").unwrap().as_str(),
            "https://arweave.net/tx/abc"
        );
        assert_eq!(
            GatewayEndpoints::join(&slashed, "tx/abc").unwrap().as_str(),
            "https://arweave.net/tx/abc"
        );
    }

    #[test]
    fn join_keeps_base_path() {
        let base = Url::parse("http://127.0.0.1:8080/gateway").unwrap();
        assert_eq!(
            GatewayEndpoints::join(&base, "block/height/1")
                .unwrap()
                .as_str(),
            "http://127.0.0.1:8080/gateway/block/height/1"
        );
    }

    #[test]
    fn custom_attempt_timeout() {
        let endpoints = GatewayEndpoints::parse("https://arweave.net")
            .unwrap()
            .with_attempt_timeout(Duration::from_secs(5));
        assert_eq!(endpoints.attempt_timeout(), Duration::from_secs(5));
    }
}
