/// Failure of a single request against a single endpoint.
///
/// These never leave the crate as-is; [`crate::GatewayClient`] consumes them
/// while walking the endpoint list and reports a [`GatewayError`] once the
/// list is exhausted.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The endpoint could not be reached (connect failure, timeout, ...).
    #[error("network error: {message}")]
    Network { message: String },

    /// The endpoint answered with a non-2xx status.
    #[error("unexpected status {status}")]
    Status { status: u16 },

    /// The endpoint answered 2xx but the body was not valid JSON.
    #[error("malformed body: {message}")]
    MalformedBody { message: String },
}

impl FetchError {
    /// Whether this attempt was an authoritative "object absent" answer.
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::Status { status: 404 })
    }
}

/// Outcome of a fetch after the whole endpoint list has been walked.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// A configured endpoint entry failed to parse as a base URL.
    #[error("invalid gateway url '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    /// The configured endpoint list was empty.
    #[error("no gateway endpoints configured")]
    NoEndpoints,

    /// At least one reachable endpoint answered 404 and none answered 2xx.
    #[error("object not served by any configured gateway")]
    NotFound,

    /// Every endpoint failed without an authoritative 404.
    #[error("all {attempted} gateway endpoints exhausted")]
    AllEndpointsExhausted { attempted: usize },

    /// The HTTP client itself could not be constructed.
    #[error("http client error: {message}")]
    Client { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_only_404() {
        assert!(FetchError::Status { status: 404 }.is_not_found());
        assert!(!FetchError::Status { status: 500 }.is_not_found());
        assert!(!FetchError::Network {
            message: "refused".to_string()
        }
        .is_not_found());
    }

    #[test]
    fn gateway_error_display() {
        let e = GatewayError::AllEndpointsExhausted { attempted: 2 };
        assert!(format!("{}", e).contains("2"));

        let e = GatewayError::InvalidUrl {
            url: "not a url".to_string(),
            message: "relative URL without a base".to_string(),
        };
        assert!(format!("{}", e).contains("not a url"));
    }
}
