use weavedrive_gateway::GatewayError;

/// Errors surfaced by the resolution layer.
///
/// Recoverable conditions (object absent, gateways exhausted, malformed
/// upstream payload) are not errors at this layer — they resolve to
/// `Ok(None)`. What remains is the determinism ceiling, configuration
/// problems, and internal cache faults.
#[derive(thiserror::Error, Debug, Clone)]
pub enum ResolveError {
    /// A block above the evaluation's anchor height was requested. Fatal:
    /// two replays could otherwise observe different chains.
    #[error("block height {requested} exceeds evaluation ceiling {ceiling}")]
    CeilingExceeded { requested: u64, ceiling: u64 },

    /// Gateway configuration or client construction failed.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// The evaluation cache is unusable (poisoned lock, kind mismatch).
    #[error("evaluation cache fault: {message}")]
    Cache { message: String },
}
