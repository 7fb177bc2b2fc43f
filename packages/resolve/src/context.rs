//! Evaluation-scoped state.

use uuid::Uuid;

use weavedrive_gateway::{GatewayClient, GatewayEndpoints};

use crate::cache::EvaluationCache;
use crate::error::ResolveError;

/// State owned by one evaluation: the gateway set, the determinism ceiling,
/// and the memoization cache.
///
/// A context is created when an evaluation starts and dropped when it
/// completes. Contexts are never shared across evaluations — a later
/// evaluation of the same process gets a fresh cache and re-reads the
/// gateway configuration, so nothing leaks between runs.
pub struct EvaluationContext {
    id: Uuid,
    client: GatewayClient,
    ceiling: u64,
    cache: EvaluationCache,
}

impl EvaluationContext {
    /// Build a context over the given endpoint list and ceiling.
    pub fn new(endpoints: GatewayEndpoints, ceiling: u64) -> Result<Self, ResolveError> {
        let client = GatewayClient::new(endpoints)?;
        Ok(Self::with_client(client, ceiling))
    }

    /// Build a context around an existing client (used by tests to inject a
    /// mock executor).
    pub fn with_client(client: GatewayClient, ceiling: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            client,
            ceiling,
            cache: EvaluationCache::new(),
        }
    }

    /// Log-correlation id for this evaluation. Not part of any deterministic
    /// output.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The maximum block height this evaluation may observe. Fixed at
    /// construction.
    pub fn ceiling(&self) -> u64 {
        self.ceiling
    }

    pub fn client(&self) -> &GatewayClient {
        &self.client
    }

    pub fn cache(&self) -> &EvaluationCache {
        &self.cache
    }
}
