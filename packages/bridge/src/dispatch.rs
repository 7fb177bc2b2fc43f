//! The dispatcher behind the guest's foreign calls.

use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use weavedrive_resolve::{
    block_by_height, data_item_by_id, transaction_by_id, EvaluationContext, ResolveError,
};

use crate::config::DriveConfig;
use crate::error::BridgeError;
use crate::join::block_on_fetch;
use crate::memory::{read_argument, GuestBuffer, GuestMemory};

/// The capability surface injected into the guest engine.
///
/// The engine is constructed with some implementation of this trait; there
/// is no registry to look extensions up in by name. Each call takes the
/// guest's memory and the argument's location, and returns the location of
/// the result buffer — empty for every kind of absence.
pub trait DriveCapability {
    fn get_block(
        &self,
        memory: &mut dyn GuestMemory,
        ptr: u32,
        len: u32,
    ) -> Result<GuestBuffer, BridgeError>;

    fn get_tx(
        &self,
        memory: &mut dyn GuestMemory,
        ptr: u32,
        len: u32,
    ) -> Result<GuestBuffer, BridgeError>;

    fn get_data_item(
        &self,
        memory: &mut dyn GuestMemory,
        ptr: u32,
        len: u32,
    ) -> Result<GuestBuffer, BridgeError>;
}

/// Dispatcher over one evaluation's context.
///
/// Owns the [`EvaluationContext`] for the lifetime of the evaluation; drop
/// the dispatcher and the cache dies with it. Each foreign call reads its
/// argument from guest memory, blocks on the fetch worker, and writes the
/// serialized result (or the empty buffer) back.
pub struct BridgeDispatcher {
    ctx: Arc<EvaluationContext>,
}

impl BridgeDispatcher {
    /// Build a dispatcher for one evaluation from its configuration.
    pub fn new(config: DriveConfig) -> Result<Self, BridgeError> {
        let endpoints = config
            .endpoints()
            .map_err(|e| BridgeError::Setup(ResolveError::Gateway(e)))?;
        let ctx =
            EvaluationContext::new(endpoints, config.ceiling).map_err(BridgeError::Setup)?;
        Ok(Self::with_context(ctx))
    }

    /// Wrap an existing context (used by tests and custom harnesses).
    pub fn with_context(ctx: EvaluationContext) -> Self {
        Self { ctx: Arc::new(ctx) }
    }

    pub fn context(&self) -> &EvaluationContext {
        &self.ctx
    }

    fn dispatch_block(
        &self,
        memory: &mut dyn GuestMemory,
        ptr: u32,
        len: u32,
    ) -> Result<GuestBuffer, BridgeError> {
        let argument = read_argument(memory, ptr, len)?;

        let height: u64 = match argument.trim().parse() {
            Ok(height) => height,
            Err(_) => {
                // Both replicas see the same malformed argument and the same
                // empty answer, so this cannot cause divergence.
                warn!(evaluation = %self.ctx.id(), argument, "non-numeric block height");
                return write_empty(memory);
            }
        };

        let ctx = Arc::clone(&self.ctx);
        let outcome = block_on_fetch(move || block_by_height(&ctx, height))?;
        self.deliver(memory, outcome)
    }

    fn dispatch_tx(
        &self,
        memory: &mut dyn GuestMemory,
        ptr: u32,
        len: u32,
    ) -> Result<GuestBuffer, BridgeError> {
        let id = read_argument(memory, ptr, len)?;
        let ctx = Arc::clone(&self.ctx);
        let outcome = block_on_fetch(move || transaction_by_id(&ctx, &id))?;
        self.deliver(memory, outcome)
    }

    fn dispatch_data_item(
        &self,
        memory: &mut dyn GuestMemory,
        ptr: u32,
        len: u32,
    ) -> Result<GuestBuffer, BridgeError> {
        let id = read_argument(memory, ptr, len)?;
        let ctx = Arc::clone(&self.ctx);
        let outcome = block_on_fetch(move || data_item_by_id(&ctx, &id))?;
        self.deliver(memory, outcome)
    }

    /// Write a resolution into guest memory.
    ///
    /// Success becomes compact JSON; absence and recoverable failures become
    /// the empty buffer. The ceiling violation is the one outcome that
    /// propagates as an error — it must abort the evaluation, not masquerade
    /// as absence.
    fn deliver<T: Serialize>(
        &self,
        memory: &mut dyn GuestMemory,
        outcome: Result<Option<T>, ResolveError>,
    ) -> Result<GuestBuffer, BridgeError> {
        match outcome {
            Ok(Some(value)) => match serde_json::to_vec(&value) {
                Ok(bytes) => Ok(memory.write_bytes(&bytes)?),
                Err(e) => {
                    warn!(evaluation = %self.ctx.id(), error = %e, "result serialization failed");
                    write_empty(memory)
                }
            },
            Ok(None) => write_empty(memory),
            Err(ResolveError::CeilingExceeded { requested, ceiling }) => {
                Err(BridgeError::DeterminismViolation { requested, ceiling })
            }
            Err(e) => {
                warn!(evaluation = %self.ctx.id(), error = %e, "recoverable resolver failure");
                write_empty(memory)
            }
        }
    }
}

fn write_empty(memory: &mut dyn GuestMemory) -> Result<GuestBuffer, BridgeError> {
    Ok(memory.write_bytes(&[])?)
}

impl DriveCapability for BridgeDispatcher {
    fn get_block(
        &self,
        memory: &mut dyn GuestMemory,
        ptr: u32,
        len: u32,
    ) -> Result<GuestBuffer, BridgeError> {
        self.dispatch_block(memory, ptr, len)
    }

    fn get_tx(
        &self,
        memory: &mut dyn GuestMemory,
        ptr: u32,
        len: u32,
    ) -> Result<GuestBuffer, BridgeError> {
        self.dispatch_tx(memory, ptr, len)
    }

    fn get_data_item(
        &self,
        memory: &mut dyn GuestMemory,
        ptr: u32,
        len: u32,
    ) -> Result<GuestBuffer, BridgeError> {
        self.dispatch_data_item(memory, ptr, len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::LinearMemory;

    fn dispatcher(urls: &str, ceiling: u64) -> BridgeDispatcher {
        BridgeDispatcher::new(DriveConfig::new(urls, ceiling)).unwrap()
    }

    #[test]
    fn setup_fails_on_bad_gateway_list() {
        let result = BridgeDispatcher::new(DriveConfig::new("", 1));
        assert!(matches!(result, Err(BridgeError::Setup(_))));
    }

    #[test]
    fn non_numeric_height_is_the_empty_buffer() {
        let drive = dispatcher("https://arweave.net", 1000);
        let mut memory = LinearMemory::new();
        let arg = memory.push_argument("not-a-height");

        let result = drive.get_block(&mut memory, arg.ptr, arg.len).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn ceiling_violation_propagates_before_any_fetch() {
        // No reachable gateway needed: the ceiling check fires first.
        let drive = dispatcher("http://127.0.0.1:1", 1000);
        let mut memory = LinearMemory::new();
        let arg = memory.push_argument("1001");

        let result = drive.get_block(&mut memory, arg.ptr, arg.len);
        assert!(matches!(
            result,
            Err(BridgeError::DeterminismViolation {
                requested: 1001,
                ceiling: 1000
            })
        ));
    }

    #[test]
    fn unreadable_argument_is_a_memory_fault() {
        let drive = dispatcher("https://arweave.net", 1000);
        let mut memory = LinearMemory::new();

        let result = drive.get_block(&mut memory, 1000, 8);
        assert!(matches!(result, Err(BridgeError::Memory(_))));
    }
}
