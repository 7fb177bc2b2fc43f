//! Block resolution.

use serde::Deserialize;
use tracing::warn;

use weavedrive_gateway::GatewayError;

use crate::cache::{CachedObject, ObjectKind};
use crate::context::EvaluationContext;
use crate::error::ResolveError;
use crate::types::Block;

/// Block shape as served by `block/height/{height}`.
#[derive(Debug, Deserialize)]
struct BlockWire {
    indep_hash: String,
    height: u64,
    #[serde(default)]
    txs: Vec<String>,
}

/// Resolve the block at `height`, memoized for the evaluation.
///
/// A height above the context's ceiling is a hard error: the evaluation is
/// anchored at the ceiling, and letting it observe anything newer would make
/// replays diverge. Everything else — missing block, exhausted gateways,
/// malformed payload — degrades to `Ok(None)`.
pub fn block_by_height(
    ctx: &EvaluationContext,
    height: u64,
) -> Result<Option<Block>, ResolveError> {
    if height > ctx.ceiling() {
        return Err(ResolveError::CeilingExceeded {
            requested: height,
            ceiling: ctx.ceiling(),
        });
    }

    let cached = ctx
        .cache()
        .get_or_resolve(ObjectKind::Block, &height.to_string(), || {
            Ok(fetch_block(ctx, height).map(CachedObject::Block))
        })?;

    match cached {
        Some(CachedObject::Block(block)) => Ok(Some(block)),
        None => Ok(None),
        Some(other) => Err(ResolveError::Cache {
            message: format!("block key resolved to {:?}", other),
        }),
    }
}

fn fetch_block(ctx: &EvaluationContext, height: u64) -> Option<Block> {
    let path = format!("block/height/{}", height);
    let value = match ctx.client().fetch_json(&path) {
        Ok(value) => value,
        Err(GatewayError::NotFound) => return None,
        Err(e) => {
            warn!(evaluation = %ctx.id(), height, error = %e, "block unavailable");
            return None;
        }
    };

    match serde_json::from_value::<BlockWire>(value) {
        Ok(wire) => Some(Block {
            indep_hash: wire.indep_hash,
            height: wire.height,
            txs: wire.txs,
        }),
        Err(e) => {
            warn!(evaluation = %ctx.id(), height, error = %e, "malformed block payload");
            None
        }
    }
}
