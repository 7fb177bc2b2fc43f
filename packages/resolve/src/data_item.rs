//! Bundled data-item resolution via the query service.
//!
//! Bundled items are carried inside another transaction and cannot be
//! fetched by direct path; locating one requires a structured query against
//! the gateway's indexing metadata. Absence of query capability on every
//! configured endpoint is treated identically to absence of the item.

use serde::Deserialize;
use tracing::{debug, warn};

use weavedrive_gateway::GatewayError;

use crate::cache::{CachedObject, ObjectKind};
use crate::context::EvaluationContext;
use crate::error::ResolveError;
use crate::types::{BlockRef, DataItem, DATA_ITEM_FORMAT};

const ITEM_LOOKUP_QUERY: &str = "query($ids: [ID!]) { transactions(ids: $ids) { edges { node { \
                                 id recipient owner { address key } data { size } \
                                 block { id height } } } } }";

/// One match from the query service.
#[derive(Debug, Deserialize)]
struct ItemNode {
    id: String,
    #[serde(default)]
    recipient: Option<String>,
    #[serde(default)]
    owner: Option<ItemOwner>,
    #[serde(default)]
    data: Option<ItemData>,
    #[serde(default)]
    block: Option<ItemBlock>,
}

#[derive(Debug, Deserialize)]
struct ItemOwner {
    #[serde(default)]
    address: String,
}

#[derive(Debug, Deserialize)]
struct ItemData {
    #[serde(default)]
    size: String,
}

#[derive(Debug, Deserialize)]
struct ItemBlock {
    id: String,
    height: u64,
}

/// Header fields a gateway may serve for the item by direct path. Not every
/// gateway indexes bundled items this way, so every field is optional.
#[derive(Debug, Default, Deserialize)]
struct ItemHeaderWire {
    #[serde(default)]
    target: Option<String>,
    #[serde(default)]
    data_size: Option<String>,
}

/// Resolve the bundled item with `id`, memoized for the evaluation.
///
/// Returns `Ok(None)` when the query service has no match, when no
/// configured endpoint offers query capability, and when the item is not yet
/// contained in any block — all expected application outcomes, never
/// failures.
pub fn data_item_by_id(
    ctx: &EvaluationContext,
    id: &str,
) -> Result<Option<DataItem>, ResolveError> {
    let cached = ctx.cache().get_or_resolve(ObjectKind::DataItem, id, || {
        Ok(fetch_data_item(ctx, id).map(CachedObject::DataItem))
    })?;

    match cached {
        Some(CachedObject::DataItem(item)) => Ok(Some(item)),
        None => Ok(None),
        Some(other) => Err(ResolveError::Cache {
            message: format!("data-item key resolved to {:?}", other),
        }),
    }
}

fn fetch_data_item(ctx: &EvaluationContext, id: &str) -> Option<DataItem> {
    let node = locate(ctx, id)?;

    let block = match node.block {
        Some(block) => BlockRef {
            height: block.height,
            id: block.id,
        },
        None => {
            // Matched but not yet contained in a block: below any usable
            // ceiling, so absent from this evaluation's point of view.
            debug!(evaluation = %ctx.id(), item = id, "data item not yet in a block");
            return None;
        }
    };

    let headers = fetch_headers(ctx, id);

    let owner = node.owner.map(|o| o.address).unwrap_or_default();
    let target = headers
        .target
        .or(node.recipient)
        .unwrap_or_default();
    let size = headers
        .data_size
        .or(node.data.map(|d| d.size))
        .unwrap_or_default();

    Some(DataItem {
        format: DATA_ITEM_FORMAT,
        id: node.id,
        owner,
        target,
        size,
        block,
    })
}

/// Ask the query service which block (if any) contains the item.
fn locate(ctx: &EvaluationContext, id: &str) -> Option<ItemNode> {
    let body = serde_json::json!({
        "query": ITEM_LOOKUP_QUERY,
        "variables": { "ids": [id] },
    });

    let response = match ctx.client().post_graphql(&body) {
        Ok(response) => response,
        Err(GatewayError::NotFound) => {
            debug!(evaluation = %ctx.id(), item = id, "no query service at any gateway");
            return None;
        }
        Err(e) => {
            warn!(evaluation = %ctx.id(), item = id, error = %e, "query service unavailable");
            return None;
        }
    };

    let edges = match response
        .get("data")
        .and_then(|d| d.get("transactions"))
        .and_then(|t| t.get("edges"))
        .and_then(|e| e.as_array())
    {
        Some(edges) => edges.clone(),
        None => {
            warn!(evaluation = %ctx.id(), item = id, "malformed query-service response");
            return None;
        }
    };

    let node_value = edges.first()?.get("node")?.clone();
    match serde_json::from_value::<ItemNode>(node_value) {
        Ok(node) => Some(node),
        Err(e) => {
            warn!(evaluation = %ctx.id(), item = id, error = %e, "malformed query-service node");
            None
        }
    }
}

/// Fetch the item's header fields by direct path where the gateway serves
/// them; the query-service node fills any gap.
fn fetch_headers(ctx: &EvaluationContext, id: &str) -> ItemHeaderWire {
    let path = format!("tx/{}", id);
    match ctx.client().fetch_json(&path) {
        Ok(value) => serde_json::from_value(value).unwrap_or_default(),
        Err(e) => {
            debug!(evaluation = %ctx.id(), item = id, error = %e, "no direct item headers");
            ItemHeaderWire::default()
        }
    }
}
