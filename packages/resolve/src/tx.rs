//! Transaction resolution and legacy/current shape normalization.

use serde::Deserialize;
use tracing::warn;

use weavedrive_gateway::GatewayError;

use crate::address::derive_owner_address;
use crate::cache::{CachedObject, ObjectKind};
use crate::context::EvaluationContext;
use crate::error::ResolveError;
use crate::types::{Tag, Transaction};

/// Transaction shape as served by `tx/{id}`, covering both the legacy
/// (format 1) and current (format 2) encodings.
#[derive(Debug, Deserialize)]
struct TransactionWire {
    #[serde(default = "legacy_format")]
    format: u32,
    id: String,
    owner: String,
    #[serde(default)]
    target: String,
    #[serde(default)]
    quantity: String,
    #[serde(default)]
    tags: Vec<TagWire>,
    #[serde(default)]
    data_size: String,
}

#[derive(Debug, Deserialize)]
struct TagWire {
    name: String,
    value: String,
}

fn legacy_format() -> u32 {
    1
}

/// Resolve the transaction with `id`, memoized for the evaluation.
///
/// A missing transaction is `Ok(None)` — the guest receives an empty result
/// and may branch on it. The owner address is always derived from the owner
/// public key, never taken from the payload.
pub fn transaction_by_id(
    ctx: &EvaluationContext,
    id: &str,
) -> Result<Option<Transaction>, ResolveError> {
    let cached = ctx
        .cache()
        .get_or_resolve(ObjectKind::Transaction, id, || {
            Ok(fetch_transaction(ctx, id).map(CachedObject::Transaction))
        })?;

    match cached {
        Some(CachedObject::Transaction(tx)) => Ok(Some(tx)),
        None => Ok(None),
        Some(other) => Err(ResolveError::Cache {
            message: format!("transaction key resolved to {:?}", other),
        }),
    }
}

fn fetch_transaction(ctx: &EvaluationContext, id: &str) -> Option<Transaction> {
    let path = format!("tx/{}", id);
    let value = match ctx.client().fetch_json(&path) {
        Ok(value) => value,
        Err(GatewayError::NotFound) => return None,
        Err(e) => {
            warn!(evaluation = %ctx.id(), tx = id, error = %e, "transaction unavailable");
            return None;
        }
    };

    let wire = match serde_json::from_value::<TransactionWire>(value) {
        Ok(wire) => wire,
        Err(e) => {
            warn!(evaluation = %ctx.id(), tx = id, error = %e, "malformed transaction payload");
            return None;
        }
    };

    match normalize(wire) {
        Some(tx) => Some(tx),
        None => {
            warn!(evaluation = %ctx.id(), tx = id, "transaction owner key not decodable");
            None
        }
    }
}

/// Collapse the two wire encodings into one shape: the legacy encoding may
/// omit `data_size` and leave `quantity` empty where the current one carries
/// explicit values.
fn normalize(wire: TransactionWire) -> Option<Transaction> {
    let owner_address = derive_owner_address(&wire.owner).ok()?;

    let quantity = if wire.quantity.is_empty() {
        "0".to_string()
    } else {
        wire.quantity
    };
    let data_size = if wire.data_size.is_empty() {
        "0".to_string()
    } else {
        wire.data_size
    };

    Some(Transaction {
        format: wire.format,
        id: wire.id,
        owner: wire.owner,
        owner_address,
        target: wire.target,
        quantity,
        tags: wire
            .tags
            .into_iter()
            .map(|t| Tag {
                name: t.name,
                value: t.value,
            })
            .collect(),
        data_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: &str = "dGVzdC1vd25lci1wdWJsaWMta2V5LWJ5dGVz";
    const OWNER_ADDRESS: &str = "zTgZZjyQGfzNS1FJgFr23jsCoIqzZ8FxX_bextfIt-w";

    #[test]
    fn normalizes_current_format() {
        let wire: TransactionWire = serde_json::from_value(serde_json::json!({
            "format": 2,
            "id": "tx-1",
            "owner": OWNER,
            "target": "some-target",
            "quantity": "1000",
            "tags": [{"name": "QWN0aW9u", "value": "RXZhbA"}],
            "data_size": "512",
            "data_root": "r",
            "signature": "s"
        }))
        .unwrap();

        let tx = normalize(wire).unwrap();
        assert_eq!(tx.format, 2);
        assert_eq!(tx.owner_address, OWNER_ADDRESS);
        assert_eq!(tx.target, "some-target");
        assert_eq!(tx.quantity, "1000");
        assert_eq!(tx.data_size, "512");
        assert_eq!(tx.tags.len(), 1);
    }

    #[test]
    fn normalizes_legacy_format() {
        // Legacy objects omit `format` and `data_size` and may carry empty
        // target/quantity.
        let wire: TransactionWire = serde_json::from_value(serde_json::json!({
            "id": "tx-legacy",
            "owner": OWNER,
            "target": "",
            "quantity": ""
        }))
        .unwrap();

        let tx = normalize(wire).unwrap();
        assert_eq!(tx.format, 1);
        assert_eq!(tx.target, "");
        assert_eq!(tx.quantity, "0");
        assert_eq!(tx.data_size, "0");
        assert!(tx.tags.is_empty());
    }

    #[test]
    fn both_formats_share_one_shape() {
        let legacy: TransactionWire = serde_json::from_value(serde_json::json!({
            "id": "a", "owner": OWNER
        }))
        .unwrap();
        let current: TransactionWire = serde_json::from_value(serde_json::json!({
            "format": 2, "id": "b", "owner": OWNER, "quantity": "0", "data_size": "0"
        }))
        .unwrap();

        let legacy = normalize(legacy).unwrap();
        let current = normalize(current).unwrap();
        assert_eq!(legacy.quantity, current.quantity);
        assert_eq!(legacy.data_size, current.data_size);
    }

    #[test]
    fn undecodable_owner_is_rejected() {
        let wire: TransactionWire = serde_json::from_value(serde_json::json!({
            "id": "tx-bad",
            "owner": "not!valid!base64url"
        }))
        .unwrap();

        assert!(normalize(wire).is_none());
    }
}
