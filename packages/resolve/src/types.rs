//! Storage-network object model, in the shape handed back to the guest.
//!
//! Wire-format structs live next to the resolver that parses them; these are
//! the normalized results. Serialization uses the guest-facing key names
//! (`indepHash`, `ownerAddress`, ...), so `serde_json::to_string` on any of
//! these is the exact text written into guest memory.

use serde::{Deserialize, Serialize};

/// The bundled-item format tag.
pub const DATA_ITEM_FORMAT: u32 = 3;

/// An ordered, hash-identified batch of transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    #[serde(rename = "indepHash")]
    pub indep_hash: String,
    pub height: u64,
    pub txs: Vec<String>,
}

/// A name/value tag pair, as returned by the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub value: String,
}

/// A signed storage-network transaction, normalized across the legacy
/// (format 1) and current (format 2) encodings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub format: u32,
    pub id: String,
    /// Owner public key, base64url as carried on the wire.
    pub owner: String,
    /// Derived from `owner`; never supplied independently.
    pub owner_address: String,
    pub target: String,
    pub quantity: String,
    pub tags: Vec<Tag>,
    pub data_size: String,
}

/// Reference to the block containing an object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRef {
    pub height: u64,
    pub id: String,
}

/// A bundled data item, located via the query service.
///
/// An item that cannot be located has no instance — absence is `None`, never
/// a zero-valued `DataItem`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataItem {
    pub format: u32,
    pub id: String,
    /// Owner address (not the public key).
    pub owner: String,
    pub target: String,
    pub size: String,
    pub block: BlockRef,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_serializes_with_guest_key_names() {
        let block = Block {
            indep_hash: "abc".to_string(),
            height: 7,
            txs: vec!["t1".to_string()],
        };
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["indepHash"], "abc");
        assert!(json.get("indep_hash").is_none());
    }

    #[test]
    fn transaction_serializes_camel_case() {
        let tx = Transaction {
            format: 2,
            id: "id".to_string(),
            owner: "owner".to_string(),
            owner_address: "addr".to_string(),
            target: "tgt".to_string(),
            quantity: "0".to_string(),
            tags: vec![],
            data_size: "123".to_string(),
        };
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["ownerAddress"], "addr");
        assert_eq!(json["dataSize"], "123");
    }

    #[test]
    fn data_item_carries_block_reference() {
        let item = DataItem {
            format: DATA_ITEM_FORMAT,
            id: "item".to_string(),
            owner: "addr".to_string(),
            target: "".to_string(),
            size: "11".to_string(),
            block: BlockRef {
                height: 1290333,
                id: "blk".to_string(),
            },
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["format"], 3);
        assert_eq!(json["block"]["height"], 1290333);
    }
}
