//! WeaveDrive: deterministic read access to the permanent storage network
//! for replayable guest processes.
//!
//! A guest asks three questions — what transactions are in block H, what are
//! the fields of transaction T, where is bundled item D stored — and gets
//! answers that are safe to treat as part of its deterministic state
//! transition: cached per evaluation, capped at the evaluation's block
//! ceiling, and uniform about absence.

pub use weavedrive_bridge::{
    BridgeDispatcher, BridgeError, DriveCapability, DriveConfig, GuestBuffer, GuestMemory,
    LinearMemory, MemoryError,
};
pub use weavedrive_gateway::{GatewayClient, GatewayEndpoints, GatewayError};
pub use weavedrive_resolve::{
    block_by_height, data_item_by_id, transaction_by_id, Block, BlockRef, DataItem,
    EvaluationCache, EvaluationContext, ResolveError, Tag, Transaction,
};
