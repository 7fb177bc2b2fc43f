//! # weavedrive-bridge
//!
//! The foreign-call surface that a deterministic, single-threaded guest uses
//! to read the storage network.
//!
//! A guest call arrives as a pointer/length pair into guest-owned memory.
//! The [`BridgeDispatcher`] reads the argument, hands the (cached) resolution
//! to a worker thread, and blocks the calling thread on the worker's
//! completion channel — the guest performs no other computation meanwhile,
//! which is exactly the contract a replayable engine needs. The result is
//! serialized to compact JSON and written back into guest memory.
//!
//! Absence of any kind — object not found, gateways exhausted, malformed
//! upstream data — comes back as an empty buffer the guest can branch on.
//! The single exception is a block request above the evaluation's
//! determinism ceiling, which aborts the evaluation instead of degrading:
//! two replicas that disagreed on chain head would otherwise silently
//! diverge.
//!
//! ## Example
//!
//! ```ignore
//! use weavedrive_bridge::{BridgeDispatcher, DriveConfig, LinearMemory};
//!
//! let config = DriveConfig::new("https://arweave.net,https://g8way.io", 1_500_000);
//! let drive = BridgeDispatcher::new(config)?;
//!
//! let mut memory = LinearMemory::new();
//! let arg = memory.push_argument("1439783");
//! let result = drive.get_block(&mut memory, arg.ptr, arg.len)?;
//! // memory[result] now holds {"indepHash":...,"height":1439783,"txs":[...]}
//! ```

pub mod config;
pub mod dispatch;
pub mod error;
pub mod join;
pub mod memory;

pub use config::DriveConfig;
pub use dispatch::{BridgeDispatcher, DriveCapability};
pub use error::BridgeError;
pub use memory::{GuestBuffer, GuestMemory, LinearMemory, MemoryError};
