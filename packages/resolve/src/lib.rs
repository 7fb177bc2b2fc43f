//! # weavedrive-resolve
//!
//! Typed read access to storage-network objects, scoped to one evaluation.
//!
//! The resolvers in this crate turn gateway JSON into [`Block`],
//! [`Transaction`], and [`DataItem`] values, memoized in an
//! [`EvaluationCache`] so that repeated lookups within one evaluation are
//! observably identical and cost at most one upstream round trip per key.
//!
//! Absence is a value here: a missing object resolves to `Ok(None)`, and so
//! does an unreachable gateway set or a malformed upstream payload. The one
//! hard failure is [`ResolveError::CeilingExceeded`] — a block request above
//! the evaluation's determinism ceiling — which must abort the evaluation
//! instead of degrading to absence.

pub mod address;
pub mod block;
pub mod cache;
pub mod context;
pub mod data_item;
pub mod error;
pub mod tx;
pub mod types;

pub use block::block_by_height;
pub use cache::{CachedObject, EvaluationCache, ObjectKind};
pub use context::EvaluationContext;
pub use data_item::data_item_by_id;
pub use error::ResolveError;
pub use tx::transaction_by_id;
pub use types::{Block, BlockRef, DataItem, Tag, Transaction};
