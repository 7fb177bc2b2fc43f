//! # weavedrive-gateway
//!
//! HTTP read access to a storage-network gateway set.
//!
//! A gateway serves block, transaction, and query-service lookups over plain
//! HTTP. More than one gateway may be configured; this crate walks them in
//! priority order and returns the first well-formed answer.
//!
//! ## Example
//!
//! ```ignore
//! use weavedrive_gateway::{GatewayClient, GatewayEndpoints};
//!
//! let endpoints = GatewayEndpoints::parse("https://arweave.net,https://g8way.io")?;
//! let client = GatewayClient::new(endpoints)?;
//!
//! // Walks the endpoint list until one returns well-formed JSON.
//! let block = client.fetch_json("block/height/1439783")?;
//! ```
//!
//! Fallback is strictly sequential — endpoints are never raced — so the cost
//! and timing of a fetch stay bounded and reproducible across runs.

pub mod client;
pub mod endpoints;
pub mod error;
pub mod executor;

pub use client::GatewayClient;
pub use endpoints::GatewayEndpoints;
pub use error::{FetchError, GatewayError};
pub use executor::{HttpExecutor, ReqwestExecutor};
