//! Elements node interface.
//!
//! [`NodeRpc`] is the narrow set of node calls the trader relies on. [`HttpNodeClient`]
//! implements it over the node's JSON-RPC endpoint.

pub mod api;
pub mod client;
pub mod convert;
pub mod error;
pub mod model;

pub use api::NodeRpc;
pub use client::HttpNodeClient;
pub use error::{RpcError, RpcResult};
pub use model::*;
