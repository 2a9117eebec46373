//! Constant-product pool model.
//!
//! [`formula`] sizes swaps, [`state::PoolState`] validates and applies them. Nothing in this
//! crate performs I/O: settlement of a swap on chain is injected by the caller.

pub mod asset;
pub mod error;
pub mod formula;
pub mod mode;
pub mod state;

pub use asset::AssetId;
pub use error::{PoolResult, SwapError, TradeError};
pub use mode::InvariantMode;
pub use state::{PoolState, Reserve, Swap, TradeRequest, TradeResult, UtxoLocation};
