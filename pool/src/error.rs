use crate::asset::AssetId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SwapError {
    #[error("cannot exchange {amount_in} for a non-zero payout (reserve in {reserve_in}, reserve out {reserve_out})")]
    InvalidSwap { reserve_out: u64, reserve_in: u64, amount_in: u64 },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TradeError {
    #[error(transparent)]
    Swap(#[from] SwapError),

    #[error("reserve of {reserve} cannot cover a change of {amount}")]
    ReserveExhaustion { reserve: u64, amount: u64 },

    #[error("pool cannot open with an empty reserve of asset {0}")]
    EmptyReserve(AssetId),

    #[error("trade of {amount_in} needs more than the trader balance of {balance}")]
    InsufficientBalance { amount_in: u64, balance: u64 },

    #[error("product {product} violates the pool invariant: {reason}")]
    InvariantViolation { product: u128, reason: &'static str },

    #[error("value {0} does not fit a signed 64-bit script number")]
    ProductOverflow(u128),
}

pub type PoolResult<T> = std::result::Result<T, TradeError>;
