use amm_core::{log::LogError, signals::SignalError};
use amm_pool::TradeError;
use amm_rpc::RpcError;
use amm_txscript::CovenantError;
use amm_wallet::WalletError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TraderError {
    #[error(transparent)]
    Trade(#[from] TradeError),

    #[error(transparent)]
    Wallet(#[from] WalletError),

    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error(transparent)]
    Covenant(#[from] CovenantError),

    #[error(transparent)]
    Log(#[from] LogError),

    #[error(transparent)]
    Signal(#[from] SignalError),

    #[error("cannot read the trade amount: {0}")]
    Input(#[from] std::io::Error),

    #[error("invalid argument: {0}")]
    Argument(String),
}

pub type TraderResult<T> = std::result::Result<T, TraderError>;
