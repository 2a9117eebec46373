use crate::{layout::InputRole, network::Network};
use amm_pool::AssetId;
use amm_rpc::RpcError;
use amm_txscript::CovenantError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("transaction rejected by the node: {0}")]
    Broadcast(String),

    #[error("cannot derive a {1} address for script {0}")]
    ScriptDerivation(String, Network),

    #[error("transaction layout mismatch: {0}")]
    LayoutMismatch(String),

    #[error("{role} expects asset {expected}, found {actual}")]
    AssetMismatch { role: InputRole, expected: AssetId, actual: AssetId },

    #[error("funding of {funding} sats does not cover the {fee} sats fee")]
    InsufficientFunding { funding: u64, fee: u64 },

    #[error("input {index} is locked to an unknown script {script}")]
    UnknownSpendCondition { index: usize, script: String },

    #[error("input {0} has no witness")]
    MissingWitness(usize),

    #[error("transaction {txid} has no explicit output of asset {asset} to script {script}")]
    MissingOutput { txid: String, asset: AssetId, script: String },

    #[error("invalid private key: {0}")]
    InvalidKey(String),

    #[error("encoding error: {0}")]
    Encoding(String),

    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error(transparent)]
    Covenant(#[from] CovenantError),
}

pub type WalletResult<T> = std::result::Result<T, WalletError>;
