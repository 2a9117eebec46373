//! The node API the trader depends on.

use crate::{model::*, RpcResult};
use amm_pool::AssetId;
use async_trait::async_trait;

/// Elements node calls. Amounts are satoshis, transaction ids are in display order.
#[async_trait]
pub trait NodeRpc: Sync + Send {
    /// Issues `amount` of a new asset, plus `token_amount` reissuance tokens, to the node wallet.
    async fn issue_asset(&self, amount: u64, token_amount: u64) -> RpcResult<IssueAssetResponse>;

    /// Pays `amount` of `asset` from the node wallet to `address`, returning the txid.
    async fn send_to_address(&self, address: &str, amount: u64, asset: &AssetId) -> RpcResult<String>;

    async fn get_raw_transaction(&self, txid: &str) -> RpcResult<RawTransaction>;

    /// Broadcasts a serialized transaction, returning its txid.
    async fn send_raw_transaction(&self, tx_hex: &str) -> RpcResult<String>;

    /// The chain's policy asset, used to pay fees.
    async fn policy_asset(&self) -> RpcResult<AssetId>;
}
