//! The assembler bound to a node: funding, pool creation, swaps and broadcast.

use crate::{
    assembler::Assembler,
    covenant::CovenantPool,
    error::{WalletError, WalletResult},
    layout::{OutputRole, RoleMap},
    network::Network,
    pset::Pset,
    role::Extractor,
    utxo::UtxoRef,
};
use amm_core::{debug, info};
use amm_pool::{AssetId, Swap, TradeResult, UtxoLocation};
use amm_rpc::{NodeRpc, RpcError};
use std::sync::Arc;

pub struct Wallet {
    node: Arc<dyn NodeRpc>,
    assembler: Assembler,
    network: Network,
}

impl Wallet {
    pub fn new(node: Arc<dyn NodeRpc>, assembler: Assembler, network: Network) -> Self {
        Self { node, assembler, network }
    }

    pub fn node(&self) -> &Arc<dyn NodeRpc> {
        &self.node
    }

    pub fn assembler(&self) -> &Assembler {
        &self.assembler
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn trader_address(&self) -> WalletResult<String> {
        self.network.address(&self.assembler.keys().script_pubkey())
    }

    /// Has the node pay `amount` of `asset` to `address` and locates the output paying
    /// `script_pubkey` in the funding transaction.
    pub async fn bootstrap_fund(&self, address: &str, amount: u64, asset: &AssetId, script_pubkey: &[u8]) -> WalletResult<UtxoRef> {
        let txid = self.node.send_to_address(address, amount, asset).await?;
        let tx = self.node.get_raw_transaction(&txid).await?;
        let script = hex::encode(script_pubkey);
        let missing = || WalletError::MissingOutput { txid: txid.clone(), asset: *asset, script: script.clone() };

        let output = tx.find_output(asset, &script).ok_or_else(missing)?;
        let value = output.value_sats().ok_or_else(missing)?;
        debug!("Funded {} sats of {} at {}:{}", value, asset, txid, output.n);
        Ok(UtxoRef::new(UtxoLocation::new(txid.clone(), output.n), *asset, value, script_pubkey.to_vec()))
    }

    /// Funds the trader key with `amount` of `asset`.
    pub async fn fund_trader(&self, amount: u64, asset: &AssetId) -> WalletResult<UtxoRef> {
        let address = self.trader_address()?;
        self.bootstrap_fund(&address, amount, asset, &self.assembler.keys().script_pubkey()).await
    }

    /// Prints the raw transaction and submits it. A node rejection carries the node's reason.
    pub async fn broadcast(&self, pset: &Pset<Extractor>) -> WalletResult<String> {
        let tx_hex = pset.to_hex()?;
        println!("{tx_hex}");
        match self.node.send_raw_transaction(&tx_hex).await {
            Ok(txid) => {
                info!("Broadcast {} transaction {}", pset.kind, txid);
                Ok(txid)
            }
            Err(RpcError::Node { message, .. }) => Err(WalletError::Broadcast(message)),
            Err(err) => Err(err.into()),
        }
    }

    /// Creates the pool and returns the txid holding its legs at outputs 0 and 1.
    pub async fn create_pool(&self, pool: &CovenantPool, inputs: RoleMap) -> WalletResult<String> {
        let pset = self.assembler.build_pool_create(pool, inputs)?;
        self.broadcast(&pset).await
    }

    /// Settles `swap` on chain, with `funding` paying the fee.
    pub async fn swap(&self, pool: &CovenantPool, swap: &Swap, funding: UtxoRef) -> WalletResult<TradeResult> {
        let pset = self.assembler.build_swap(pool, swap, funding)?;
        let user_vout = pset
            .output_index(OutputRole::TraderChange)
            .ok_or_else(|| WalletError::LayoutMismatch(format!("{} is missing trader-change", pset.kind)))?;
        let txid = self.broadcast(&pset).await?;
        Ok(swap.settle(txid, user_vout))
    }
}
