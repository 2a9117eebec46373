use crate::{error::WalletResult, network::Network};
use amm_pool::AssetId;
use amm_txscript::{CovenantCommitment, CovenantScript};

/// A covenant script with its taproot commitment and address on one network.
#[derive(Clone, Debug)]
pub struct CovenantPool {
    script: CovenantScript,
    commitment: CovenantCommitment,
    script_pubkey: Vec<u8>,
    address: String,
}

impl CovenantPool {
    pub fn new(script: CovenantScript, network: Network) -> WalletResult<Self> {
        let commitment = CovenantCommitment::with_nums_key(&script)?;
        let script_pubkey = commitment.script_pubkey();
        let address = network.address(&script_pubkey)?;
        Ok(Self { script, commitment, script_pubkey, address })
    }

    pub fn script(&self) -> &CovenantScript {
        &self.script
    }

    pub fn commitment(&self) -> &CovenantCommitment {
        &self.commitment
    }

    pub fn script_pubkey(&self) -> &[u8] {
        &self.script_pubkey
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn asset_a(&self) -> AssetId {
        self.script.asset_a()
    }

    pub fn asset_b(&self) -> AssetId {
        self.script.asset_b()
    }

    pub fn locks(&self, script_pubkey: &[u8]) -> bool {
        self.script_pubkey == script_pubkey
    }
}
