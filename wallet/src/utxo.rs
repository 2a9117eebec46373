use crate::error::{WalletError, WalletResult};
use amm_pool::{AssetId, UtxoLocation};
use elements::{OutPoint, Txid};
use std::{fmt, str::FromStr};

/// An explicit (unblinded) output the assembler can spend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UtxoRef {
    pub location: UtxoLocation,
    pub asset: AssetId,
    pub value: u64,
    pub script_pubkey: Vec<u8>,
}

impl UtxoRef {
    pub fn new(location: UtxoLocation, asset: AssetId, value: u64, script_pubkey: Vec<u8>) -> Self {
        Self { location, asset, value, script_pubkey }
    }

    pub fn outpoint(&self) -> WalletResult<OutPoint> {
        let txid = Txid::from_str(&self.location.txid)
            .map_err(|err| WalletError::Encoding(format!("txid {}: {err}", self.location.txid)))?;
        Ok(OutPoint::new(txid, self.location.vout))
    }
}

impl fmt::Display for UtxoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} sats of {})", self.location, self.value, self.asset)
    }
}
