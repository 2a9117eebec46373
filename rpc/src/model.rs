use crate::convert::units_to_sats;
use amm_pool::AssetId;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueAssetResponse {
    pub txid: String,
    pub vin: u32,
    pub entropy: String,
    pub asset: AssetId,
    pub token: AssetId,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawScriptPubKey {
    pub hex: String,
    #[serde(default)]
    pub asm: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

/// An output of a decoded transaction. Blinded outputs carry neither value nor asset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOutput {
    pub n: u32,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub asset: Option<AssetId>,
    pub script_pub_key: RawScriptPubKey,
}

impl RawOutput {
    pub fn value_sats(&self) -> Option<u64> {
        self.value.map(units_to_sats)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawTransaction {
    pub txid: String,
    #[serde(default)]
    pub hex: String,
    pub vout: Vec<RawOutput>,
}

impl RawTransaction {
    /// First explicit output paying `asset` to `script_pub_key_hex`.
    pub fn find_output(&self, asset: &AssetId, script_pub_key_hex: &str) -> Option<&RawOutput> {
        self.vout.iter().find(|output| output.asset.as_ref() == Some(asset) && output.script_pub_key.hex == script_pub_key_hex)
    }
}
