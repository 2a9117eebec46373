use crate::error::{WalletError, WalletResult};
use elements::{Address, AddressParams, Script};
use std::{fmt, str::FromStr};

/// Elements chain the trader addresses and covenant address are encoded for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Network {
    #[default]
    ElementsRegtest,
    LiquidTestnet,
    Liquid,
}

impl Network {
    pub fn as_str(self) -> &'static str {
        match self {
            Network::ElementsRegtest => "elementsregtest",
            Network::LiquidTestnet => "liquidtestnet",
            Network::Liquid => "liquid",
        }
    }

    pub fn address_params(self) -> &'static AddressParams {
        match self {
            Network::ElementsRegtest => &AddressParams::ELEMENTS,
            Network::LiquidTestnet => &AddressParams::LIQUID_TESTNET,
            Network::Liquid => &AddressParams::LIQUID,
        }
    }

    /// Unconfidential address paying to `script_pubkey`.
    pub fn address(self, script_pubkey: &[u8]) -> WalletResult<String> {
        Address::from_script(&Script::from(script_pubkey.to_vec()), None, self.address_params())
            .map(|address| address.to_string())
            .ok_or_else(|| WalletError::ScriptDerivation(hex::encode(script_pubkey), self))
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "elementsregtest" | "regtest" => Ok(Network::ElementsRegtest),
            "liquidtestnet" => Ok(Network::LiquidTestnet),
            "liquid" | "liquidv1" => Ok(Network::Liquid),
            _ => Err(format!("unknown network '{s}', expected elementsregtest, liquidtestnet or liquid")),
        }
    }
}
