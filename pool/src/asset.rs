use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Debug, Display, Formatter};
use std::str::{self, FromStr};

pub const ASSET_ID_SIZE: usize = 32;

/// An Elements asset identifier.
///
/// Held in display order, which is how the node reports it. Transactions carry the
/// byte-reversed form, see [`AssetId::to_wire_bytes`].
#[derive(PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord, Default)]
pub struct AssetId([u8; ASSET_ID_SIZE]);

impl AssetId {
    pub const fn from_bytes(bytes: [u8; ASSET_ID_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn from_wire_bytes(mut bytes: [u8; ASSET_ID_SIZE]) -> Self {
        bytes.reverse();
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; ASSET_ID_SIZE] {
        &self.0
    }

    pub fn to_wire_bytes(&self) -> [u8; ASSET_ID_SIZE] {
        let mut bytes = self.0;
        bytes.reverse();
        bytes
    }
}

impl Display for AssetId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut hex = [0u8; ASSET_ID_SIZE * 2];
        hex::encode_to_slice(self.0, &mut hex).map_err(|_| std::fmt::Error)?;
        f.write_str(str::from_utf8(&hex).map_err(|_| std::fmt::Error)?)
    }
}

impl Debug for AssetId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "AssetId({})", self)
    }
}

impl FromStr for AssetId {
    type Err = hex::FromHexError;

    fn from_str(asset_str: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; ASSET_ID_SIZE];
        hex::decode_to_slice(asset_str, &mut bytes)?;
        Ok(AssetId(bytes))
    }
}

impl Serialize for AssetId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AssetId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        AssetId::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_id_basics() {
        let asset_str = "5ac9f65c0efcc4775e0baec4ec03abdde22473cd3cf33c0419ca290e0751b225";
        let asset = AssetId::from_str(asset_str).unwrap();
        assert_eq!(asset_str, asset.to_string());
        assert_eq!(asset.as_bytes()[0], 0x5a);

        let wire = asset.to_wire_bytes();
        assert_eq!(wire[0], 0x25);
        assert_eq!(wire[31], 0x5a);
        assert_eq!(AssetId::from_wire_bytes(wire), asset);

        let odd_str = "5ac9f65c0efcc4775e0baec4ec03abdde22473cd3cf33c0419ca290e0751b22";
        let short_str = "5ac9f65c0efcc4775e0baec4ec03abdde22473cd3cf33c0419ca290e0751b2";
        assert_eq!(AssetId::from_str(odd_str), Err(hex::FromHexError::OddLength));
        assert_eq!(AssetId::from_str(short_str), Err(hex::FromHexError::InvalidStringLength));
    }

    #[test]
    fn test_reversing_twice_is_identity() {
        let bytes: [u8; ASSET_ID_SIZE] = core::array::from_fn(|i| i as u8);
        let asset = AssetId::from_bytes(bytes);
        let round = AssetId::from_bytes(AssetId::from_bytes(asset.to_wire_bytes()).to_wire_bytes());
        assert_eq!(round, asset);
        assert_ne!(AssetId::from_bytes(asset.to_wire_bytes()), asset);
    }
}
