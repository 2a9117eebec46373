//! Single-leaf Elements taproot commitment of the covenant.

use crate::{covenant::CovenantScript, error::CovenantError, standard::pay_to_taproot};
use secp256k1::{Parity, Scalar, XOnlyPublicKey, SECP256K1};
use sha2::{Digest, Sha256};

/// Tapscript leaf version on Elements.
pub const TAPSCRIPT_LEAF_VERSION: u8 = 0xc4;

const TAP_LEAF_TAG: &str = "TapLeaf/elements";
const TAP_TWEAK_TAG: &str = "TapTweak/elements";

/// x-only point with no known discrete logarithm, so the key path cannot be used.
pub const NUMS_INTERNAL_KEY: [u8; 32] = [
    0x50, 0x92, 0x9b, 0x74, 0xc1, 0xa0, 0x49, 0x54, 0xb7, 0x8b, 0x4b, 0x60, 0x35, 0xe9, 0x7a, 0x5e, 0x07, 0x8a, 0x5a, 0x0f, 0x28, 0xec,
    0x96, 0xd5, 0x47, 0xbf, 0xee, 0x9a, 0xce, 0x80, 0x3a, 0xc0,
];

pub fn nums_internal_key() -> Result<XOnlyPublicKey, CovenantError> {
    XOnlyPublicKey::from_slice(&NUMS_INTERNAL_KEY).map_err(|err| CovenantError::InternalKey(err.to_string()))
}

fn tagged_hash(tag: &str, parts: &[&[u8]]) -> [u8; 32] {
    let tag_hash = Sha256::digest(tag.as_bytes());
    let mut hasher = Sha256::new();
    hasher.update(tag_hash);
    hasher.update(tag_hash);
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

fn compact_size(len: usize) -> Vec<u8> {
    match len {
        0..=0xfc => vec![len as u8],
        0xfd..=0xffff => [&[0xfd][..], &(len as u16).to_le_bytes()].concat(),
        _ => [&[0xfe][..], &(len as u32).to_le_bytes()].concat(),
    }
}

/// The covenant committed as the only script leaf of a taproot output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CovenantCommitment {
    script: Vec<u8>,
    internal_key: XOnlyPublicKey,
    output_key: XOnlyPublicKey,
    parity: Parity,
    leaf_hash: [u8; 32],
}

impl CovenantCommitment {
    pub fn new(covenant: &CovenantScript, internal_key: XOnlyPublicKey) -> Result<Self, CovenantError> {
        let script = covenant.as_bytes().to_vec();
        let leaf_hash = tagged_hash(TAP_LEAF_TAG, &[&[TAPSCRIPT_LEAF_VERSION], &compact_size(script.len()), &script]);
        // A single leaf is its own merkle root
        let tweak = tagged_hash(TAP_TWEAK_TAG, &[&internal_key.serialize(), &leaf_hash]);
        let tweak = Scalar::from_be_bytes(tweak).map_err(|err| CovenantError::Tweak(err.to_string()))?;
        let (output_key, parity) = internal_key.add_tweak(SECP256K1, &tweak).map_err(|err| CovenantError::Tweak(err.to_string()))?;
        Ok(Self { script, internal_key, output_key, parity, leaf_hash })
    }

    /// Commitment under the unspendable [`NUMS_INTERNAL_KEY`].
    pub fn with_nums_key(covenant: &CovenantScript) -> Result<Self, CovenantError> {
        Self::new(covenant, nums_internal_key()?)
    }

    pub fn output_key(&self) -> XOnlyPublicKey {
        self.output_key
    }

    pub fn internal_key(&self) -> XOnlyPublicKey {
        self.internal_key
    }

    pub fn leaf_hash(&self) -> [u8; 32] {
        self.leaf_hash
    }

    /// Witness v1 output script locking both pool legs.
    pub fn script_pubkey(&self) -> Vec<u8> {
        pay_to_taproot(&self.output_key)
    }

    /// Leaf version with the output key parity, then the internal key. No merkle path follows.
    pub fn control_block(&self) -> Vec<u8> {
        let mut control_block = Vec::with_capacity(33);
        control_block.push(TAPSCRIPT_LEAF_VERSION | self.parity.to_u8());
        control_block.extend_from_slice(&self.internal_key.serialize());
        control_block
    }

    /// Script-path witness stack spending a pool leg.
    pub fn witness(&self) -> Vec<Vec<u8>> {
        vec![self.script.clone(), self.control_block()]
    }
}
