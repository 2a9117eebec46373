//! Standard output scripts.

use crate::opcodes::codes::*;
use ripemd::Ripemd160;
use secp256k1::{PublicKey, XOnlyPublicKey};
use sha2::{Digest, Sha256};
use std::iter::once;

pub fn hash160(data: &[u8]) -> [u8; 20] {
    Ripemd160::digest(Sha256::digest(data)).into()
}

const PUSH_20: u8 = 0x14;
const PUSH_32: u8 = 0x20;

/// `OP_0 <hash160(pubkey)>`
pub fn pay_to_witness_pubkey_hash(pubkey: &PublicKey) -> Vec<u8> {
    once(Op0).chain(once(PUSH_20)).chain(hash160(&pubkey.serialize())).collect()
}

/// Script code signed for a pay-to-witness-pubkey-hash input:
/// `OP_DUP OP_HASH160 <hash160(pubkey)> OP_EQUALVERIFY OP_CHECKSIG`
pub fn pay_to_pubkey_hash_script_code(pubkey: &PublicKey) -> Vec<u8> {
    [OpDup, OpHash160, PUSH_20].into_iter().chain(hash160(&pubkey.serialize())).chain([OpEqualVerify, OpCheckSig]).collect()
}

/// `OP_1 <output key>`
pub fn pay_to_taproot(output_key: &XOnlyPublicKey) -> Vec<u8> {
    once(Op1).chain(once(PUSH_32)).chain(output_key.serialize()).collect()
}

/// Whether `script` pays to the witness pubkey hash of `pubkey`.
pub fn is_pay_to_witness_pubkey_hash_of(script: &[u8], pubkey: &PublicKey) -> bool {
    script == pay_to_witness_pubkey_hash(pubkey).as_slice()
}
