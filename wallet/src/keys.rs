use crate::error::{WalletError, WalletResult};
use amm_txscript::standard::{is_pay_to_witness_pubkey_hash_of, pay_to_pubkey_hash_script_code, pay_to_witness_pubkey_hash};
use secp256k1::{Message, PublicKey, SecretKey, SECP256K1};
use std::{fmt, str::FromStr};

/// Sighash flag appended to every trader signature.
pub const SIGHASH_ALL: u8 = 0x01;

/// The single key holding the trader's funds, spent through pay-to-witness-pubkey-hash.
#[derive(Clone)]
pub struct TraderKeys {
    secret: SecretKey,
    public: PublicKey,
}

impl TraderKeys {
    pub fn generate() -> Self {
        Self::from_secret(SecretKey::new(&mut rand::thread_rng()))
    }

    pub fn from_hex(secret: &str) -> WalletResult<Self> {
        SecretKey::from_str(secret.trim()).map(Self::from_secret).map_err(|err| WalletError::InvalidKey(err.to_string()))
    }

    fn from_secret(secret: SecretKey) -> Self {
        Self { public: PublicKey::from_secret_key(SECP256K1, &secret), secret }
    }

    pub fn public_key(&self) -> PublicKey {
        self.public
    }

    pub fn secret_hex(&self) -> String {
        hex::encode(self.secret.secret_bytes())
    }

    pub fn script_pubkey(&self) -> Vec<u8> {
        pay_to_witness_pubkey_hash(&self.public)
    }

    pub fn script_code(&self) -> Vec<u8> {
        pay_to_pubkey_hash_script_code(&self.public)
    }

    pub fn owns(&self, script_pubkey: &[u8]) -> bool {
        is_pay_to_witness_pubkey_hash_of(script_pubkey, &self.public)
    }

    /// DER signature over `digest` followed by [`SIGHASH_ALL`].
    pub fn sign(&self, digest: [u8; 32]) -> Vec<u8> {
        let signature = SECP256K1.sign_ecdsa(&Message::from_digest(digest), &self.secret);
        let mut bytes = signature.serialize_der().to_vec();
        bytes.push(SIGHASH_ALL);
        bytes
    }
}

impl fmt::Debug for TraderKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TraderKeys").field("public", &self.public).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secp256k1::ecdsa::Signature;

    // BIP-143 native P2WPKH example key
    const SECRET: &str = "619c335025c7f4012e556c2a58b2506e30b8511b53ade95ea316fd8c3286feb9";
    const PUBKEY: &str = "025476c2e83188368da1ff3e292e7acafcdb3566bb0ad253f62fc70f07aeee6357";

    #[test]
    fn test_keys_from_hex() {
        let keys = TraderKeys::from_hex(SECRET).unwrap();
        assert_eq!(keys.public_key().to_string(), PUBKEY);
        assert_eq!(keys.secret_hex(), SECRET);
        assert_eq!(hex::encode(keys.script_pubkey()), "00141d0f172a0ecb48aee1be1f2687d2963ae33f71a1");
        assert!(keys.owns(&keys.script_pubkey()));
        assert!(!keys.owns(&TraderKeys::generate().script_pubkey()));

        assert!(matches!(TraderKeys::from_hex("not a key"), Err(WalletError::InvalidKey(_))));
        assert!(matches!(TraderKeys::from_hex(&"00".repeat(32)), Err(WalletError::InvalidKey(_))));
    }

    #[test]
    fn test_sign() {
        let keys = TraderKeys::generate();
        let digest = [7u8; 32];
        let signature = keys.sign(digest);
        assert_eq!(signature.last(), Some(&SIGHASH_ALL));

        let signature = Signature::from_der(&signature[..signature.len() - 1]).unwrap();
        assert!(SECP256K1.verify_ecdsa(&Message::from_digest(digest), &signature, &keys.public_key()).is_ok());
    }
}
