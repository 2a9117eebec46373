//! Partially signed transaction moving through the [`role`](crate::role) typestates.

use crate::{
    covenant::CovenantPool,
    error::{WalletError, WalletResult},
    keys::TraderKeys,
    layout::{check_sequence, InputRole, OutputRole, TxKind},
    role::*,
    utxo::UtxoRef,
};
use amm_core::trace;
use amm_pool::AssetId;
use elements::{
    confidential::{Asset, Nonce, Value},
    encode,
    hashes::Hash,
    sighash::SighashCache,
    EcdsaSighashType, LockTime, Script, Transaction, TxIn, TxOut, TxOutWitness,
};
use secp256k1::PublicKey;
use std::{marker::PhantomData, ops::Deref};

const TX_VERSION: u32 = 2;

#[derive(Clone, Debug)]
pub struct PsetInput {
    pub role: InputRole,
    pub utxo: UtxoRef,
    pub partial_sig: Option<(PublicKey, Vec<u8>)>,
    pub final_script_witness: Option<Vec<Vec<u8>>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PsetOutput {
    pub role: OutputRole,
    pub asset: AssetId,
    pub value: u64,
    pub script_pubkey: Vec<u8>,
}

#[derive(Clone, Debug)]
pub struct Inner {
    pub kind: TxKind,
    pub inputs: Vec<PsetInput>,
    pub outputs: Vec<PsetOutput>,
}

#[derive(Clone, Debug)]
pub struct Pset<ROLE> {
    inner: Inner,
    role: PhantomData<ROLE>,
}

impl<ROLE> Deref for Pset<ROLE> {
    type Target = Inner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<ROLE> Pset<ROLE> {
    fn transition<NEXT>(self) -> Pset<NEXT> {
        Pset { inner: self.inner, role: PhantomData }
    }

    /// Transaction with the witnesses finalized so far.
    pub fn unsigned_tx(&self) -> WalletResult<Transaction> {
        let input = self
            .inputs
            .iter()
            .map(|input| {
                // Default sequence is final (0xffffffff)
                let mut tx_in = TxIn { previous_output: input.utxo.outpoint()?, ..Default::default() };
                if let Some(witness) = &input.final_script_witness {
                    tx_in.witness.script_witness = witness.clone();
                }
                Ok(tx_in)
            })
            .collect::<WalletResult<Vec<_>>>()?;
        let output = self.outputs.iter().map(to_tx_out).collect::<WalletResult<Vec<_>>>()?;
        Ok(Transaction { version: TX_VERSION, lock_time: LockTime::ZERO, input, output })
    }

    pub fn output_index(&self, role: OutputRole) -> Option<u32> {
        self.outputs.iter().position(|output| output.role == role).map(|index| index as u32)
    }

    #[cfg(test)]
    pub fn input_sum(&self, asset: &AssetId) -> u64 {
        self.inputs.iter().filter(|input| input.utxo.asset == *asset).map(|input| input.utxo.value).sum()
    }

    #[cfg(test)]
    pub fn output_sum(&self, asset: &AssetId) -> u64 {
        self.outputs.iter().filter(|output| output.asset == *asset).map(|output| output.value).sum()
    }
}

fn to_elements_asset(asset: &AssetId) -> WalletResult<elements::AssetId> {
    elements::AssetId::from_slice(&asset.to_wire_bytes()).map_err(|err| WalletError::Encoding(format!("asset {asset}: {err}")))
}

/// Explicit output. Asset ids travel byte-reversed relative to their hex form.
fn to_tx_out(output: &PsetOutput) -> WalletResult<TxOut> {
    Ok(TxOut {
        asset: Asset::Explicit(to_elements_asset(&output.asset)?),
        value: Value::Explicit(output.value),
        nonce: Nonce::Null,
        script_pubkey: Script::from(output.script_pubkey.clone()),
        witness: TxOutWitness::default(),
    })
}

impl Pset<Constructor> {
    pub fn new(kind: TxKind) -> Self {
        Pset { inner: Inner { kind, inputs: vec![], outputs: vec![] }, role: PhantomData }
    }

    pub fn input(mut self, role: InputRole, utxo: UtxoRef) -> Self {
        self.inner.inputs.push(PsetInput { role, utxo, partial_sig: None, final_script_witness: None });
        self
    }

    pub fn output(mut self, role: OutputRole, asset: AssetId, value: u64, script_pubkey: Vec<u8>) -> Self {
        self.inner.outputs.push(PsetOutput { role, asset, value, script_pubkey });
        self
    }

    /// Closes construction once inputs and outputs follow the layout of the kind.
    pub fn signer(self) -> WalletResult<Pset<Signer>> {
        let kind = self.kind;
        check_sequence(kind, kind.inputs(), &self.inputs.iter().map(|input| input.role).collect::<Vec<_>>())?;
        check_sequence(kind, kind.outputs(), &self.outputs.iter().map(|output| output.role).collect::<Vec<_>>())?;
        Ok(self.transition())
    }
}

impl Pset<Signer> {
    /// Signs with `SIGHASH_ALL` every input paying to the trader key.
    pub fn sign(mut self, keys: &TraderKeys) -> WalletResult<Self> {
        let tx = self.unsigned_tx()?;
        let script_code = Script::from(keys.script_code());
        let mut cache = SighashCache::new(&tx);
        for (index, input) in self.inner.inputs.iter_mut().enumerate() {
            if !keys.owns(&input.utxo.script_pubkey) {
                continue;
            }
            let sighash = cache.segwitv0_sighash(index, &script_code, Value::Explicit(input.utxo.value), EcdsaSighashType::All);
            trace!("signing input {} ({}) with sighash {}", index, input.role, sighash);
            input.partial_sig = Some((keys.public_key(), keys.sign(sighash.to_byte_array())));
        }
        Ok(self)
    }

    pub fn finalizer(self) -> Pset<Finalizer> {
        self.transition()
    }
}

impl Pset<Finalizer> {
    /// Covenant inputs get the script-path witness, trader inputs their signature and key.
    pub fn finalize(mut self, covenant: &CovenantPool) -> WalletResult<Self> {
        for (index, input) in self.inner.inputs.iter_mut().enumerate() {
            let witness = if covenant.locks(&input.utxo.script_pubkey) {
                covenant.commitment().witness()
            } else if let Some((pubkey, signature)) = &input.partial_sig {
                vec![signature.clone(), pubkey.serialize().to_vec()]
            } else {
                return Err(WalletError::UnknownSpendCondition { index, script: hex::encode(&input.utxo.script_pubkey) });
            };
            input.final_script_witness = Some(witness);
        }
        Ok(self)
    }

    pub fn extractor(self) -> WalletResult<Pset<Extractor>> {
        match self.inputs.iter().position(|input| input.final_script_witness.is_none()) {
            Some(index) => Err(WalletError::MissingWitness(index)),
            None => Ok(self.transition()),
        }
    }
}

impl Pset<Extractor> {
    pub fn extract_tx(&self) -> WalletResult<Transaction> {
        self.unsigned_tx()
    }

    /// Consensus-encoded transaction as the node expects it.
    pub fn to_hex(&self) -> WalletResult<String> {
        Ok(faster_hex::hex_string(&encode::serialize(&self.extract_tx()?)))
    }
}
