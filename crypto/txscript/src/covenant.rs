//! The pool covenant.
//!
//! Both pool legs are locked by the same tapscript. Spending them requires a transaction that
//! keeps asset A at input/output 0 and asset B at input/output 1, spends both legs from the
//! same prior transaction, sends them back to the same scriptPubKey and keeps the product of
//! the reserves at or above the genesis product. The rounding drift of the new product is
//! bounded by the sum of the spent reserves.

use crate::{
    error::CovenantError,
    opcodes::{codes::*, opcode_to_str},
    script_builder::{serialize_script_num, ScriptBuilder},
};
use amm_core::trace;
use amm_pool::{AssetId, InvariantMode};
use itertools::Itertools;
use std::fmt::{Display, Formatter};

/// One instruction of the covenant program.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Op(u8),
    /// Raw bytes, pushed with the canonical push opcode for their length.
    Data(Vec<u8>),
    /// A minimally encoded script number.
    Int(i64),
    /// An 8-byte little-endian operand of the 64-bit arithmetic opcodes.
    Le64(i64),
}

impl Node {
    fn compile(&self, builder: &mut ScriptBuilder) -> Result<(), CovenantError> {
        match self {
            Node::Op(opcode) => builder.add_op(*opcode)?,
            Node::Data(data) => builder.add_data(data)?,
            Node::Int(val) => builder.add_i64(*val)?,
            Node::Le64(val) => builder.add_le64(*val)?,
        };
        Ok(())
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Node::Op(opcode) => f.write_str(&opcode_to_str(*opcode)),
            Node::Data(data) => f.write_str(&hex::encode(data)),
            Node::Int(0) => f.write_str("OP_0"),
            Node::Int(-1) => f.write_str("OP_1NEGATE"),
            Node::Int(val @ 1..=16) => write!(f, "OP_{val}"),
            Node::Int(val) => f.write_str(&hex::encode(serialize_script_num(*val))),
            Node::Le64(val) => f.write_str(&hex::encode(val.to_le_bytes())),
        }
    }
}

/// The compiled covenant together with the parameters and the program it was built from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CovenantScript {
    asset_a: AssetId,
    asset_b: AssetId,
    genesis_product: i64,
    mode: InvariantMode,
    nodes: Vec<Node>,
    bytes: Vec<u8>,
}

impl CovenantScript {
    pub fn build(asset_a: AssetId, asset_b: AssetId, genesis_product: u128, mode: InvariantMode) -> Result<Self, CovenantError> {
        if genesis_product == 0 {
            return Err(CovenantError::ZeroGenesisProduct);
        }
        let genesis_product = i64::try_from(genesis_product).map_err(|_| CovenantError::GenesisProductOverflow(genesis_product))?;

        let nodes = lower(&asset_a, &asset_b, genesis_product, mode);
        let mut builder = ScriptBuilder::new();
        for node in nodes.iter() {
            node.compile(&mut builder)?;
        }
        let bytes = builder.drain();
        trace!("Covenant for {} / {} ({} mode) compiled to {} bytes", asset_a, asset_b, mode, bytes.len());

        Ok(Self { asset_a, asset_b, genesis_product, mode, nodes, bytes })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn asset_a(&self) -> AssetId {
        self.asset_a
    }

    pub fn asset_b(&self) -> AssetId {
        self.asset_b
    }

    pub fn genesis_product(&self) -> u64 {
        self.genesis_product as u64
    }

    pub fn mode(&self) -> InvariantMode {
        self.mode
    }

    pub fn to_asm(&self) -> String {
        self.nodes.iter().join(" ")
    }
}

impl Display for CovenantScript {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_asm())
    }
}

fn lower(asset_a: &AssetId, asset_b: &AssetId, genesis_product: i64, mode: InvariantMode) -> Vec<Node> {
    use Node::*;
    let rolling = mode == InvariantMode::RollingPrevious;
    let mut nodes = Vec::with_capacity(96);

    // Leg assets. Introspection pushes the asset followed by its prefix
    for (index, asset) in [(0, asset_a), (1, asset_b)] {
        let asset = asset.to_wire_bytes().to_vec();
        nodes.extend([Int(index), Op(OpInspectInputAsset), Op(OpDrop), Data(asset.clone()), Op(OpEqualVerify)]);
        nodes.extend([Int(index), Op(OpInspectOutputAsset), Op(OpDrop), Data(asset), Op(OpEqualVerify)]);
    }

    // Both legs come from the same transaction: compare prevout txids, dropping vout and flag
    nodes.extend([Int(0), Op(OpInspectInputOutpoint), Op(OpDrop), Op(OpDrop)]);
    nodes.extend([Int(1), Op(OpInspectInputOutpoint), Op(OpDrop), Op(OpDrop)]);
    nodes.push(Op(OpEqualVerify));

    // Output product, kept on the alt stack for the drift check
    nodes.extend([Int(0), Op(OpInspectOutputValue), Op(OpDrop)]);
    nodes.extend([Int(1), Op(OpInspectOutputValue), Op(OpDrop)]);
    nodes.extend([Op(OpMul64), Op(OpVerify), Op(OpDup), Op(OpToAltStack)]);
    if rolling {
        // Keep a copy to compare with the input product
        nodes.push(Op(OpDup));
    }
    // Genesis mode checks this floor only, so a trade may lower the product toward it.
    // Rolling mode adds the input product check below.
    nodes.extend([Le64(genesis_product), Op(OpGreaterThanOrEqual64), Op(OpVerify)]);

    // Input product, the input sum goes to the alt stack
    nodes.extend([Int(0), Op(OpInspectInputValue), Op(OpDrop)]);
    nodes.extend([Int(1), Op(OpInspectInputValue), Op(OpDrop)]);
    nodes.extend([Op(Op2Dup), Op(OpAdd64), Op(OpVerify), Op(OpToAltStack), Op(OpMul64), Op(OpVerify)]);
    if rolling {
        // stack: outputProduct inputProduct
        nodes.extend([Op(Op2Dup), Op(OpGreaterThanOrEqual64), Op(OpVerify), Op(OpNip)]);
    }

    // inputProduct + inputSum >= outputProduct
    nodes.extend([Op(OpFromAltStack), Op(OpAdd64), Op(OpVerify), Op(OpFromAltStack), Op(OpGreaterThanOrEqual64), Op(OpVerify)]);

    // Each leg returns to the scriptPubKey it was spent from
    for index in [0, 1] {
        nodes.extend([Int(index), Op(OpInspectInputScriptPubKey), Op(OpVerify)]);
        nodes.extend([Int(index), Op(OpInspectOutputScriptPubKey), Op(OpVerify)]);
        nodes.push(Op(OpEqualVerify));
    }

    nodes.push(Int(1));
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn asset_a() -> AssetId {
        AssetId::from_str("0a8a2a8ff8e8bba5f8c5e6bd1a8e0b4a2c6f7b1b8d3e4f5a6b7c8d9e0f1a2b3c").unwrap()
    }

    fn asset_b() -> AssetId {
        AssetId::from_str("f1e2d3c4b5a697887766554433221100ffeeddccbbaa99887766554433221100").unwrap()
    }

    const GENESIS: u128 = 100_000_000 * 200_000_000;

    #[test]
    fn test_build_is_deterministic() {
        let first = CovenantScript::build(asset_a(), asset_b(), GENESIS, InvariantMode::Genesis).unwrap();
        let second = CovenantScript::build(asset_a(), asset_b(), GENESIS, InvariantMode::Genesis).unwrap();
        assert_eq!(first.as_bytes(), second.as_bytes());
        assert_eq!(first.to_asm(), second.to_asm());
    }

    #[test]
    fn test_every_parameter_changes_the_script() {
        let base = CovenantScript::build(asset_a(), asset_b(), GENESIS, InvariantMode::Genesis).unwrap();
        let variants = vec![
            ("swapped assets", CovenantScript::build(asset_b(), asset_a(), GENESIS, InvariantMode::Genesis)),
            ("other product", CovenantScript::build(asset_a(), asset_b(), GENESIS + 1, InvariantMode::Genesis)),
            ("rolling mode", CovenantScript::build(asset_a(), asset_b(), GENESIS, InvariantMode::RollingPrevious)),
        ];
        for (name, variant) in variants {
            assert_ne!(base.as_bytes(), variant.unwrap().as_bytes(), "{name} should yield a different script");
        }
    }

    #[test]
    fn test_genesis_product_bounds() {
        assert_eq!(
            CovenantScript::build(asset_a(), asset_b(), 0, InvariantMode::Genesis),
            Err(CovenantError::ZeroGenesisProduct)
        );
        assert_eq!(
            CovenantScript::build(asset_a(), asset_b(), i64::MAX as u128 + 1, InvariantMode::Genesis),
            Err(CovenantError::GenesisProductOverflow(i64::MAX as u128 + 1))
        );
        assert!(CovenantScript::build(asset_a(), asset_b(), i64::MAX as u128, InvariantMode::Genesis).is_ok());
    }

    #[test]
    fn test_script_layout() {
        let script = CovenantScript::build(asset_a(), asset_b(), GENESIS, InvariantMode::Genesis).unwrap();
        let bytes = script.as_bytes();

        // OP_0 OP_INSPECTINPUTASSET OP_DROP <32 byte asset A, wire order> OP_EQUALVERIFY
        assert_eq!(&bytes[..4], &[Op0, OpInspectInputAsset, OpDrop, 0x20]);
        assert_eq!(&bytes[4..36], &asset_a().to_wire_bytes());
        assert_eq!(bytes[36], OpEqualVerify);
        assert_eq!(*bytes.last().unwrap(), Op1);

        // The genesis product is embedded as an 8-byte little-endian operand
        assert!(script.nodes().contains(&Node::Le64(GENESIS as i64)));
        let operand = [&[0x08][..], &(GENESIS as i64).to_le_bytes()].concat();
        assert!(bytes.windows(operand.len()).any(|w| w == operand.as_slice()));

        let asm = script.to_asm();
        let asset = hex::encode(asset_a().to_wire_bytes());
        assert!(asm.starts_with(&format!("OP_0 OP_INSPECTINPUTASSET OP_DROP {asset} OP_EQUALVERIFY")));
        let genesis = hex::encode((GENESIS as i64).to_le_bytes());
        assert!(asm.contains(&format!("OP_DUP OP_TOALTSTACK {genesis} OP_GREATERTHANOREQUAL64 OP_VERIFY")));
        assert!(asm.contains("OP_FROMALTSTACK OP_ADD64 OP_VERIFY OP_FROMALTSTACK OP_GREATERTHANOREQUAL64 OP_VERIFY"));
        assert!(asm.ends_with(concat!(
            "OP_1 OP_INSPECTINPUTSCRIPTPUBKEY OP_VERIFY ",
            "OP_1 OP_INSPECTOUTPUTSCRIPTPUBKEY OP_VERIFY OP_EQUALVERIFY OP_1"
        )));
    }

    #[test]
    fn test_rolling_mode_checks_previous_product() {
        let genesis = CovenantScript::build(asset_a(), asset_b(), GENESIS, InvariantMode::Genesis).unwrap();
        let rolling = CovenantScript::build(asset_a(), asset_b(), GENESIS, InvariantMode::RollingPrevious).unwrap();

        assert!(!genesis.to_asm().contains("OP_NIP"));
        assert!(rolling.to_asm().contains("OP_MUL64 OP_VERIFY OP_2DUP OP_GREATERTHANOREQUAL64 OP_VERIFY OP_NIP"));
        assert!(rolling.to_asm().contains("OP_DUP OP_TOALTSTACK OP_DUP "));
        assert_eq!(rolling.as_bytes().len(), genesis.as_bytes().len() + 5);
    }

    #[test]
    fn test_asm_matches_compiled_bytes() {
        // Every node compiles to exactly what its ASM token denotes
        let script = CovenantScript::build(asset_a(), asset_b(), GENESIS, InvariantMode::RollingPrevious).unwrap();
        let mut builder = ScriptBuilder::new();
        for node in script.nodes() {
            node.compile(&mut builder).unwrap();
        }
        assert_eq!(builder.script(), script.as_bytes());
        assert_eq!(script.to_asm().split(' ').count(), script.nodes().len());
    }
}
