//! Elements tapscript opcodes.
//!
//! The base Bitcoin opcodes together with the Elements extensions: streaming SHA-256,
//! transaction introspection and 64-bit arithmetic. Introspection opcodes push their result
//! followed by a prefix or flag item which scripts usually drop or verify.

#[macro_use]
mod macros;

/// First value in the range formed by the "small integer" Op# opcodes
pub const OP_SMALL_INT_MIN_VAL: u8 = 1;
/// Last value in the range formed by the "small integer" Op# opcodes
pub const OP_SMALL_INT_MAX_VAL: u8 = 16;
/// First value in the range formed by OpData# opcodes (where opcode == value)
pub const OP_DATA_MIN_VAL: u8 = 0x01;
/// Last value in the range formed by OpData# opcodes (where opcode == value)
pub const OP_DATA_MAX_VAL: u8 = 0x4b;
/// Minus 1 value
pub const OP_1_NEGATE_VAL: u8 = 0x81;

opcode_table! {
    Op0<0x00> "OP_0",
    OpPushData1<0x4c> "OP_PUSHDATA1",
    OpPushData2<0x4d> "OP_PUSHDATA2",
    OpPushData4<0x4e> "OP_PUSHDATA4",
    Op1Negate<0x4f> "OP_1NEGATE",
    OpReserved<0x50> "OP_RESERVED",
    Op1<0x51> "OP_1",
    Op2<0x52> "OP_2",
    Op3<0x53> "OP_3",
    Op4<0x54> "OP_4",
    Op5<0x55> "OP_5",
    Op6<0x56> "OP_6",
    Op7<0x57> "OP_7",
    Op8<0x58> "OP_8",
    Op9<0x59> "OP_9",
    Op10<0x5a> "OP_10",
    Op11<0x5b> "OP_11",
    Op12<0x5c> "OP_12",
    Op13<0x5d> "OP_13",
    Op14<0x5e> "OP_14",
    Op15<0x5f> "OP_15",
    Op16<0x60> "OP_16",

    OpNop<0x61> "OP_NOP",
    OpIf<0x63> "OP_IF",
    OpNotIf<0x64> "OP_NOTIF",
    OpElse<0x67> "OP_ELSE",
    OpEndIf<0x68> "OP_ENDIF",
    OpVerify<0x69> "OP_VERIFY",
    OpReturn<0x6a> "OP_RETURN",

    OpToAltStack<0x6b> "OP_TOALTSTACK",
    OpFromAltStack<0x6c> "OP_FROMALTSTACK",
    Op2Drop<0x6d> "OP_2DROP",
    Op2Dup<0x6e> "OP_2DUP",
    Op3Dup<0x6f> "OP_3DUP",
    Op2Over<0x70> "OP_2OVER",
    Op2Rot<0x71> "OP_2ROT",
    Op2Swap<0x72> "OP_2SWAP",
    OpIfDup<0x73> "OP_IFDUP",
    OpDepth<0x74> "OP_DEPTH",
    OpDrop<0x75> "OP_DROP",
    OpDup<0x76> "OP_DUP",
    OpNip<0x77> "OP_NIP",
    OpOver<0x78> "OP_OVER",
    OpPick<0x79> "OP_PICK",
    OpRoll<0x7a> "OP_ROLL",
    OpRot<0x7b> "OP_ROT",
    OpSwap<0x7c> "OP_SWAP",
    OpTuck<0x7d> "OP_TUCK",

    OpCat<0x7e> "OP_CAT",
    OpSubStr<0x7f> "OP_SUBSTR",
    OpLeft<0x80> "OP_LEFT",
    OpRight<0x81> "OP_RIGHT",
    OpSize<0x82> "OP_SIZE",
    OpInvert<0x83> "OP_INVERT",
    OpAnd<0x84> "OP_AND",
    OpOr<0x85> "OP_OR",
    OpXor<0x86> "OP_XOR",
    OpEqual<0x87> "OP_EQUAL",
    OpEqualVerify<0x88> "OP_EQUALVERIFY",

    Op1Add<0x8b> "OP_1ADD",
    Op1Sub<0x8c> "OP_1SUB",
    OpNegate<0x8f> "OP_NEGATE",
    OpAbs<0x90> "OP_ABS",
    OpNot<0x91> "OP_NOT",
    Op0NotEqual<0x92> "OP_0NOTEQUAL",
    OpAdd<0x93> "OP_ADD",
    OpSub<0x94> "OP_SUB",
    OpBoolAnd<0x9a> "OP_BOOLAND",
    OpBoolOr<0x9b> "OP_BOOLOR",
    OpNumEqual<0x9c> "OP_NUMEQUAL",
    OpNumEqualVerify<0x9d> "OP_NUMEQUALVERIFY",
    OpNumNotEqual<0x9e> "OP_NUMNOTEQUAL",
    OpLessThan<0x9f> "OP_LESSTHAN",
    OpGreaterThan<0xa0> "OP_GREATERTHAN",
    OpLessThanOrEqual<0xa1> "OP_LESSTHANOREQUAL",
    OpGreaterThanOrEqual<0xa2> "OP_GREATERTHANOREQUAL",
    OpMin<0xa3> "OP_MIN",
    OpMax<0xa4> "OP_MAX",
    OpWithin<0xa5> "OP_WITHIN",

    OpRipemd160<0xa6> "OP_RIPEMD160",
    OpSha1<0xa7> "OP_SHA1",
    OpSha256<0xa8> "OP_SHA256",
    OpHash160<0xa9> "OP_HASH160",
    OpHash256<0xaa> "OP_HASH256",
    OpCodeSeparator<0xab> "OP_CODESEPARATOR",
    OpCheckSig<0xac> "OP_CHECKSIG",
    OpCheckSigVerify<0xad> "OP_CHECKSIGVERIFY",
    OpCheckMultiSig<0xae> "OP_CHECKMULTISIG",
    OpCheckMultiSigVerify<0xaf> "OP_CHECKMULTISIGVERIFY",
    OpCheckLockTimeVerify<0xb1> "OP_CHECKLOCKTIMEVERIFY",
    OpCheckSequenceVerify<0xb2> "OP_CHECKSEQUENCEVERIFY",
    OpCheckSigAdd<0xba> "OP_CHECKSIGADD",

    OpCheckSigFromStack<0xc1> "OP_CHECKSIGFROMSTACK",
    OpCheckSigFromStackVerify<0xc2> "OP_CHECKSIGFROMSTACKVERIFY",
    OpSha256Initialize<0xc4> "OP_SHA256INITIALIZE",
    OpSha256Update<0xc5> "OP_SHA256UPDATE",
    OpSha256Finalize<0xc6> "OP_SHA256FINALIZE",

    OpInspectInputOutpoint<0xc7> "OP_INSPECTINPUTOUTPOINT",
    OpInspectInputAsset<0xc8> "OP_INSPECTINPUTASSET",
    OpInspectInputValue<0xc9> "OP_INSPECTINPUTVALUE",
    OpInspectInputScriptPubKey<0xca> "OP_INSPECTINPUTSCRIPTPUBKEY",
    OpInspectInputSequence<0xcb> "OP_INSPECTINPUTSEQUENCE",
    OpInspectInputIssuance<0xcc> "OP_INSPECTINPUTISSUANCE",
    OpPushCurrentInputIndex<0xcd> "OP_PUSHCURRENTINPUTINDEX",
    OpInspectOutputAsset<0xce> "OP_INSPECTOUTPUTASSET",
    OpInspectOutputValue<0xcf> "OP_INSPECTOUTPUTVALUE",
    OpInspectOutputNonce<0xd0> "OP_INSPECTOUTPUTNONCE",
    OpInspectOutputScriptPubKey<0xd1> "OP_INSPECTOUTPUTSCRIPTPUBKEY",
    OpInspectVersion<0xd2> "OP_INSPECTVERSION",
    OpInspectLockTime<0xd3> "OP_INSPECTLOCKTIME",
    OpInspectNumInputs<0xd4> "OP_INSPECTNUMINPUTS",
    OpInspectNumOutputs<0xd5> "OP_INSPECTNUMOUTPUTS",
    OpTxWeight<0xd6> "OP_TXWEIGHT",

    OpAdd64<0xd7> "OP_ADD64",
    OpSub64<0xd8> "OP_SUB64",
    OpMul64<0xd9> "OP_MUL64",
    OpDiv64<0xda> "OP_DIV64",
    OpNeg64<0xdb> "OP_NEG64",
    OpLessThan64<0xdc> "OP_LESSTHAN64",
    OpLessThanOrEqual64<0xdd> "OP_LESSTHANOREQUAL64",
    OpGreaterThan64<0xde> "OP_GREATERTHAN64",
    OpGreaterThanOrEqual64<0xdf> "OP_GREATERTHANOREQUAL64",
    OpScriptNumToLe64<0xe0> "OP_SCRIPTNUMTOLE64",
    OpLe64ToScriptNum<0xe1> "OP_LE64TOSCRIPTNUM",
    OpLe32ToLe64<0xe2> "OP_LE32TOLE64",
    OpEcMulScalarVerify<0xe3> "OP_ECMULSCALARVERIFY",
    OpTweakVerify<0xe4> "OP_TWEAKVERIFY",
}

#[allow(non_upper_case_globals)]
pub mod aliases {
    use super::codes;

    pub const OpFalse: u8 = codes::Op0;
    pub const OpTrue: u8 = codes::Op1;
}

/// ASM rendering of a single opcode. Direct pushes render as `OP_PUSHBYTES_<n>`.
pub fn opcode_to_str(opcode: u8) -> String {
    match opcode {
        OP_DATA_MIN_VAL..=OP_DATA_MAX_VAL => format!("OP_PUSHBYTES_{opcode}"),
        _ => name_of(opcode).map(str::to_string).unwrap_or_else(|| format!("OP_UNKNOWN_{opcode:#04x}")),
    }
}
