use std::iter::once;

use crate::{
    opcodes::{codes::*, OP_1_NEGATE_VAL, OP_DATA_MAX_VAL, OP_DATA_MIN_VAL, OP_SMALL_INT_MAX_VAL},
    MAX_SCRIPT_ELEMENT_SIZE, MAX_SCRIPT_SIZE,
};
use thiserror::Error;

/// Default capacity of the backing buffer. The covenant script fits in it.
const DEFAULT_SCRIPT_ALLOC: usize = 512;

#[derive(Error, PartialEq, Eq, Debug, Clone, Copy)]
pub enum ScriptBuilderError {
    #[error("adding opcode {0} would exceed the maximum allowed canonical script length of {MAX_SCRIPT_SIZE}")]
    OpCodeRejected(u8),

    #[error("adding {0} opcodes would exceed the maximum allowed canonical script length of {MAX_SCRIPT_SIZE}")]
    OpCodesRejected(usize),

    #[error("adding {0} bytes of data would exceed the maximum allowed canonical script length of {MAX_SCRIPT_SIZE}")]
    DataRejected(usize),

    #[error("adding a data element of {0} bytes exceed the maximum allowed script element size of {MAX_SCRIPT_ELEMENT_SIZE}")]
    ElementExceedsMaxSize(usize),

    #[error("adding integer {0} would exceed the maximum allowed canonical script length of {MAX_SCRIPT_SIZE}")]
    IntegerRejected(i64),
}
pub type ScriptBuilderResult<T> = std::result::Result<T, ScriptBuilderError>;

/// ScriptBuilder provides a facility for building custom scripts. It allows
/// you to push opcodes, ints, and data while respecting canonical encoding. It
/// does not ensure the script will execute correctly, however pushes which
/// would exceed the script limits are refused with an error and leave the
/// script unchanged.
///
/// ```
/// use amm_txscript::opcodes::codes::*;
/// use amm_txscript::script_builder::{ScriptBuilderResult, ScriptBuilder};
/// fn output_value_product() -> ScriptBuilderResult<Vec<u8>> {
///     Ok(ScriptBuilder::new()
///         .add_i64(0)?.add_op(OpInspectOutputValue)?.add_op(OpDrop)?
///         .add_i64(1)?.add_op(OpInspectOutputValue)?.add_op(OpDrop)?
///         .add_ops(&[OpMul64, OpVerify])?
///         .drain())
/// }
/// ```
pub struct ScriptBuilder {
    script: Vec<u8>,
}

impl ScriptBuilder {
    pub fn new() -> Self {
        Self { script: Vec::with_capacity(DEFAULT_SCRIPT_ALLOC) }
    }

    pub fn script(&self) -> &[u8] {
        &self.script
    }

    pub fn drain(&mut self) -> Vec<u8> {
        // The builder is not meant to be reused after draining
        std::mem::take(&mut self.script)
    }

    /// Pushes the passed opcode to the end of the script. The script will not
    /// be modified if pushing the opcode would cause the script to exceed the
    /// maximum allowed script size.
    pub fn add_op(&mut self, opcode: u8) -> ScriptBuilderResult<&mut Self> {
        if self.script.len() >= MAX_SCRIPT_SIZE {
            return Err(ScriptBuilderError::OpCodeRejected(opcode));
        }

        self.script.push(opcode);
        Ok(self)
    }

    pub fn add_ops(&mut self, opcodes: &[u8]) -> ScriptBuilderResult<&mut Self> {
        if self.script.len() + opcodes.len() > MAX_SCRIPT_SIZE {
            return Err(ScriptBuilderError::OpCodesRejected(opcodes.len()));
        }

        self.script.extend_from_slice(opcodes);
        Ok(self)
    }

    /// Returns the number of bytes the canonical encoding of the data will take.
    pub fn canonical_data_size(data: &[u8]) -> usize {
        let data_len = data.len();

        // Single small numbers are pushed with one of the small integer opcodes
        if data_len == 0 || (data_len == 1 && (data[0] <= OP_SMALL_INT_MAX_VAL || data[0] == OP_1_NEGATE_VAL)) {
            return 1;
        }

        data_len
            + if data_len <= OP_DATA_MAX_VAL as usize {
                1 // length encoded as OP_PUSHBYTES_#
            } else if data_len <= u8::MAX as usize {
                2 // length encoded as OP_PUSHDATA1 + 1 byte for value
            } else if data_len <= u16::MAX as usize {
                3 // length encoded as OP_PUSHDATA2 + 2 bytes for value
            } else {
                5 // length encoded as OP_PUSHDATA4 + 4 bytes for value
            }
    }

    /// Pushes the data choosing the canonical opcode for its length. No limits are enforced here.
    fn add_raw_data(&mut self, data: &[u8]) -> &mut Self {
        let data_len = data.len();

        if data_len == 0 || (data_len == 1 && data[0] == 0) {
            self.script.push(Op0);
            return self;
        } else if data_len == 1 && data[0] <= OP_SMALL_INT_MAX_VAL {
            self.script.push((Op1 - 1) + data[0]);
            return self;
        } else if data_len == 1 && data[0] == OP_1_NEGATE_VAL {
            self.script.push(Op1Negate);
            return self;
        }

        if data_len <= OP_DATA_MAX_VAL as usize {
            self.script.push((OP_DATA_MIN_VAL - 1) + data_len as u8);
        } else if data_len <= u8::MAX as usize {
            self.script.extend(once(OpPushData1).chain(once(data_len as u8)));
        } else if data_len <= u16::MAX as usize {
            self.script.extend(once(OpPushData2).chain((data_len as u16).to_le_bytes()));
        } else {
            self.script.extend(once(OpPushData4).chain((data_len as u32).to_le_bytes()));
        }

        self.script.extend(data);
        self
    }

    /// Pushes the passed data to the end of the script with its canonical opcode.
    ///
    /// A zero length buffer pushes `OP_0`. Data larger than [`MAX_SCRIPT_ELEMENT_SIZE`], or data
    /// that would grow the script beyond [`MAX_SCRIPT_SIZE`], is refused.
    pub fn add_data(&mut self, data: &[u8]) -> ScriptBuilderResult<&mut Self> {
        let data_size = Self::canonical_data_size(data);

        if self.script.len() + data_size > MAX_SCRIPT_SIZE {
            return Err(ScriptBuilderError::DataRejected(data_size));
        }

        let data_len = data.len();
        if data_len > MAX_SCRIPT_ELEMENT_SIZE {
            return Err(ScriptBuilderError::ElementExceedsMaxSize(data_len));
        }

        Ok(self.add_raw_data(data))
    }

    /// Pushes `val` as a minimally encoded script number.
    pub fn add_i64(&mut self, val: i64) -> ScriptBuilderResult<&mut Self> {
        if self.script.len() + 1 > MAX_SCRIPT_SIZE {
            return Err(ScriptBuilderError::IntegerRejected(val));
        }

        // Fast path for small integers and Op1Negate.
        if val == 0 {
            self.script.push(Op0);
            return Ok(self);
        }
        if val == -1 || (1..=16).contains(&val) {
            self.script.push(((Op1 as i64 - 1) + val) as u8);
            return Ok(self);
        }

        self.add_data(&serialize_script_num(val))
    }

    /// Pushes `val` as the 8-byte little-endian operand taken by the 64-bit arithmetic opcodes.
    pub fn add_le64(&mut self, val: i64) -> ScriptBuilderResult<&mut Self> {
        self.add_data(&val.to_le_bytes())
    }
}

impl Default for ScriptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Little-endian sign-magnitude encoding with the sign in the top bit of the last byte.
pub(crate) fn serialize_script_num(val: i64) -> Vec<u8> {
    if val == 0 {
        return vec![];
    }
    let negative = val < 0;
    let mut magnitude = val.unsigned_abs();
    let mut bytes = Vec::with_capacity(9);
    while magnitude > 0 {
        bytes.push((magnitude & 0xff) as u8);
        magnitude >>= 8;
    }
    // An extra byte carries the sign when the top bit is already taken by the magnitude
    let last = bytes.len() - 1;
    if bytes[last] & 0x80 != 0 {
        bytes.push(if negative { 0x80 } else { 0 });
    } else if negative {
        bytes[last] |= 0x80;
    }
    bytes
}
