use crate::script_builder::ScriptBuilderError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CovenantError {
    #[error("genesis product {0} does not fit a signed 64-bit script number")]
    GenesisProductOverflow(u128),

    #[error("genesis product must be positive")]
    ZeroGenesisProduct,

    #[error(transparent)]
    ScriptBuilder(#[from] ScriptBuilderError),

    #[error("invalid internal key: {0}")]
    InternalKey(String),

    #[error("taproot tweak rejected: {0}")]
    Tweak(String),
}
