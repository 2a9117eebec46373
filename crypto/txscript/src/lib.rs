//! Script construction for the covenant AMM.
//!
//! [`covenant::CovenantScript`] lowers the pool parameters to a small typed program and compiles
//! it with the canonical [`script_builder::ScriptBuilder`]. [`taproot::CovenantCommitment`]
//! commits the program to a single-leaf Elements taproot output.

pub mod covenant;
pub mod error;
pub mod opcodes;
pub mod script_builder;
pub mod standard;
pub mod taproot;

pub use covenant::{CovenantScript, Node};
pub use error::CovenantError;
pub use taproot::CovenantCommitment;

/// Upper bound on the size of a script produced by the builder.
pub const MAX_SCRIPT_SIZE: usize = 10_000;
/// Largest data push the interpreter accepts.
pub const MAX_SCRIPT_ELEMENT_SIZE: usize = 520;
