//! PSET roles.

/// Adds inputs and outputs to the PSET.
pub enum Constructor {}

/// Signs the inputs spent with the trader key.
pub enum Signer {}

/// Assembles the witness stack of every input.
pub enum Finalizer {}

/// Extracts the final transaction once every input carries a witness.
pub enum Extractor {}
