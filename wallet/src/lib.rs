//! Transaction assembly for the covenant pool.
//!
//! Transactions are described by a [`TxKind`](layout::TxKind) whose input and output roles are
//! validated before signing, then walk the [`Pset`](pset::Pset) roles from construction to
//! extraction. [`Wallet`](wallet::Wallet) ties the assembler to a node for funding and broadcast.

pub mod assembler;
pub mod covenant;
pub mod error;
pub mod keys;
pub mod layout;
pub mod network;
pub mod pset;
pub mod role;
pub mod utxo;
pub mod wallet;

pub use assembler::{Assembler, DEFAULT_FEE};
pub use covenant::CovenantPool;
pub use error::{WalletError, WalletResult};
pub use keys::TraderKeys;
pub use layout::{InputRole, OutputRole, RoleMap, TxKind};
pub use network::Network;
pub use pset::Pset;
pub use utxo::UtxoRef;
pub use wallet::Wallet;
