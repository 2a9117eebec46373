//! Ambient services shared by every crate of the workspace: the logger,
//! the panic hook and the process shutdown signal.

extern crate self as amm_core;

pub mod log;
pub mod panic;
pub mod signals;
