pub mod args;
pub mod constants;
pub mod controller;
pub mod error;
pub mod input;
pub mod report;

pub use controller::{Controller, ControllerConfig};
pub use error::{TraderError, TraderResult};
pub use input::{AmountSource, StdinAmounts};
