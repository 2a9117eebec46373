//! Process-wide shutdown signal.

use amm_core::{info, warn};
use thiserror::Error;
pub use triggered::{Listener, Trigger};

#[derive(Debug, Error)]
pub enum SignalError {
    #[error("cannot install the termination handler: {0}")]
    Handler(#[from] ctrlc::Error),
}

/// A one-shot shutdown signal shared by the long-running loops of the process.
///
/// Clones observe the same underlying trigger. Loops wait on [`Shutdown::listener`] inside a
/// `select!` alongside their own work and exit once it fires.
#[derive(Debug, Clone)]
pub struct Shutdown {
    trigger: Trigger,
    listener: Listener,
}

impl Shutdown {
    pub fn new() -> Self {
        let (trigger, listener) = triggered::trigger();
        Self { trigger, listener }
    }

    /// Fires the signal on SIGINT or SIGTERM. A second signal while shutting down aborts the process.
    pub fn register_termination_handler(&self) -> Result<(), SignalError> {
        let trigger = self.trigger.clone();
        ctrlc::set_handler(move || {
            if trigger.is_triggered() {
                warn!("Received a second termination signal, aborting");
                std::process::exit(1);
            }
            info!("Received a termination signal, shutting down...");
            trigger.trigger();
        })?;
        Ok(())
    }

    pub fn trigger(&self) {
        self.trigger.trigger();
    }

    pub fn is_triggered(&self) -> bool {
        self.listener.is_triggered()
    }

    pub fn listener(&self) -> Listener {
        self.listener.clone()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
