//! Logger and logging macros.
//!
//! Every crate of the workspace logs through the `amm_core::{trace, debug, info, warn, error}`
//! macros, which forward to the [`log`](::log) facade. The process installs a `log4rs`
//! backend once at startup with [`init_logger`].

use self::{appender::AppenderSpec, filters::Filters};
use ::log::LevelFilter;
use log4rs::config::{Config, Root};
use thiserror::Error;

mod appender;
mod filters;

pub use filters::FilterSpec;

#[doc(hidden)]
pub use ::log as __private_log;

pub const DEFAULT_LOGGER_ENV: &str = "RUST_LOG";
pub const DEFAULT_LOG_FILTERS: &str = "info";

const LOG_FILE_NAME: &str = "covenant-amm.log";
const ERR_LOG_FILE_NAME: &str = "covenant-amm_err.log";
const CONSOLE_APPENDER: &str = "stdout";
const LOG_FILE_APPENDER: &str = "log_file";
const ERR_LOG_FILE_APPENDER: &str = "err_log_file";

#[derive(Debug, Error)]
pub enum LogError {
    #[error("logger spec parsing error: {0}")]
    ParseFilterSpec(String),

    #[error("cannot create log file appender in {0}: {1}")]
    FileAppender(String, String),

    #[error("invalid logger configuration: {0}")]
    Config(String),

    #[error(transparent)]
    SetLogger(#[from] ::log::SetLoggerError),
}

/// Installs the global logger.
///
/// `filters` is a comma separated list of `level` or `target=level` items, for instance
/// `info,amm_wallet=debug`. Items found in the `RUST_LOG` environment variable are applied
/// after `filters` and take precedence. When `log_dir` is set, two size-rolled files are
/// written there: a full log and an error-only log.
pub fn init_logger(log_dir: Option<&str>, filters: &str) -> Result<(), LogError> {
    let mut appenders = vec![AppenderSpec::console(CONSOLE_APPENDER, None)];
    if let Some(log_dir) = log_dir {
        appenders.push(AppenderSpec::roller(LOG_FILE_APPENDER, None, log_dir, LOG_FILE_NAME)?);
        appenders.push(AppenderSpec::roller(ERR_LOG_FILE_APPENDER, Some(LevelFilter::Warn), log_dir, ERR_LOG_FILE_NAME)?);
    }
    let names = appenders.iter().map(|x| x.name).collect::<Vec<_>>();

    let loggers = Filters::new().parse_expression(filters).parse_env(DEFAULT_LOGGER_ENV).build();

    let config = Config::builder()
        .appenders(appenders.into_iter().map(AppenderSpec::into_appender))
        .loggers(loggers.items())
        .build(Root::builder().appenders(names).build(loggers.root_level()))
        .map_err(|err| LogError::Config(err.to_string()))?;

    log4rs::init_config(config)?;
    Ok(())
}

#[macro_export]
macro_rules! trace {
    ($($t:tt)*) => ( $crate::log::__private_log::trace!($($t)*) )
}

#[macro_export]
macro_rules! debug {
    ($($t:tt)*) => ( $crate::log::__private_log::debug!($($t)*) )
}

#[macro_export]
macro_rules! info {
    ($($t:tt)*) => ( $crate::log::__private_log::info!($($t)*) )
}

#[macro_export]
macro_rules! warn {
    ($($t:tt)*) => ( $crate::log::__private_log::warn!($($t)*) )
}

#[macro_export]
macro_rules! error {
    ($($t:tt)*) => ( $crate::log::__private_log::error!($($t)*) )
}
