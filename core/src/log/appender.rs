use super::LogError;
use log::LevelFilter;
use log4rs::{
    append::{
        console::ConsoleAppender,
        rolling_file::{
            policy::compound::{roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger, CompoundPolicy},
            RollingFileAppender,
        },
        Append,
    },
    config::Appender,
    encode::pattern::PatternEncoder,
    filter::{threshold::ThresholdFilter, Filter},
};
use std::path::PathBuf;

/// Console line pattern, UTC time denoted by the Z suffix.
const LINE_PATTERN_COLORED: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)}Z [{h({({l}):5.5})}] {m}{n}";
/// File line pattern, UTC time denoted by the Z suffix. Files also record the target.
const LINE_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)}Z [{({l}):5.5}] {t} {m}{n}";

const ARCHIVE_SUFFIX: &str = ".{}.gz";
const BASE_ROLLS: u32 = 1;
const MAX_ROLLS: u32 = 8;
const MAX_FILE_SIZE: u64 = 100_000_000;

pub(super) struct AppenderSpec {
    pub name: &'static str,
    level: Option<LevelFilter>,
    append: Box<dyn Append>,
}

impl AppenderSpec {
    pub fn console(name: &'static str, level: Option<LevelFilter>) -> Self {
        let encoder = Box::new(PatternEncoder::new(LINE_PATTERN_COLORED));
        Self::new(name, level, Box::new(ConsoleAppender::builder().encoder(encoder).build()))
    }

    pub fn roller(name: &'static str, level: Option<LevelFilter>, log_dir: &str, file_name: &str) -> Result<Self, LogError> {
        let file_appender_error = |err: &dyn std::fmt::Display| LogError::FileAppender(log_dir.to_string(), err.to_string());

        let trigger = Box::new(SizeTrigger::new(MAX_FILE_SIZE));
        let file_path = PathBuf::from(log_dir).join(file_name);
        let roller_pattern = PathBuf::from(log_dir).join(format!("{}{}", file_name, ARCHIVE_SUFFIX));
        let roller_pattern = roller_pattern.to_str().ok_or_else(|| file_appender_error(&"non UTF-8 log path"))?;
        let roller =
            FixedWindowRoller::builder().base(BASE_ROLLS).build(roller_pattern, MAX_ROLLS).map_err(|e| file_appender_error(&e))?;
        let roller = Box::new(roller);

        let file_appender = RollingFileAppender::builder()
            .encoder(Box::new(PatternEncoder::new(LINE_PATTERN)))
            .build(file_path, Box::new(CompoundPolicy::new(trigger, roller)))
            .map_err(|e| file_appender_error(&e))?;

        Ok(Self::new(name, level, Box::new(file_appender)))
    }

    pub fn new(name: &'static str, level: Option<LevelFilter>, append: Box<dyn Append>) -> Self {
        Self { name, level, append }
    }

    pub fn into_appender(self) -> Appender {
        Appender::builder()
            .filters(self.level.map(|x| Box::new(ThresholdFilter::new(x)) as Box<dyn Filter>))
            .build(self.name, self.append)
    }
}
