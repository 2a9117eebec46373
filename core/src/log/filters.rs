use super::LogError;
use log::LevelFilter;
use log4rs::config::Logger;
use std::{collections::HashMap, env, mem, str::FromStr};

/// One item of a filter expression: either a root level (`debug`) or a
/// per-target level (`amm_wallet=trace`). A bare target name enables every level for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterSpec {
    pub target: Option<String>,
    pub level: LevelFilter,
}

impl FromStr for FilterSpec {
    type Err = LogError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let mut parts = spec.trim().split('=');
        match (parts.next(), parts.next().map(|x| x.trim()), parts.next()) {
            (Some(""), None, None) => Err(LogError::ParseFilterSpec(spec.to_string())),
            (Some(part0), None, None) => match part0.parse() {
                Ok(level) => Ok(Self { target: None, level }),
                Err(_) => Ok(Self { target: Some(part0.to_string()), level: LevelFilter::max() }),
            },
            (Some(part0), Some(""), None) => Ok(Self { target: Some(part0.to_string()), level: LevelFilter::max() }),
            (Some(part0), Some(part1), None) => match part1.parse() {
                Ok(level) => Ok(Self { target: Some(part0.to_string()), level }),
                Err(_) => Err(LogError::ParseFilterSpec(part1.to_string())),
            },
            _ => Err(LogError::ParseFilterSpec(spec.to_string())),
        }
    }
}

pub(super) struct LoggerSpec {
    name: String,
    level: LevelFilter,
}

impl LoggerSpec {
    /// Target loggers own no appender, records flow to the root appenders through additivity.
    fn logger(&self) -> Logger {
        Logger::builder().build(self.name.clone(), self.level)
    }
}

pub(super) struct Loggers {
    loggers: Vec<LoggerSpec>,
    root_level: LevelFilter,
}

impl Loggers {
    pub fn root_level(&self) -> LevelFilter {
        self.root_level
    }

    pub fn items(&self) -> impl IntoIterator<Item = Logger> + '_ {
        self.loggers.iter().map(|x| x.logger())
    }
}

/// Accumulates filter expressions, later items overriding earlier ones.
pub(super) struct Filters {
    loggers: HashMap<String, LevelFilter>,
    root_level: Option<LevelFilter>,
}

impl Filters {
    pub fn new() -> Self {
        Self { loggers: HashMap::new(), root_level: None }
    }

    pub fn parse_env(&mut self, env: &str) -> &mut Self {
        self.parse_expression(&env::var(env).unwrap_or_default())
    }

    pub fn parse_expression(&mut self, expression: &str) -> &mut Self {
        for spec in expression.split(',').map(|x| x.trim()).filter(|x| !x.is_empty()) {
            match spec.parse::<FilterSpec>() {
                Ok(FilterSpec { target: Some(target), level }) => {
                    self.loggers.insert(target, level);
                }
                Ok(FilterSpec { target: None, level }) => {
                    self.root_level.replace(level);
                }
                Err(err) => eprintln!("Ignoring invalid logging spec '{}'", err),
            }
        }
        self
    }

    pub fn build(&mut self) -> Loggers {
        let loggers = mem::take(&mut self.loggers)
            .into_iter()
            .map(|(name, level)| LoggerSpec { name, level })
            .collect::<Vec<_>>();
        Loggers { loggers, root_level: self.root_level.take().unwrap_or(LevelFilter::Info) }
    }
}
