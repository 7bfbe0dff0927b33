//! Runtime configuration.
//!
//! Values come from the environment (after `dotenv` has loaded `.env`), each
//! with a default so the tool runs with no configuration at all.

use crate::error::Error;
use crate::processing::{ScopeTable, DEFAULT_SPLIT_LIMIT};
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::path::{Path, PathBuf};

/// Rows shown in a split table before the overflow note.
pub const MAX_DISPLAYED_SUBNETS: usize = 50;

const ENV_MAX_DISPLAYED: &str = "IPNET_MAX_DISPLAYED";
const ENV_SPLIT_LIMIT: &str = "IPNET_SPLIT_LIMIT";
const ENV_SCOPE_TABLE: &str = "IPNET_SCOPE_TABLE";
const ENV_LOG_CONFIG: &str = "IPNET_LOG_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub max_displayed_subnets: usize,
    pub split_limit: usize,
    pub scope_table: Option<PathBuf>,
    pub log_config: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_displayed_subnets: MAX_DISPLAYED_SUBNETS,
            split_limit: DEFAULT_SPLIT_LIMIT,
            scope_table: None,
            log_config: PathBuf::from("log4rs.yml"),
        }
    }
}

impl Config {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Config, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Config, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        if let Some(value) = lookup(ENV_MAX_DISPLAYED) {
            config.max_displayed_subnets = parse_usize(ENV_MAX_DISPLAYED, &value)?;
        }
        if let Some(value) = lookup(ENV_SPLIT_LIMIT) {
            config.split_limit = parse_usize(ENV_SPLIT_LIMIT, &value)?;
        }
        if let Some(value) = lookup(ENV_SCOPE_TABLE).filter(|v| !v.trim().is_empty()) {
            config.scope_table = Some(PathBuf::from(value.trim()));
        }
        if let Some(value) = lookup(ENV_LOG_CONFIG).filter(|v| !v.trim().is_empty()) {
            config.log_config = PathBuf::from(value.trim());
        }
        Ok(config)
    }

    /// The scope table to classify with: the configured file, else the built-in one.
    pub fn scope_table(&self) -> Result<ScopeTable, Error> {
        match &self.scope_table {
            Some(path) => ScopeTable::load(path),
            None => Ok(ScopeTable::builtin().clone()),
        }
    }
}

fn parse_usize(key: &str, value: &str) -> Result<usize, Error> {
    value
        .trim()
        .parse()
        .map_err(|e| Error::Config(format!("{key}={value} is not a valid count: {e}")))
}

/// Initialise log4rs from `log_config`, or log warnings to stderr when the
/// file is missing or unusable.
pub fn init_logging(log_config: &Path) {
    if log_config.exists() {
        match log4rs::init_file(log_config, Default::default()) {
            Ok(()) => return,
            Err(e) => eprintln!("Error initializing log4rs from {}: {e}", log_config.display()),
        }
    }

    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("{d(%H:%M:%S)} {h({l})} {t} - {m}{n}")))
        .build();
    let fallback = log4rs::config::Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(LevelFilter::Warn));
    match fallback {
        Ok(fallback) => {
            if let Err(e) = log4rs::init_config(fallback) {
                eprintln!("Error initializing fallback logger: {e}");
            }
        }
        Err(e) => eprintln!("Error building fallback logger: {e}"),
    }
}
