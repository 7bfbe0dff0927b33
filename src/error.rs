//! Error types.
//!
//! [`ParseError`] and [`SplitError`] come out of the core; [`Error`] wraps
//! them together with configuration and output failures for the command
//! surface.

use thiserror::Error;

/// Result type for command operations
pub type Result<T> = std::result::Result<T, Error>;

/// A CIDR string that cannot be read as a network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Empty network string")]
    Empty,

    #[error("Invalid address {0}")]
    InvalidAddress(String),

    #[error("Missing prefix length in '{0}', expected address/prefix")]
    MissingPrefix(String),

    #[error("Invalid prefix length '{0}'")]
    InvalidPrefix(String),

    #[error("Prefix length {prefix} is too long, maximum is {max}")]
    PrefixOutOfRange { prefix: String, max: u8 },

    #[error("Invalid netmask '{0}', mask bits must be contiguous")]
    InvalidMask(String),
}

/// A split request that cannot be honoured.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplitError {
    #[error("New prefix length /{requested} must be longer than /{current} and at most /{max}")]
    InvalidPrefix { requested: u32, current: u8, max: u8 },

    #[error("Cannot split a /{current} into {subnets} subnets, at most {limit} allowed")]
    TooManySubnets {
        current: u8,
        subnets: String,
        limit: String,
    },

    #[error("Cannot split into {0} part(s), the count must be at least 2")]
    InvalidCount(u64),
}

/// Errors surfaced by the command surface.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Split(#[from] SplitError),

    #[error("{0}")]
    Usage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON output failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Short title for the error panel.
    pub fn title(&self) -> &'static str {
        match self {
            Error::Parse(_) => "ParseError",
            Error::Split(_) => "SplitError",
            Error::Usage(_) => "Invalid Command Usage",
            Error::Config(_) => "ConfigError",
            Error::Json(_) => "OutputError",
        }
    }

    /// Hint printed under the message.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Error::Parse(_) => Some(
                "Please provide a valid IPv4 or IPv6 network address (e.g., '192.168.1.0/24' or '2001:db8::/32')"
                    .to_string(),
            ),
            Error::Split(SplitError::InvalidPrefix { current, max, .. }) => Some(format!(
                "Use a prefix length greater than {current} and at most {max}"
            )),
            Error::Split(SplitError::TooManySubnets { .. }) => Some(
                "Use a shorter prefix or a smaller count, or raise IPNET_SPLIT_LIMIT".to_string(),
            ),
            Error::Split(SplitError::InvalidCount(count)) => {
                Some(format!("Why do you try to split in {count}?"))
            }
            Error::Usage(_) => Some(
                "Use --count <number> to split into N subnets OR --mask <length> to create subnets of specific size"
                    .to_string(),
            ),
            Error::Config(_) | Error::Json(_) => None,
        }
    }
}
