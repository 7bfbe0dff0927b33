//! IPv4 and IPv6 subnet calculator.
//!
//! Parses networks in CIDR notation, derives their masks, host ranges and
//! scope flags, and splits them into equal-size children.

pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod processing;

pub use error::{Error, ParseError, SplitError};
pub use models::{parse_network, parse_network_with_mask, AddressCount, Family, Network};
pub use processing::{
    analyze, analyze_with, split, split_summary, split_with_limit, AnalysisRecord, ScopeTable,
    SplitRequest, SplitSummary,
};
