//! Subnet analysis and splitting.
//!
//! This module contains the logic that works on parsed networks:
//! - [`analyze`] - Derived fields of a network
//! - [`scope`] - Reserved-range classification
//! - [`split`] - Splitting a network into equal-size children

mod analyze;
mod scope;
mod split;

// Re-export public functions
pub use analyze::{
    analyze, analyze_with, summarize, usable_hosts, AnalysisRecord, HostRange, SubnetSummary,
};
pub use scope::{ScopeFlag, ScopeFlags, ScopeRange, ScopeTable};
pub use split::{
    resolve_child_prefix, split, split_summary, split_with_limit, SplitRequest, SplitSummary,
    DEFAULT_SPLIT_LIMIT,
};
