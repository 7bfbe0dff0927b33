//! Network analysis.
//!
//! Derives the descriptive fields shown for a network: masks, first and last
//! addresses, the usable host range and scope flags.

use super::scope::{ScopeFlags, ScopeTable};
use crate::models::{format_address, format_expanded, AddressCount, Family, Network};
use serde::Serialize;
use std::fmt;

/// Usable hosts of a network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HostRange {
    /// `/32` and `/128`: the network address is the only host.
    Single { host: String },
    /// Every other network, including point-to-point `/31` and `/127`.
    Range { first: String, last: String },
}

impl HostRange {
    pub fn of(network: &Network) -> HostRange {
        let family = network.family();
        let base = network.base_address();
        let broadcast = network.broadcast_address();
        match network.width() - network.prefix_len() {
            0 => HostRange::Single {
                host: format_address(family, base),
            },
            // point-to-point, no broadcast excluded
            1 => HostRange::Range {
                first: format_address(family, base),
                last: format_address(family, broadcast),
            },
            _ => HostRange::Range {
                first: format_address(family, base + 1),
                last: format_address(family, broadcast - 1),
            },
        }
    }

    pub fn first(&self) -> &str {
        match self {
            HostRange::Single { host } => host,
            HostRange::Range { first, .. } => first,
        }
    }

    pub fn last(&self) -> &str {
        match self {
            HostRange::Single { host } => host,
            HostRange::Range { last, .. } => last,
        }
    }
}

impl fmt::Display for HostRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            HostRange::Single { host } => f.write_str(host),
            HostRange::Range { first, last } => write!(f, "{first} to {last}"),
        }
    }
}

/// Number of usable hosts: 1 for a single address, 2 for point-to-point,
/// otherwise every address except the network and broadcast addresses.
pub fn usable_hosts(network: &Network) -> u128 {
    match network.width() - network.prefix_len() {
        0 => 1,
        1 => 2,
        128 => u128::MAX - 1,
        bits => (1u128 << bits) - 2,
    }
}

/// Write a `u128` as a decimal string, like [`AddressCount`], so JSON readers
/// limited to 64-bit numbers keep the exact value.
fn as_decimal<S>(value: &u128, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_str(value)
}

/// Everything known about one network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisRecord {
    pub version: Family,
    pub total_addresses: AddressCount,
    #[serde(serialize_with = "as_decimal")]
    pub usable_hosts: u128,
    pub cidr: String,
    pub netmask: String,
    pub hostmask: String,
    pub expanded: String,
    pub network: String,
    pub broadcast: String,
    pub hosts: HostRange,
    /// IPv4 only, the network address as upper-case hex.
    pub hexadecimal: Option<String>,
    pub flags: ScopeFlags,
}

/// Analyze a network with the built-in scope table.
pub fn analyze(network: &Network) -> AnalysisRecord {
    analyze_with(network, ScopeTable::builtin())
}

/// Analyze a network, classifying it with `table`.
pub fn analyze_with(network: &Network, table: &ScopeTable) -> AnalysisRecord {
    let family = network.family();
    let base = network.base_address();
    log::debug!("analyze({network})");

    AnalysisRecord {
        version: family,
        total_addresses: network.total_addresses(),
        usable_hosts: usable_hosts(network),
        cidr: network.to_string(),
        netmask: format_address(family, network.netmask()),
        hostmask: format_address(family, network.hostmask()),
        expanded: format!(
            "{}/{}",
            format_expanded(family, base),
            network.prefix_len()
        ),
        network: format_address(family, base),
        broadcast: format_address(family, network.broadcast_address()),
        hosts: HostRange::of(network),
        hexadecimal: match family {
            Family::V4 => Some(format!("{base:X}")),
            Family::V6 => None,
        },
        flags: table.classify(network),
    }
}

/// Per-subnet fields shown next to each child of a split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubnetSummary {
    pub network: Network,
    pub cidr: String,
    pub total_addresses: AddressCount,
    #[serde(serialize_with = "as_decimal")]
    pub usable_hosts: u128,
    pub hosts: HostRange,
}

pub fn summarize(network: &Network) -> SubnetSummary {
    SubnetSummary {
        network: *network,
        cidr: network.to_string(),
        total_addresses: network.total_addresses(),
        usable_hosts: usable_hosts(network),
        hosts: HostRange::of(network),
    }
}
