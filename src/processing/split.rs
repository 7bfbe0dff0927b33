//! Subnet splitting.
//!
//! Cuts a network into equal-size children by extending the prefix, either to
//! a requested length or by enough bits to reach a requested count.

use super::analyze::{summarize, SubnetSummary};
use crate::error::SplitError;
use crate::models::{AddressCount, Network};
use serde::{Deserialize, Serialize};

/// Default cap on the number of children a split may produce.
pub const DEFAULT_SPLIT_LIMIT: usize = 1 << 20;

/// How to split a network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitRequest {
    /// At least this many parts, rounded up to a power of two.
    ByCount(u64),
    /// Children of exactly this prefix length.
    ByPrefixLength(u32),
}

/// Work out the prefix length of the children.
///
/// Splitting a /24:
/// - in 2 parts: /25 (1 bit longer, 2^1 = 2)
/// - in 4 parts: /26 (2 bits longer, 2^2 = 4)
/// - in 5 parts: /27 (3 bits longer, 2^3 = 8 >= 5)
pub fn resolve_child_prefix(network: &Network, request: SplitRequest) -> Result<u8, SplitError> {
    let current = network.prefix_len();
    let width = network.width();

    match request {
        SplitRequest::ByPrefixLength(requested) => {
            if requested <= current as u32 || requested > width as u32 {
                log::warn!("Rejecting split of {network} to /{requested}");
                return Err(SplitError::InvalidPrefix {
                    requested,
                    current,
                    max: width,
                });
            }
            Ok(requested as u8)
        }
        SplitRequest::ByCount(count) => {
            if count < 2 {
                return Err(SplitError::InvalidCount(count));
            }
            // ceil(log2(count)) without floating point
            let extra_bits = match count.checked_next_power_of_two() {
                Some(power) => power.trailing_zeros(),
                None => u64::BITS,
            };
            let available = (width - current) as u32;
            if extra_bits > available {
                log::warn!("Rejecting split of {network} into {count} parts");
                return Err(SplitError::TooManySubnets {
                    current,
                    subnets: count.to_string(),
                    limit: AddressCount::pow2(available as u8).to_string(),
                });
            }
            Ok(current + extra_bits as u8)
        }
    }
}

/// Split with the default limit.
pub fn split(network: &Network, request: SplitRequest) -> Result<Vec<Network>, SplitError> {
    split_with_limit(network, request, DEFAULT_SPLIT_LIMIT)
}

/// Split into children, refusing to produce more than `limit` of them.
///
/// Children are in ascending address order; the first starts at the parent's
/// network address and the last ends at its broadcast address.
pub fn split_with_limit(
    network: &Network,
    request: SplitRequest,
    limit: usize,
) -> Result<Vec<Network>, SplitError> {
    let child_prefix = resolve_child_prefix(network, request)?;
    let count = AddressCount::pow2(child_prefix - network.prefix_len());

    let count = match count.get() {
        Some(n) if n <= limit as u128 => n as usize,
        _ => {
            log::warn!("Split of {network} into {count} x /{child_prefix} exceeds limit {limit}");
            return Err(SplitError::TooManySubnets {
                current: network.prefix_len(),
                subnets: count.to_string(),
                limit: limit.to_string(),
            });
        }
    };

    // child_prefix > prefix >= 0, so the shift is at most width - 1
    let step = 1u128 << (network.width() - child_prefix);
    let family = network.family();
    let base = network.base_address();
    log::debug!("split({network}) into {count} x /{child_prefix}");

    Ok((0..count as u128)
        .map(|i| Network::from_aligned(family, base + i * step, child_prefix))
        .collect())
}

/// A split together with the per-child display fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitSummary {
    pub parent: Network,
    pub prefix_len: u8,
    pub total_subnets: usize,
    pub subnets: Vec<SubnetSummary>,
}

pub fn split_summary(
    network: &Network,
    request: SplitRequest,
    limit: usize,
) -> Result<SplitSummary, SplitError> {
    let children = split_with_limit(network, request, limit)?;
    let prefix_len = children
        .first()
        .map(|c| c.prefix_len())
        .unwrap_or(network.prefix_len());

    Ok(SplitSummary {
        parent: *network,
        prefix_len,
        total_subnets: children.len(),
        subnets: children.iter().map(summarize).collect(),
    })
}
