//! CIDR networks for both address families.
//!
//! Provides [`Network`] for a validated `address/prefix` block, the mask
//! arithmetic behind it, and [`AddressCount`] for exact address counts up to
//! `2^128`.

use super::address::{format_address, parse_address, parse_ipv4, Family};
use crate::error::ParseError;
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Get the netmask for a prefix length, as a `u128` in the family's width.
///
/// # Examples
/// ```
/// use ipnet_calc::models::{get_cidr_mask, Family};
/// assert_eq!(get_cidr_mask(Family::V4, 24).unwrap(), 0xFFFFFF00);
/// ```
pub fn get_cidr_mask(family: Family, len: u8) -> Result<u128, ParseError> {
    let width = family.width();
    if len > width {
        Err(ParseError::PrefixOutOfRange {
            prefix: len.to_string(),
            max: width,
        })
    } else {
        Ok(family.all_ones() ^ host_mask(family, len))
    }
}

/// Host bits for a prefix length. Callers guarantee `len <= width`.
fn host_mask(family: Family, len: u8) -> u128 {
    family.all_ones().checked_shr(len as u32).unwrap_or(0)
}

/// Get the network address for a given address and prefix length.
pub fn cut_addr(family: Family, bits: u128, len: u8) -> Result<u128, ParseError> {
    Ok(bits & get_cidr_mask(family, len)?)
}

/// Exact number of addresses in a block: always a power of two.
///
/// `2^128` does not fit in a `u128`, so the exponent is stored instead and
/// [`Display`](fmt::Display) writes the exact decimal value.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Copy, Clone, Hash)]
pub struct AddressCount {
    exp: u8,
}

const TWO_POW_128: &str = "340282366920938463463374607431768211456";

impl AddressCount {
    /// `2^exp` addresses. `exp` is at most 128.
    pub fn pow2(exp: u8) -> AddressCount {
        debug_assert!(exp <= 128, "exp[{exp}] > 128 should never happen.");
        AddressCount { exp }
    }

    /// The count as a `u128`, `None` for `2^128`.
    pub fn get(&self) -> Option<u128> {
        1u128.checked_shl(self.exp as u32)
    }
}

impl fmt::Display for AddressCount {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.get() {
            Some(count) => write!(f, "{count}"),
            None => f.write_str(TWO_POW_128),
        }
    }
}

impl Serialize for AddressCount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.collect_str(self)
    }
}

/// A validated CIDR block with all host bits cleared.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Copy, Clone, Hash)]
pub struct Network {
    family: Family,
    base: u128,
    prefix: u8,
}

impl Network {
    /// Build a network from an address and prefix length.
    ///
    /// Host bits set in `bits` are masked off: `10.0.0.5/24` becomes
    /// `10.0.0.0/24`.
    pub fn new(family: Family, bits: u128, prefix: u8) -> Result<Network, ParseError> {
        let base = cut_addr(family, bits, prefix)?;
        if base != bits {
            log::debug!(
                "Host bits set in {}/{prefix}, using network {}/{prefix}",
                format_address(family, bits),
                format_address(family, base)
            );
        }
        Ok(Network {
            family,
            base,
            prefix,
        })
    }

    /// Build a network whose base is already aligned to `prefix`.
    pub(crate) fn from_aligned(family: Family, base: u128, prefix: u8) -> Network {
        debug_assert!(prefix <= family.width());
        debug_assert_eq!(base & host_mask(family, prefix), 0);
        Network {
            family,
            base,
            prefix,
        }
    }

    pub fn family(&self) -> Family {
        self.family
    }

    /// Address width in bits (32 or 128).
    pub fn width(&self) -> u8 {
        self.family.width()
    }

    /// The network address.
    pub fn base_address(&self) -> u128 {
        self.base
    }

    pub fn prefix_len(&self) -> u8 {
        self.prefix
    }

    pub fn netmask(&self) -> u128 {
        self.family.all_ones() ^ self.hostmask()
    }

    pub fn hostmask(&self) -> u128 {
        host_mask(self.family, self.prefix)
    }

    /// The last address of the network.
    pub fn broadcast_address(&self) -> u128 {
        self.base | self.hostmask()
    }

    pub fn total_addresses(&self) -> AddressCount {
        AddressCount::pow2(self.width() - self.prefix)
    }

    /// True when every address of `other` lies inside this network.
    pub fn contains(&self, other: &Network) -> bool {
        self.family == other.family
            && other.prefix >= self.prefix
            && other.base & self.netmask() == self.base
    }

    /// True when the single address `bits` of `family` lies inside this network.
    pub fn contains_address(&self, family: Family, bits: u128) -> bool {
        self.family == family && bits & self.netmask() == self.base
    }
}

/// Parse a CIDR string (`"10.0.0.0/24"`, `"2001:db8::/32"`) into a [`Network`].
///
/// For IPv4 the part after `/` may also be a dotted netmask or hostmask.
///
/// # Examples
/// ```
/// use ipnet_calc::models::parse_network;
/// let network = parse_network("10.0.0.5/24").unwrap();
/// assert_eq!(network.to_string(), "10.0.0.0/24");
/// ```
pub fn parse_network(text: &str) -> Result<Network, ParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ParseError::Empty);
    }
    let (address, mask) = text
        .split_once('/')
        .ok_or_else(|| ParseError::MissingPrefix(text.to_string()))?;
    parse_network_with_mask(address, mask)
}

/// Parse an address and a separate prefix or mask, as in `10.1.2.0 255.255.255.0`.
pub fn parse_network_with_mask(address: &str, mask: &str) -> Result<Network, ParseError> {
    let (family, bits) = parse_address(address.trim())?;
    let prefix = parse_prefix(family, mask.trim())?;
    Network::new(family, bits, prefix)
}

fn parse_prefix(family: Family, mask: &str) -> Result<u8, ParseError> {
    if mask.is_empty() {
        return Err(ParseError::MissingPrefix(mask.to_string()));
    }
    let width = family.width();
    if mask.bytes().all(|b| b.is_ascii_digit()) {
        let out_of_range = || ParseError::PrefixOutOfRange {
            prefix: mask.to_string(),
            max: width,
        };
        let len: u32 = mask.parse().map_err(|_| out_of_range())?;
        if len > width as u32 {
            return Err(out_of_range());
        }
        return Ok(len as u8);
    }
    if family == Family::V4 && mask.contains('.') {
        return prefix_from_ipv4_mask(mask);
    }
    Err(ParseError::InvalidPrefix(mask.to_string()))
}

/// Prefix length of a dotted netmask (`255.255.255.0`) or, failing that, a
/// dotted hostmask (`0.0.0.255`).
fn prefix_from_ipv4_mask(mask: &str) -> Result<u8, ParseError> {
    let bits = parse_ipv4(mask).map_err(|_| ParseError::InvalidMask(mask.to_string()))?;
    for candidate in [bits, !bits] {
        let ones = candidate.leading_ones();
        if candidate.count_ones() == ones {
            return Ok(ones as u8);
        }
    }
    Err(ParseError::InvalidMask(mask.to_string()))
}

impl FromStr for Network {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_network(s)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}/{}",
            format_address(self.family, self.base),
            self.prefix
        )
    }
}

impl Serialize for Network {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Network {
    fn deserialize<D>(deserializer: D) -> Result<Network, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_network(&s).map_err(|e| de::Error::custom(format!("invalid CIDR {s}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_cidr_mask() {
        assert_eq!(get_cidr_mask(Family::V4, 0).unwrap(), 0x00000000);
        assert_eq!(get_cidr_mask(Family::V4, 8).unwrap(), 0xFF000000);
        assert_eq!(get_cidr_mask(Family::V4, 24).unwrap(), 0xFFFFFF00);
        assert_eq!(get_cidr_mask(Family::V4, 32).unwrap(), 0xFFFFFFFF);
        assert!(get_cidr_mask(Family::V4, 33).is_err());

        assert_eq!(get_cidr_mask(Family::V6, 0).unwrap(), 0);
        assert_eq!(
            get_cidr_mask(Family::V6, 64).unwrap(),
            0xFFFF_FFFF_FFFF_FFFF_0000_0000_0000_0000
        );
        assert_eq!(get_cidr_mask(Family::V6, 128).unwrap(), u128::MAX);
        assert!(get_cidr_mask(Family::V6, 129).is_err());
    }

    #[test]
    fn test_cut_addr() {
        let ip = 0xC0A8012A; // 192.168.1.42
        assert_eq!(cut_addr(Family::V4, ip, 24).unwrap(), 0xC0A80100);
        assert_eq!(cut_addr(Family::V4, ip, 16).unwrap(), 0xC0A80000);
        assert_eq!(cut_addr(Family::V4, ip, 32).unwrap(), ip);
        assert_eq!(cut_addr(Family::V4, ip, 0).unwrap(), 0);
        assert!(cut_addr(Family::V4, ip, 33).is_err());
    }

    #[test]
    fn test_address_count() {
        assert_eq!(AddressCount::pow2(0).to_string(), "1");
        assert_eq!(AddressCount::pow2(8).get(), Some(256));
        assert_eq!(AddressCount::pow2(64).to_string(), "18446744073709551616");
        assert_eq!(
            AddressCount::pow2(127).to_string(),
            "170141183460469231731687303715884105728"
        );
        assert_eq!(AddressCount::pow2(128).get(), None);
        assert_eq!(
            AddressCount::pow2(128).to_string(),
            "340282366920938463463374607431768211456"
        );
    }

    #[test]
    fn test_parse_network_masks_host_bits() {
        let network = parse_network("10.0.0.5/24").unwrap();
        assert_eq!(network.base_address(), 0x0A000000);
        assert_eq!(network.prefix_len(), 24);
        assert_eq!(network, parse_network("10.0.0.0/24").unwrap());

        let network = parse_network("2001:db8::1/32").unwrap();
        assert_eq!(network.to_string(), "2001:db8::/32");
    }

    #[test]
    fn test_parse_network_errors() {
        assert_eq!(parse_network(""), Err(ParseError::Empty));
        assert!(matches!(
            parse_network("10.0.0.0"),
            Err(ParseError::MissingPrefix(_))
        ));
        assert!(matches!(
            parse_network("10.0.0.0/"),
            Err(ParseError::MissingPrefix(_))
        ));
        assert!(matches!(
            parse_network("10.0.0.0/33"),
            Err(ParseError::PrefixOutOfRange { max: 32, .. })
        ));
        assert!(matches!(
            parse_network("::/129"),
            Err(ParseError::PrefixOutOfRange { max: 128, .. })
        ));
        assert!(matches!(
            parse_network("10.0.0.0/99999999999999"),
            Err(ParseError::PrefixOutOfRange { .. })
        ));
        assert!(matches!(
            parse_network("10.0.0.0/+24"),
            Err(ParseError::InvalidPrefix(_))
        ));
        assert!(matches!(
            parse_network("10.0.0.0/24/8"),
            Err(ParseError::InvalidPrefix(_))
        ));
        assert!(matches!(
            parse_network("::/ffff::"),
            Err(ParseError::InvalidPrefix(_))
        ));
        assert!(matches!(
            parse_network("10.0.0.256/24"),
            Err(ParseError::InvalidAddress(_))
        ));
        assert!(matches!(
            parse_network("hello/24"),
            Err(ParseError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_parse_network_dotted_masks() {
        assert_eq!(
            parse_network("10.1.2.0/255.255.255.0").unwrap(),
            parse_network("10.1.2.0/24").unwrap()
        );
        assert_eq!(
            parse_network("10.1.2.0/0.0.0.255").unwrap(),
            parse_network("10.1.2.0/24").unwrap()
        );
        assert_eq!(parse_network("10.1.2.0/0.0.0.0").unwrap().prefix_len(), 0);
        assert_eq!(
            parse_network("10.1.2.3/255.255.255.255").unwrap().prefix_len(),
            32
        );
        assert!(matches!(
            parse_network("10.1.2.0/255.0.255.0"),
            Err(ParseError::InvalidMask(_))
        ));
        assert!(matches!(
            parse_network("10.1.2.0/255.255.256.0"),
            Err(ParseError::InvalidMask(_))
        ));
    }

    #[test]
    fn test_parse_network_with_mask() {
        assert_eq!(
            parse_network_with_mask("10.1.2.0", "255.255.255.0").unwrap(),
            parse_network("10.1.2.0/24").unwrap()
        );
        assert_eq!(
            parse_network_with_mask(" 2001:1:2:3::0 ", "64").unwrap(),
            parse_network("2001:1:2:3::/64").unwrap()
        );
    }

    #[test]
    fn test_derived_masks() {
        let network = parse_network("192.168.1.0/24").unwrap();
        assert_eq!(network.netmask(), 0xFFFFFF00);
        assert_eq!(network.hostmask(), 0x000000FF);
        assert_eq!(network.broadcast_address(), 0xC0A801FF);
        assert_eq!(network.total_addresses().get(), Some(256));

        let network = parse_network("::/0").unwrap();
        assert_eq!(network.netmask(), 0);
        assert_eq!(network.hostmask(), u128::MAX);
        assert_eq!(network.broadcast_address(), u128::MAX);
        assert_eq!(network.total_addresses().get(), None);

        let network = parse_network("::1/128").unwrap();
        assert_eq!(network.hostmask(), 0);
        assert_eq!(network.broadcast_address(), 1);
    }

    #[test]
    fn test_contains() {
        let outer = parse_network("10.0.0.0/8").unwrap();
        let inner = parse_network("10.0.10.64/26").unwrap();
        assert!(outer.contains(&inner));
        assert!(outer.contains(&outer));
        assert!(!inner.contains(&outer));
        assert!(!outer.contains(&parse_network("11.0.0.0/24").unwrap()));
        assert!(!outer.contains(&parse_network("::/128").unwrap()));

        assert!(outer.contains_address(Family::V4, 0x0AFFFFFF));
        assert!(!outer.contains_address(Family::V4, 0x0B000000));
        assert!(!outer.contains_address(Family::V6, 0x0A000000));
    }

    #[test]
    fn test_network_cmp() {
        let ip1 = parse_network("10.0.10.0/24").unwrap();
        let ip2 = parse_network("10.0.0.0/8").unwrap();
        let ip3 = parse_network("10.0.10.64/26").unwrap();
        assert!(ip2 < ip1);
        assert!(ip1 < ip3);
        assert!(parse_network("255.255.255.255/32").unwrap() < parse_network("::/0").unwrap());
    }

    #[test]
    fn test_serde_cidr_string() {
        let network = parse_network("2001:db8::/48").unwrap();
        let json = serde_json::to_string(&network).unwrap();
        assert_eq!(json, r#""2001:db8::/48""#);
        let back: Network = serde_json::from_str(&json).unwrap();
        assert_eq!(back, network);
        assert!(serde_json::from_str::<Network>(r#""10.0.0.0/40""#).is_err());
    }
}
