//! Address literal grammar.
//!
//! Parses dotted-quad IPv4 and colon-hex IPv6 literals into plain integers and
//! formats them back in compressed or expanded form. Addresses of both
//! families are carried as `u128` so the rest of the crate needs one set of
//! arithmetic.
//!
//! IPv4 grammar: four decimal octets `0..=255` separated by `.`, no leading
//! zeros (`010` is ambiguous octal and rejected).
//!
//! IPv6 grammar: up to eight groups of 1-4 hex digits separated by `:`, with
//! at most one `::` standing for one or more zero groups, and an optional
//! IPv4 literal taking the place of the last two groups.

use crate::error::ParseError;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

/// Address family of a network.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Copy, Clone, Hash, Serialize, Deserialize)]
pub enum Family {
    #[serde(rename = "IPv4")]
    V4,
    #[serde(rename = "IPv6")]
    V6,
}

impl Family {
    /// Address width in bits.
    pub const fn width(self) -> u8 {
        match self {
            Family::V4 => 32,
            Family::V6 => 128,
        }
    }

    /// All bits of the family set, as a `u128`.
    pub const fn all_ones(self) -> u128 {
        match self {
            Family::V4 => u32::MAX as u128,
            Family::V6 => u128::MAX,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Family::V4 => "IPv4",
            Family::V6 => "IPv6",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

const OCTET: &str = r"(25[0-5]|2[0-4][0-9]|1[0-9]{2}|[1-9]?[0-9])";

lazy_static! {
    static ref RE_IPV4: Regex =
        Regex::new(&format!(r"^{OCTET}\.{OCTET}\.{OCTET}\.{OCTET}$")).expect("Invalid Regex?");
    static ref RE_HEX_GROUP: Regex = Regex::new(r"^[0-9A-Fa-f]{1,4}$").expect("Invalid Regex?");
}

/// Parse an address literal of either family.
///
/// A literal containing `:` is IPv6, anything else is IPv4.
///
/// # Examples
/// ```
/// use ipnet_calc::models::{parse_address, Family};
/// assert_eq!(parse_address("10.0.0.1").unwrap(), (Family::V4, 0x0A000001));
/// assert_eq!(parse_address("::1").unwrap(), (Family::V6, 1));
/// ```
pub fn parse_address(text: &str) -> Result<(Family, u128), ParseError> {
    if text.contains(':') {
        parse_ipv6(text).map(|bits| (Family::V6, bits))
    } else {
        parse_ipv4(text).map(|bits| (Family::V4, bits as u128))
    }
}

/// Parse a dotted-quad IPv4 literal.
pub fn parse_ipv4(text: &str) -> Result<u32, ParseError> {
    if !RE_IPV4.is_match(text) {
        return Err(ParseError::InvalidAddress(text.to_string()));
    }
    let mut bits = 0u32;
    for octet in text.split('.') {
        let octet: u8 = octet
            .parse()
            .map_err(|_| ParseError::InvalidAddress(text.to_string()))?;
        bits = (bits << 8) | octet as u32;
    }
    Ok(bits)
}

/// Parse a colon-hex IPv6 literal, with optional `::` and IPv4 tail.
pub fn parse_ipv6(text: &str) -> Result<u128, ParseError> {
    let invalid = || ParseError::InvalidAddress(text.to_string());

    let (head, tail) = match text.split_once("::") {
        Some((head, tail)) => {
            if tail.contains("::") {
                return Err(invalid());
            }
            (head, Some(tail))
        }
        None => (text, None),
    };

    let head_groups = parse_groups(head, tail.is_none()).ok_or_else(invalid)?;
    let groups = match tail {
        None => {
            if head_groups.len() != 8 {
                return Err(invalid());
            }
            head_groups
        }
        Some(tail) => {
            if head_groups.len() > 7 {
                return Err(invalid());
            }
            let tail_groups = parse_groups(tail, true).ok_or_else(invalid)?;
            // "::" must stand for at least one zero group
            if head_groups.len() + tail_groups.len() > 7 {
                return Err(invalid());
            }
            let zeros = 8 - head_groups.len() - tail_groups.len();
            let mut groups = head_groups;
            groups.extend(std::iter::repeat(0).take(zeros));
            groups.extend(tail_groups);
            groups
        }
    };

    Ok(groups.iter().fold(0u128, |acc, g| (acc << 16) | *g as u128))
}

/// Split a `:`-separated run of groups. The IPv4 tail is only allowed when
/// `last` is set, i.e. the run ends the literal.
fn parse_groups(run: &str, last: bool) -> Option<Vec<u16>> {
    if run.is_empty() {
        return Some(Vec::new());
    }
    let parts: Vec<&str> = run.split(':').collect();
    let mut groups = Vec::with_capacity(8);
    for (i, part) in parts.iter().enumerate() {
        let is_final = i == parts.len() - 1;
        if is_final && last && part.contains('.') {
            let v4 = parse_ipv4(part).ok()?;
            groups.push((v4 >> 16) as u16);
            groups.push(v4 as u16);
        } else if RE_HEX_GROUP.is_match(part) {
            groups.push(u16::from_str_radix(part, 16).ok()?);
        } else {
            return None;
        }
    }
    if groups.len() > 8 {
        return None;
    }
    Some(groups)
}

/// Format an address in its usual compressed form.
///
/// IPv6 follows RFC 5952: lower-case, longest zero run replaced by `::`.
pub fn format_address(family: Family, bits: u128) -> String {
    match family {
        Family::V4 => Ipv4Addr::from(bits as u32).to_string(),
        Family::V6 => Ipv6Addr::from(bits).to_string(),
    }
}

/// Format an address with every group written out.
///
/// IPv6 gets eight zero-padded 4-digit groups and no `::`. IPv4 is already
/// fully written as a dotted-quad.
pub fn format_expanded(family: Family, bits: u128) -> String {
    match family {
        Family::V4 => Ipv4Addr::from(bits as u32).to_string(),
        Family::V6 => Ipv6Addr::from(bits)
            .segments()
            .iter()
            .map(|g| format!("{g:04x}"))
            .collect::<Vec<String>>()
            .join(":"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ipv4() {
        assert_eq!(parse_ipv4("0.0.0.0").unwrap(), 0);
        assert_eq!(parse_ipv4("192.168.1.42").unwrap(), 0xC0A8012A);
        assert_eq!(parse_ipv4("255.255.255.255").unwrap(), u32::MAX);
        assert!(parse_ipv4("256.0.0.1").is_err());
        assert!(parse_ipv4("10.0.0").is_err());
        assert!(parse_ipv4("10.0.0.1.2").is_err());
        assert!(parse_ipv4("010.0.0.1").is_err());
        assert!(parse_ipv4("10.0.0.-1").is_err());
        assert!(parse_ipv4(" 10.0.0.1").is_err());
        assert!(parse_ipv4("").is_err());
    }

    #[test]
    fn test_parse_ipv6() {
        assert_eq!(parse_ipv6("::").unwrap(), 0);
        assert_eq!(parse_ipv6("::1").unwrap(), 1);
        assert_eq!(parse_ipv6("1::").unwrap(), 1u128 << 112);
        assert_eq!(
            parse_ipv6("2001:db8::ff00:42:8329").unwrap(),
            0x2001_0db8_0000_0000_0000_ff00_0042_8329
        );
        assert_eq!(
            parse_ipv6("2001:0DB8:0000:0000:0000:FF00:0042:8329").unwrap(),
            0x2001_0db8_0000_0000_0000_ff00_0042_8329
        );
        assert_eq!(parse_ipv6("::ffff:192.0.2.1").unwrap(), 0xffff_c000_0201);
        assert_eq!(
            parse_ipv6("64:ff9b::10.0.0.1").unwrap(),
            (0x64_u128 << 112) | (0xff9b_u128 << 96) | 0x0a00_0001
        );
    }

    #[test]
    fn test_parse_ipv6_invalid() {
        assert!(parse_ipv6(":::").is_err());
        assert!(parse_ipv6("1::2::3").is_err());
        assert!(parse_ipv6("1:2:3:4:5:6:7").is_err());
        assert!(parse_ipv6("1:2:3:4:5:6:7:8:9").is_err());
        assert!(parse_ipv6("1:2:3:4:5:6:7::8").is_err());
        assert!(parse_ipv6("1:2:3:4::5:6:7:8").is_err());
        assert!(parse_ipv6("12345::").is_err());
        assert!(parse_ipv6("g::").is_err());
        assert!(parse_ipv6(":1:2:3:4:5:6:7").is_err());
        assert!(parse_ipv6("1:2:3:4:5:6:7:").is_err());
        assert!(parse_ipv6("::1.2.3.4:5").is_err());
        assert!(parse_ipv6("1.2.3.4::").is_err());
        assert!(parse_ipv6("fe80::1%eth0").is_err());
    }

    #[test]
    fn test_parse_address_family() {
        assert_eq!(parse_address("10.0.0.1").unwrap().0, Family::V4);
        assert_eq!(parse_address("::ffff:10.0.0.1").unwrap().0, Family::V6);
        assert!(parse_address("not-an-address").is_err());
    }

    #[test]
    fn test_format_address() {
        assert_eq!(format_address(Family::V4, 0xC0A80100), "192.168.1.0");
        assert_eq!(
            format_address(Family::V6, 0x2001_0001_0002_0003_u128 << 64),
            "2001:1:2:3::"
        );
        assert_eq!(format_address(Family::V6, 0), "::");
    }

    #[test]
    fn test_format_expanded() {
        assert_eq!(format_expanded(Family::V4, 0x0A000001), "10.0.0.1");
        assert_eq!(
            format_expanded(Family::V6, 0x2001_0001_0002_0003_u128 << 64),
            "2001:0001:0002:0003:0000:0000:0000:0000"
        );
    }
}
