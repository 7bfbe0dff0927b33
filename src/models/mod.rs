//! Address and network models.
//!
//! This module contains the core data structures used throughout the application:
//! - [`Family`] - IPv4 or IPv6, with the address width
//! - [`Network`] - a validated CIDR block
//! - [`AddressCount`] - exact address counts up to `2^128`

mod address;
mod network;

// Re-export public types
pub use address::{
    format_address, format_expanded, parse_address, parse_ipv4, parse_ipv6, Family,
};
pub use network::{
    cut_addr, get_cidr_mask, parse_network, parse_network_with_mask,
    AddressCount, Network,
};
