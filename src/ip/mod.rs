//! IPv4 address math.
//!
//! This module turns an address plus prefix length into the network prefix
//! that decides whether two devices share a subnet. Everything here is pure.

pub mod prefix;

// Re-export commonly used types
pub use prefix::{
    network_prefix, parse_ipv4, same_subnet, validate_prefix_len, NetworkPrefix, DEFAULT_PREFIX_LEN,
};
