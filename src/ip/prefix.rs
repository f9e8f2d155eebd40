use std::fmt;
use std::net::Ipv4Addr;

use serde::{Serialize, Serializer};

use crate::error::{NetError, Result};
use crate::topology::Device;

/// Prefix length assumed for devices recorded before masks were tracked
pub const DEFAULT_PREFIX_LEN: u8 = 24;

/// Network-identifying part of an address (address AND mask)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NetworkPrefix(Ipv4Addr);

impl NetworkPrefix {
    /// Mask `address` with its top `prefix_len` bits.
    ///
    /// `prefix_len` must already be validated; anything above 32 keeps the
    /// whole address.
    pub(crate) fn of(address: Ipv4Addr, prefix_len: u8) -> Self {
        let bits = u32::from(address) & mask(prefix_len);
        NetworkPrefix(Ipv4Addr::from(bits))
    }
}

impl fmt::Display for NetworkPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for NetworkPrefix {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

fn mask(prefix_len: u8) -> u32 {
    // A shift by 32 overflows, so /0 falls through to an empty mask
    u32::MAX
        .checked_shl(32u32.saturating_sub(u32::from(prefix_len)))
        .unwrap_or(0)
}

/// Parse a dotted-quad IPv4 address
pub fn parse_ipv4(address: &str) -> Result<Ipv4Addr> {
    address
        .trim()
        .parse::<Ipv4Addr>()
        .map_err(|_| NetError::InvalidAddress(address.to_string()))
}

/// Check that a prefix length lies in [0, 32]
pub fn validate_prefix_len(prefix_len: u32) -> Result<u8> {
    if prefix_len > 32 {
        return Err(NetError::InvalidPrefixLength(prefix_len));
    }
    Ok(prefix_len as u8)
}

/// Compute the network prefix for a dotted-quad address and prefix length
///
/// # Examples
/// ```
/// use lansim::ip::network_prefix;
///
/// let prefix = network_prefix("192.168.1.77", 24).unwrap();
/// assert_eq!(prefix.to_string(), "192.168.1.0");
/// ```
pub fn network_prefix(address: &str, prefix_len: u32) -> Result<NetworkPrefix> {
    let address = parse_ipv4(address)?;
    let prefix_len = validate_prefix_len(prefix_len)?;
    Ok(NetworkPrefix::of(address, prefix_len))
}

/// Two devices share a subnet when their own prefixes coincide.
///
/// Each side is masked with its own prefix length, so devices with different
/// masks can still compare equal (10.0.0.5/24 and 10.0.0.9/25 both give
/// 10.0.0.0).
pub fn same_subnet(a: &Device, b: &Device) -> bool {
    a.network_prefix() == b.network_prefix()
}
