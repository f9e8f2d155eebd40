//! Topology type definitions.
//!
//! Cells, device kinds and the device record placed into each cell.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{NetError, Result};
use crate::ip::{self, NetworkPrefix, DEFAULT_PREFIX_LEN};

/// A grid coordinate. A device's identity is the cell it occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
}

impl Cell {
    pub fn new(x: usize, y: usize) -> Self {
        Cell { x, y }
    }

    /// Manhattan distance, the number of grid-walk steps between two cells
    pub fn distance(&self, other: &Cell) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl FromStr for Cell {
    type Err = NetError;

    /// Parse `"x,y"`
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || NetError::InvalidInput(format!("expected a cell as 'x,y', got '{}'", s));
        let (x, y) = s.split_once(',').ok_or_else(invalid)?;
        let x = x.trim().parse::<usize>().map_err(|_| invalid())?;
        let y = y.trim().parse::<usize>().map_err(|_| invalid())?;
        Ok(Cell { x, y })
    }
}

/// Device kind. Only routers matter for routing; other kinds are kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DeviceKind {
    Host,
    Router,
    Other(String),
}

impl DeviceKind {
    pub fn parse(kind: &str) -> Result<Self> {
        let normalized = kind.trim().to_lowercase();
        match normalized.as_str() {
            "" => Err(NetError::InvalidInput("device kind cannot be empty".to_string())),
            "host" => Ok(DeviceKind::Host),
            "router" => Ok(DeviceKind::Router),
            _ => Ok(DeviceKind::Other(normalized)),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            DeviceKind::Host => "host",
            DeviceKind::Router => "router",
            DeviceKind::Other(kind) => kind,
        }
    }

    pub fn is_router(&self) -> bool {
        matches!(self, DeviceKind::Router)
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for DeviceKind {
    type Error = NetError;

    fn try_from(kind: String) -> Result<Self> {
        DeviceKind::parse(&kind)
    }
}

impl From<DeviceKind> for String {
    fn from(kind: DeviceKind) -> Self {
        kind.as_str().to_string()
    }
}

/// A host, router or other device placed in a cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DeviceRecord")]
pub struct Device {
    kind: DeviceKind,
    address: Ipv4Addr,
    #[serde(rename = "prefixLength")]
    prefix_len: u8,
}

impl Device {
    pub fn new(kind: DeviceKind, address: Ipv4Addr, prefix_len: u8) -> Result<Self> {
        let prefix_len = ip::validate_prefix_len(u32::from(prefix_len))?;
        Ok(Device { kind, address, prefix_len })
    }

    /// Build a device from unvalidated user input
    pub fn parse(kind: &str, address: &str, prefix_len: u32) -> Result<Self> {
        let kind = DeviceKind::parse(kind)?;
        let address = ip::parse_ipv4(address)?;
        let prefix_len = ip::validate_prefix_len(prefix_len)?;
        Device::new(kind, address, prefix_len)
    }

    pub fn kind(&self) -> &DeviceKind {
        &self.kind
    }

    pub fn address(&self) -> Ipv4Addr {
        self.address
    }

    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    pub fn is_router(&self) -> bool {
        self.kind.is_router()
    }

    pub fn network_prefix(&self) -> NetworkPrefix {
        NetworkPrefix::of(self.address, self.prefix_len)
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}/{}", self.kind, self.address, self.prefix_len)
    }
}

/// Persisted device shape, including the legacy `tipo`/`ip` field names
/// written before masks were tracked.
#[derive(Debug, Deserialize)]
struct DeviceRecord {
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    tipo: Option<String>,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    ip: Option<String>,
    #[serde(rename = "prefixLength", default)]
    prefix_len: Option<u32>,
}

impl TryFrom<DeviceRecord> for Device {
    type Error = NetError;

    fn try_from(record: DeviceRecord) -> Result<Self> {
        let mut legacy = Vec::new();

        let kind = match (record.kind, record.tipo) {
            (Some(kind), _) => kind,
            (None, Some(tipo)) => {
                legacy.push("'tipo' field");
                tipo
            }
            (None, None) => {
                return Err(NetError::InvalidInput("device record has no kind".to_string()))
            }
        };
        let address = match (record.address, record.ip) {
            (Some(address), _) => address,
            (None, Some(ip)) => {
                legacy.push("'ip' field");
                ip
            }
            (None, None) => {
                return Err(NetError::InvalidInput("device record has no address".to_string()))
            }
        };
        let prefix_len = record.prefix_len.unwrap_or_else(|| {
            legacy.push("missing prefixLength");
            u32::from(DEFAULT_PREFIX_LEN)
        });

        let device = Device::parse(&kind, &address, prefix_len)?;
        if !legacy.is_empty() {
            warn!("Normalized legacy device record {} ({})", device, legacy.join(", "));
        }
        Ok(device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_parsing() {
        assert_eq!("3,4".parse::<Cell>().unwrap(), Cell::new(3, 4));
        assert_eq!(" 0 , 9 ".parse::<Cell>().unwrap(), Cell::new(0, 9));
        assert!("3".parse::<Cell>().is_err());
        assert!("-1,2".parse::<Cell>().is_err());
        assert!("a,b".parse::<Cell>().is_err());
    }

    #[test]
    fn test_cell_distance_is_manhattan() {
        assert_eq!(Cell::new(0, 0).distance(&Cell::new(3, 4)), 7);
        assert_eq!(Cell::new(5, 2).distance(&Cell::new(2, 5)), 6);
        assert_eq!(Cell::new(1, 1).distance(&Cell::new(1, 1)), 0);
    }

    #[test]
    fn test_device_kind_normalization() {
        assert_eq!(DeviceKind::parse(" Router ").unwrap(), DeviceKind::Router);
        assert_eq!(DeviceKind::parse("HOST").unwrap(), DeviceKind::Host);
        assert_eq!(DeviceKind::parse("Switch").unwrap(), DeviceKind::Other("switch".to_string()));
        assert!(DeviceKind::parse("  ").is_err());
    }

    #[test]
    fn test_device_parse_validates_fields() {
        let device = Device::parse("router", "10.0.0.1", 8).unwrap();
        assert!(device.is_router());
        assert_eq!(device.network_prefix().to_string(), "10.0.0.0");

        assert!(matches!(Device::parse("host", "10.0.0", 8), Err(NetError::InvalidAddress(_))));
        assert_eq!(Device::parse("host", "10.0.0.1", 40), Err(NetError::InvalidPrefixLength(40)));
    }

    #[test]
    fn test_device_json_shape() {
        let device = Device::parse("host", "192.168.1.10", 24).unwrap();
        let json = serde_json::to_value(&device).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"kind": "host", "address": "192.168.1.10", "prefixLength": 24})
        );

        let back: Device = serde_json::from_value(json).unwrap();
        assert_eq!(back, device);
    }

    #[test]
    fn test_legacy_device_record_defaults_mask() {
        let device: Device = serde_json::from_str(r#"{"tipo": "router", "ip": "10.1.2.3"}"#).unwrap();
        assert!(device.is_router());
        assert_eq!(device.prefix_len(), DEFAULT_PREFIX_LEN);
        assert_eq!(device.network_prefix().to_string(), "10.1.2.0");
    }

    #[test]
    fn test_invalid_device_record_rejected() {
        let result: std::result::Result<Device, _> =
            serde_json::from_str(r#"{"kind": "host", "address": "300.1.1.1"}"#);
        assert!(result.is_err());
    }
}
