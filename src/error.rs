//! Error types shared by every network operation.
//!
//! Each failure carries a stable [`ErrorKind`] so callers (the CLI, or any
//! other transport wrapped around the core) can classify it without parsing
//! messages.

use std::fmt;

/// Stable classification of a [`NetError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidInput,
    OutOfRange,
    DeviceNotFound,
    NoRouterAvailable,
    DuplicateName,
    NotFound,
    Storage,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::OutOfRange => "out_of_range",
            ErrorKind::DeviceNotFound => "device_not_found",
            ErrorKind::NoRouterAvailable => "no_router_available",
            ErrorKind::DuplicateName => "duplicate_name",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Storage => "storage",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while editing or simulating the network
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid IPv4 address: '{0}'")]
    InvalidAddress(String),

    #[error("Invalid prefix length {0}: must be between 0 and 32")]
    InvalidPrefixLength(u32),

    #[error("Cell ({x}, {y}) is outside the grid")]
    OutOfRange { x: usize, y: usize },

    #[error("No device at cell ({x}, {y})")]
    DeviceNotFound { x: usize, y: usize },

    #[error("No router available for the subnet of the device at ({x}, {y})")]
    NoRouterAvailable { x: usize, y: usize },

    #[error("A topology named '{0}' already exists")]
    DuplicateName(String),

    #[error("No saved topology named '{0}'")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl NetError {
    /// Map this error onto its stable kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            NetError::InvalidInput(_)
            | NetError::InvalidAddress(_)
            | NetError::InvalidPrefixLength(_) => ErrorKind::InvalidInput,
            NetError::OutOfRange { .. } => ErrorKind::OutOfRange,
            NetError::DeviceNotFound { .. } => ErrorKind::DeviceNotFound,
            NetError::NoRouterAvailable { .. } => ErrorKind::NoRouterAvailable,
            NetError::DuplicateName(_) => ErrorKind::DuplicateName,
            NetError::NotFound(_) => ErrorKind::NotFound,
            NetError::Storage(_) => ErrorKind::Storage,
        }
    }
}

pub type Result<T> = std::result::Result<T, NetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_errors_are_invalid_input() {
        assert_eq!(NetError::InvalidAddress("1.2.3".into()).kind(), ErrorKind::InvalidInput);
        assert_eq!(NetError::InvalidPrefixLength(33).kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_kind_strings_are_stable() {
        assert_eq!(ErrorKind::NoRouterAvailable.to_string(), "no_router_available");
        assert_eq!(NetError::OutOfRange { x: 10, y: 0 }.kind().as_str(), "out_of_range");
    }
}
