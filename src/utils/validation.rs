//! Input validation utilities.
//!
//! Checks run at the boundary of each operation, before anything is
//! mutated.

use crate::error::{NetError, Result};

/// Longest accepted topology name, in characters
pub const MAX_NAME_LEN: usize = 64;

/// Validate and normalize a saved topology name
///
/// # Returns
/// * The trimmed name
/// * `Err(NetError::InvalidInput)` if it is empty or too long
///
/// # Examples
/// ```
/// use lansim::utils::validation::validate_topology_name;
///
/// assert_eq!(validate_topology_name("  office  ").unwrap(), "office");
/// assert!(validate_topology_name("   ").is_err());
/// ```
pub fn validate_topology_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(NetError::InvalidInput("topology name cannot be empty".to_string()));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(NetError::InvalidInput(format!(
            "topology name cannot exceed {} characters",
            MAX_NAME_LEN
        )));
    }
    Ok(trimmed.to_string())
}

/// Check a requested packet count against `1..=max_packets`
pub fn validate_packet_count(count: usize, max_packets: usize) -> Result<()> {
    if count == 0 {
        return Err(NetError::InvalidInput("packet count must be positive".to_string()));
    }
    if count > max_packets {
        return Err(NetError::InvalidInput(format!(
            "packet count {} exceeds the limit of {}",
            count, max_packets
        )));
    }
    Ok(())
}
