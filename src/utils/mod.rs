//! Shared utilities: boundary validation.

pub mod validation;

pub use validation::{validate_packet_count, validate_topology_name};
