//! Network topology module.
//!
//! This module holds the device grid: what sits in each cell and which
//! router is closest to a given cell.

pub mod grid;
pub mod types;

// Re-export key types for easier access
pub use grid::{Grid, GRID_SIZE};
pub use types::{Cell, Device, DeviceKind};
