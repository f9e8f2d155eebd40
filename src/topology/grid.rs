//! The fixed 10x10 device grid.
//!
//! Cells are addressed as `grid[x][y]`. Scans run row-major: lowest `x`
//! first, then lowest `y`.

use std::fmt;

use log::{debug, warn};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::types::{Cell, Device};
use crate::error::{NetError, Result};
use crate::ip::NetworkPrefix;

/// Width and height of the grid
pub const GRID_SIZE: usize = 10;

/// Square matrix of optional devices, at most one device per cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: [[Option<Device>; GRID_SIZE]; GRID_SIZE],
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    /// An all-empty grid
    pub fn new() -> Self {
        Grid {
            cells: std::array::from_fn(|_| std::array::from_fn(|_| None)),
        }
    }

    pub fn in_bounds(x: usize, y: usize) -> bool {
        x < GRID_SIZE && y < GRID_SIZE
    }

    /// Device at `(x, y)`; out-of-range coordinates simply hold no device
    pub fn device_at(&self, x: usize, y: usize) -> Option<&Device> {
        if !Self::in_bounds(x, y) {
            return None;
        }
        self.cells[x][y].as_ref()
    }

    /// Put `device` at `(x, y)`, replacing whatever was there
    pub fn place_device(&mut self, x: usize, y: usize, device: Device) -> Result<()> {
        if !Self::in_bounds(x, y) {
            return Err(NetError::OutOfRange { x, y });
        }
        self.cells[x][y] = Some(device);
        Ok(())
    }

    /// Occupied cells in row-major order
    pub fn devices(&self) -> impl Iterator<Item = (Cell, &Device)> + '_ {
        self.cells.iter().enumerate().flat_map(|(x, column)| {
            column
                .iter()
                .enumerate()
                .filter_map(move |(y, slot)| slot.as_ref().map(|device| (Cell::new(x, y), device)))
        })
    }

    pub fn device_count(&self) -> usize {
        self.devices().count()
    }

    pub fn is_empty(&self) -> bool {
        self.devices().next().is_none()
    }

    /// Find the router closest to `from` by Manhattan distance.
    ///
    /// With `required_prefix` set, only routers whose own network prefix
    /// equals it are eligible. Ties go to the first router in row-major
    /// order.
    pub fn nearest_router(
        &self,
        from: Cell,
        required_prefix: Option<NetworkPrefix>,
    ) -> Option<(Cell, &Device)> {
        let mut best: Option<(usize, Cell, &Device)> = None;

        for (cell, device) in self.devices() {
            if !device.is_router() {
                continue;
            }
            if let Some(prefix) = required_prefix {
                if device.network_prefix() != prefix {
                    continue;
                }
            }

            let distance = from.distance(&cell);
            if best.map_or(true, |(best_distance, _, _)| distance < best_distance) {
                best = Some((distance, cell, device));
            }
        }

        if let Some((distance, cell, device)) = best {
            debug!("Nearest router to {} is {} at {} ({} steps)", from, device, cell, distance);
        }
        best.map(|(_, cell, device)| (cell, device))
    }

    /// Build a grid from persisted rows, padding short or missing rows.
    ///
    /// Entries beyond the grid bounds are tolerated only when empty.
    pub fn from_rows(rows: Vec<Option<Vec<Option<Device>>>>) -> Result<Self> {
        let padded = rows.len() != GRID_SIZE
            || rows
                .iter()
                .any(|column| column.as_ref().map_or(true, |c| c.len() != GRID_SIZE));
        if padded {
            warn!("Padding jagged grid layout to {}x{}", GRID_SIZE, GRID_SIZE);
        }

        let mut grid = Grid::new();
        for (x, column) in rows.into_iter().enumerate() {
            for (y, slot) in column.into_iter().flatten().enumerate() {
                if let Some(device) = slot {
                    grid.place_device(x, y, device)?;
                }
            }
        }
        Ok(grid)
    }
}

impl Serialize for Grid {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.cells.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Grid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let rows = Vec::<Option<Vec<Option<Device>>>>::deserialize(deserializer)?;
        Grid::from_rows(rows).map_err(D::Error::custom)
    }
}

/// Text map: one line per `x`, one column per `y`
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "   ")?;
        for y in 0..GRID_SIZE {
            write!(f, " {}", y)?;
        }
        writeln!(f)?;

        for (x, column) in self.cells.iter().enumerate() {
            write!(f, "{:>2} ", x)?;
            for slot in column {
                let symbol = match slot {
                    None => '.',
                    Some(device) => match device.kind().as_str() {
                        "host" => 'H',
                        "router" => 'R',
                        _ => '?',
                    },
                };
                write!(f, " {}", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
