//! Network service orchestrator.
//!
//! This module coordinates every externally triggered operation: editing the
//! grid, sending packets, and managing saved topologies. Each operation
//! validates its input, applies the change to a copy of the state, persists
//! that copy through the [`TopologyStore`], and only then commits it, so a
//! failure never leaves a partial change behind.
//!
//! The service takes `&mut self` for every mutation. Hosts that share it
//! between threads must wrap it in a `Mutex` or another single-writer gate.

use log::info;
use serde::Serialize;

use crate::error::{NetError, Result};
use crate::registry::{SavedTopology, TopologyStore};
use crate::routing::{plan_route, Delivery};
use crate::topology::{Cell, Device, Grid};
use crate::utils::validation::{validate_packet_count, validate_topology_name};

/// Packet count limit used when the caller does not configure one
pub const DEFAULT_MAX_PACKETS: usize = 100;

/// One simulated packet and the cells it crosses
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PacketRecord {
    /// 1-based packet number
    pub packet: usize,
    pub path: Vec<Cell>,
}

/// Outcome of a send request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendReport {
    pub delivery: Delivery,
    pub path: Vec<Cell>,
    pub packets: Vec<PacketRecord>,
}

/// Owns the current grid and saved snapshots, backed by a store
#[derive(Debug)]
pub struct NetworkService<S: TopologyStore> {
    store: S,
    grid: Grid,
    saved: Vec<SavedTopology>,
    max_packets: usize,
}

impl<S: TopologyStore> NetworkService<S> {
    /// Load persisted state from `store`; missing state starts empty
    pub fn open(store: S, max_packets: usize) -> Result<Self> {
        let grid = store.load_grid()?.unwrap_or_default();
        let saved = store.load_saved()?;
        info!(
            "Loaded network with {} devices and {} saved topologies",
            grid.device_count(),
            saved.len()
        );

        Ok(NetworkService {
            store,
            grid,
            saved,
            max_packets,
        })
    }

    pub fn max_packets(&self) -> usize {
        self.max_packets
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The current grid
    pub fn topology(&self) -> &Grid {
        &self.grid
    }

    /// Place or replace the device at `(x, y)`
    pub fn place_device(
        &mut self,
        x: usize,
        y: usize,
        kind: &str,
        address: &str,
        prefix_len: u32,
    ) -> Result<()> {
        let device = Device::parse(kind, address, prefix_len)?;
        let mut grid = self.grid.clone();
        grid.place_device(x, y, device.clone())?;

        self.commit_grid(grid)?;
        info!("Placed {} at ({}, {})", device, x, y);
        Ok(())
    }

    /// Reset to an all-empty grid
    pub fn clear(&mut self) -> Result<()> {
        self.commit_grid(Grid::new())?;
        info!("Cleared the network");
        Ok(())
    }

    /// Route `count` identical packets from `source` to `destination`
    pub fn send_packets(&self, source: Cell, destination: Cell, count: usize) -> Result<SendReport> {
        validate_packet_count(count, self.max_packets)?;
        let plan = plan_route(&self.grid, source, destination)?;

        let packets = (1..=count)
            .map(|packet| PacketRecord {
                packet,
                path: plan.path.clone(),
            })
            .collect();

        info!(
            "Sent {} packet(s) {} -> {} ({}, {} hops)",
            count,
            source,
            destination,
            plan.delivery,
            plan.path.len().saturating_sub(1)
        );

        Ok(SendReport {
            delivery: plan.delivery,
            path: plan.path,
            packets,
        })
    }

    /// Snapshot the current grid under `name`
    pub fn save_topology(&mut self, name: &str) -> Result<()> {
        let name = validate_topology_name(name)?;
        if self.position(&name).is_some() {
            return Err(NetError::DuplicateName(name));
        }

        let mut saved = self.saved.clone();
        saved.push(SavedTopology {
            name: name.clone(),
            grid: self.grid.clone(),
        });

        self.commit_saved(saved)?;
        info!("Saved topology '{}'", name);
        Ok(())
    }

    /// Replace the current grid with the snapshot saved under `name`
    pub fn load_topology(&mut self, name: &str) -> Result<&Grid> {
        let name = validate_topology_name(name)?;
        let index = self.position(&name).ok_or_else(|| NetError::NotFound(name.clone()))?;

        let grid = self.saved[index].grid.clone();
        self.commit_grid(grid)?;
        info!("Loaded topology '{}'", name);
        Ok(&self.grid)
    }

    /// Saved topology names, in save order
    pub fn list_topologies(&self) -> Vec<&str> {
        self.saved.iter().map(|topology| topology.name.as_str()).collect()
    }

    pub fn delete_topology(&mut self, name: &str) -> Result<()> {
        let name = validate_topology_name(name)?;
        let index = self.position(&name).ok_or_else(|| NetError::NotFound(name.clone()))?;

        let mut saved = self.saved.clone();
        saved.remove(index);

        self.commit_saved(saved)?;
        info!("Deleted topology '{}'", name);
        Ok(())
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.saved.iter().position(|topology| topology.name == name)
    }

    fn commit_grid(&mut self, grid: Grid) -> Result<()> {
        self.store.store_grid(&grid)?;
        self.grid = grid;
        Ok(())
    }

    fn commit_saved(&mut self, saved: Vec<SavedTopology>) -> Result<()> {
        self.store.store_saved(&saved)?;
        self.saved = saved;
        Ok(())
    }
}
