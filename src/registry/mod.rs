//! # Topology Registry Module
//!
//! This module owns persistence of the network: the grid currently being
//! edited and the list of named snapshots saved from it. The rest of the
//! crate only sees the [`TopologyStore`] trait, so the same core runs over
//! JSON files on disk or over plain memory in tests.
//!
//! ## Registry Files
//!
//! [`JsonFileStore`] keeps two pretty-printed JSON files in its state
//! directory:
//!
//! ```text
//! .lansim/
//! |-- network.json          # current grid, 10x10 array of nullable devices
//! \-- saved_networks.json   # array of {name, grid} snapshots
//! ```
//!
//! ## Example Registry Structure
//!
//! ```json
//! [
//!   [
//!     { "kind": "host", "address": "192.168.1.10", "prefixLength": 24 },
//!     null
//!   ]
//! ]
//! ```
//!
//! Grids written by older versions may be jagged and may use the `tipo` and
//! `ip` field names without a prefix length; they load as /24 devices in a
//! padded 10x10 grid.
//!
//! ## Error Handling
//!
//! I/O and JSON failures surface as [`NetError::Storage`] carrying the file
//! path. A missing file reads as empty state.

use std::fs;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{NetError, Result};
use crate::topology::Grid;

/// File holding the grid currently being edited
pub const NETWORK_FILE: &str = "network.json";
/// File holding the named snapshots
pub const SAVED_NETWORKS_FILE: &str = "saved_networks.json";

/// A named snapshot of the grid, frozen when saved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedTopology {
    pub name: String,
    pub grid: Grid,
}

/// Storage for the current grid and the saved snapshot list
pub trait TopologyStore {
    /// Current grid, or `None` if nothing was stored yet
    fn load_grid(&self) -> Result<Option<Grid>>;

    fn store_grid(&mut self, grid: &Grid) -> Result<()>;

    fn load_saved(&self) -> Result<Vec<SavedTopology>>;

    fn store_saved(&mut self, saved: &[SavedTopology]) -> Result<()>;
}

/// In-process store, used by tests and embedders that persist elsewhere
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    grid: Option<Grid>,
    saved: Vec<SavedTopology>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TopologyStore for MemoryStore {
    fn load_grid(&self) -> Result<Option<Grid>> {
        Ok(self.grid.clone())
    }

    fn store_grid(&mut self, grid: &Grid) -> Result<()> {
        self.grid = Some(grid.clone());
        Ok(())
    }

    fn load_saved(&self) -> Result<Vec<SavedTopology>> {
        Ok(self.saved.clone())
    }

    fn store_saved(&mut self, saved: &[SavedTopology]) -> Result<()> {
        self.saved = saved.to_vec();
        Ok(())
    }
}

/// JSON files in a state directory
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        JsonFileStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read<T: DeserializeOwned>(&self, file: &str) -> Result<Option<T>> {
        let path = self.dir.join(file);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == IoErrorKind::NotFound => {
                debug!("{} not found, starting empty", path.display());
                return Ok(None);
            }
            Err(e) => return Err(storage_error(&path, e)),
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| storage_error(&path, e))
    }

    fn write<T: Serialize + ?Sized>(&self, file: &str, value: &T) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| storage_error(&self.dir, e))?;

        let path = self.dir.join(file);
        let json = serde_json::to_string_pretty(value).map_err(|e| storage_error(&path, e))?;

        // Write beside the target and rename so readers never see a torn file
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, json).map_err(|e| storage_error(&temp_path, e))?;
        fs::rename(&temp_path, &path).map_err(|e| storage_error(&path, e))?;

        info!("Wrote {}", path.display());
        Ok(())
    }
}

fn storage_error(path: &Path, err: impl std::fmt::Display) -> NetError {
    NetError::Storage(format!("{}: {}", path.display(), err))
}

impl TopologyStore for JsonFileStore {
    fn load_grid(&self) -> Result<Option<Grid>> {
        self.read(NETWORK_FILE)
    }

    fn store_grid(&mut self, grid: &Grid) -> Result<()> {
        self.write(NETWORK_FILE, grid)
    }

    fn load_saved(&self) -> Result<Vec<SavedTopology>> {
        Ok(self.read(SAVED_NETWORKS_FILE)?.unwrap_or_default())
    }

    fn store_saved(&mut self, saved: &[SavedTopology]) -> Result<()> {
        self.write(SAVED_NETWORKS_FILE, saved)
    }
}
