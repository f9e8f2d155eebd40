//! # LanSim - Grid-based IPv4 LAN simulator
//!
//! This library models a small local-area network laid out on a fixed 10x10
//! grid. Hosts and routers are placed into cells with an IPv4 address and
//! prefix length; the simulator then decides whether two devices can talk
//! directly or must go through routers, and produces the cell-by-cell path a
//! packet takes so it can be animated.
//!
//! ## Architecture
//!
//! - `ip`: network prefix math and the same-subnet check
//! - `topology`: the device grid and nearest-router search
//! - `routing`: direct vs via-router decisions and L-shaped grid walks
//! - `orchestrator`: [`NetworkService`], one method per external operation
//! - `registry`: persistence of the current grid and saved snapshots
//! - `config` / `config_loader`: YAML configuration
//! - `utils`: boundary validation
//!
//! ## Example Usage
//!
//! ```rust
//! use lansim::{Cell, Delivery, MemoryStore, NetworkService};
//!
//! let mut network = NetworkService::open(MemoryStore::new(), 100)?;
//! network.place_device(0, 0, "host", "192.168.1.10", 24)?;
//! network.place_device(0, 1, "host", "192.168.1.20", 24)?;
//!
//! let report = network.send_packets(Cell::new(0, 0), Cell::new(0, 1), 3)?;
//! assert_eq!(report.delivery, Delivery::Direct);
//! assert_eq!(report.packets.len(), 3);
//! # Ok::<(), lansim::NetError>(())
//! ```
//!
//! ## Error Handling
//!
//! Library operations return [`NetError`], whose [`NetError::kind`] gives a
//! stable classification. The `lansim` binary wraps these in `color_eyre`
//! reports.

pub mod config;
pub mod config_loader;
pub mod error;
pub mod ip;
pub mod orchestrator;
pub mod registry;
pub mod routing;
pub mod topology;
pub mod utils;

pub use error::{ErrorKind, NetError};
pub use orchestrator::{NetworkService, PacketRecord, SendReport};
pub use registry::{JsonFileStore, MemoryStore, SavedTopology, TopologyStore};
pub use routing::{Delivery, RoutePlan};
pub use topology::{Cell, Device, DeviceKind, Grid, GRID_SIZE};
