//! Route planning between two placed devices.
//!
//! Same-subnet pairs talk directly. Everything else goes through the nearest
//! router on the source's subnet and the nearest router on the destination's
//! subnet. Every leg is an L-shaped grid walk: along x first, then along y.

use std::fmt;

use log::debug;
use serde::Serialize;

use crate::error::{NetError, Result};
use crate::ip::same_subnet;
use crate::topology::{Cell, Device, Grid};

/// How a packet reaches its destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Delivery {
    Direct,
    ViaRouter,
}

impl fmt::Display for Delivery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Delivery::Direct => write!(f, "direct"),
            Delivery::ViaRouter => write!(f, "via-router"),
        }
    }
}

/// Ordered cells from source to destination, both inclusive
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutePlan {
    pub delivery: Delivery,
    pub path: Vec<Cell>,
}

/// Enumerate the cells between `from` and `to`, x-axis first.
pub fn grid_walk(from: Cell, to: Cell) -> Vec<Cell> {
    let mut path = Vec::with_capacity(from.distance(&to) + 1);
    let (mut x, mut y) = (from.x, from.y);

    path.push(from);
    while x != to.x {
        x = if x < to.x { x + 1 } else { x - 1 };
        path.push(Cell::new(x, y));
    }

    while y != to.y {
        y = if y < to.y { y + 1 } else { y - 1 };
        path.push(Cell::new(x, y));
    }
    path
}

/// Append a walk to `path`, dropping the cell shared at the join
fn extend_walk(path: &mut Vec<Cell>, from: Cell, to: Cell) {
    let walk = grid_walk(from, to);
    let skip = usize::from(path.last() == walk.first());
    path.extend(walk.into_iter().skip(skip));
}

fn occupied(grid: &Grid, cell: Cell) -> Result<&Device> {
    grid.device_at(cell.x, cell.y)
        .ok_or(NetError::DeviceNotFound { x: cell.x, y: cell.y })
}

/// Decide direct vs via-router delivery and build the path.
pub fn plan_route(grid: &Grid, source: Cell, destination: Cell) -> Result<RoutePlan> {
    let src = occupied(grid, source)?;
    let dst = occupied(grid, destination)?;

    if same_subnet(src, dst) {
        debug!(
            "{} and {} share subnet {}, delivering directly",
            source,
            destination,
            src.network_prefix()
        );
        return Ok(RoutePlan {
            delivery: Delivery::Direct,
            path: grid_walk(source, destination),
        });
    }

    let (router_a, _) = grid
        .nearest_router(source, Some(src.network_prefix()))
        .ok_or(NetError::NoRouterAvailable { x: source.x, y: source.y })?;
    let (router_b, _) = grid
        .nearest_router(destination, Some(dst.network_prefix()))
        .ok_or(NetError::NoRouterAvailable { x: destination.x, y: destination.y })?;

    debug!(
        "Routing {} ({}) -> {} ({}) via routers at {} and {}",
        source,
        src.network_prefix(),
        destination,
        dst.network_prefix(),
        router_a,
        router_b
    );

    let mut path = grid_walk(source, router_a);
    if router_a != router_b {
        extend_walk(&mut path, router_a, router_b);
    }
    extend_walk(&mut path, router_b, destination);

    Ok(RoutePlan {
        delivery: Delivery::ViaRouter,
        path,
    })
}
