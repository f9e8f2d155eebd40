//! Routing between placed devices.

pub mod planner;

pub use planner::{grid_walk, plan_route, Delivery, RoutePlan};
