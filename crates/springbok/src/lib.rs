#![forbid(unsafe_code)]

//! Headless force-directed graph layout.
//!
//! Graph distances (shortest paths under a caller-supplied edge cost) become spring rest lengths;
//! a delayed, falloff-shaped repulsion declutters the result. Positions are integrated with a
//! fixed-step RK4 solver, so a run is fully deterministic for a given graph and configuration.

pub mod config;
pub mod distance;
pub mod error;
pub mod falloff;
pub mod force;
pub mod graph;
pub mod integrator;
pub mod layout;
pub mod queue;
mod rng;

pub use config::{InitialPlacement, LayoutConfig};
pub use distance::{
    ConstantCost, DistanceReport, DistanceTable, EdgeCost, MAX_DISTANCE, UNREACHABLE, UnitCost,
};
pub use error::{Error, Result};
pub use falloff::FalloffCurve;
pub use force::{ForceModel, ForceParams};
pub use graph::{Bounds, Edge, Graph, Node, Point};
pub use integrator::{Derivative, Rk4};
pub use layout::{LayoutEngine, SimulationClock};
pub use queue::{PriorityQueue, QueueError};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Lays out `graph` in place and returns the bounding box of the final node centers.
pub fn layout(graph: &mut Graph, config: &LayoutConfig) -> Result<Bounds> {
    let mut engine = LayoutEngine::new(graph, config.clone())?;
    engine.run();
    engine.write_back(graph)
}
