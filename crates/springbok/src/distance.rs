//! All-pairs graph distances used as spring rest lengths.

use crate::graph::Node;
use crate::queue::{PriorityQueue, QueueError};
use std::fmt;

/// Table entry for pairs with no connecting path.
pub const UNREACHABLE: u32 = u32::MAX;

/// Largest distance a connected pair can have; sums saturate here instead of at `UNREACHABLE`.
pub const MAX_DISTANCE: u32 = UNREACHABLE - 1;

/// Cost of traversing the edge between two adjacent nodes.
///
/// `neighbors_a`/`neighbors_b` are the adjacency lists (node indices) of the two endpoints, which
/// lets a cost function stretch edges around hubs. Any matching closure implements this trait.
///
/// Costs and path sums are capped at `MAX_DISTANCE`, so an adjacent pair is never reported as
/// unreachable.
pub trait EdgeCost: Send + Sync {
    fn cost(&self, a: &Node, b: &Node, neighbors_a: &[usize], neighbors_b: &[usize]) -> u32;
}

impl<F> EdgeCost for F
where
    F: Fn(&Node, &Node, &[usize], &[usize]) -> u32 + Send + Sync,
{
    fn cost(&self, a: &Node, b: &Node, neighbors_a: &[usize], neighbors_b: &[usize]) -> u32 {
        self(a, b, neighbors_a, neighbors_b)
    }
}

/// Every edge costs 1, so distances are hop counts.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnitCost;

impl EdgeCost for UnitCost {
    fn cost(&self, _: &Node, _: &Node, _: &[usize], _: &[usize]) -> u32 {
        1
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ConstantCost(pub u32);

impl EdgeCost for ConstantCost {
    fn cost(&self, _: &Node, _: &Node, _: &[usize], _: &[usize]) -> u32 {
        self.0
    }
}

/// Square matrix of node-to-node distances, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceTable {
    node_count: usize,
    cells: Vec<u32>,
}

impl DistanceTable {
    /// Runs one priority-queue relaxation per start node, in increasing index order.
    ///
    /// The accumulated distance is scaled by `distance_factor` (and floored) before each edge cost
    /// is added, so long chains can be made to cost more than the sum of their edges.
    ///
    /// Rows for lower start indices are reused to seed later ones (`d(i, s) = d(s, i)` for
    /// `i < s`). That is only exact for symmetric cost functions; `asymmetries()` reports where
    /// the assumption broke.
    pub fn compute(
        adjacency: &[Vec<usize>],
        distance_factor: f64,
        mut edge_cost: impl FnMut(usize, usize) -> u32,
    ) -> Result<Self, QueueError> {
        let node_count = adjacency.len();
        let mut cells = vec![UNREACHABLE; node_count * node_count];
        let mut dist = vec![UNREACHABLE; node_count];
        let mut settled = vec![false; node_count];

        for start in 0..node_count {
            let mut queue = PriorityQueue::with_capacity(node_count);
            for i in 0..node_count {
                dist[i] = if i == start {
                    0
                } else if i < start {
                    cells[i * node_count + start]
                } else {
                    UNREACHABLE
                };
                queue.add(i64::from(dist[i]), i)?;
            }
            settled.fill(false);

            while !queue.is_empty() {
                let index = queue.pop_minimal_value()?;
                if dist[index] == UNREACHABLE {
                    // Everything still queued is unreachable from `start`.
                    break;
                }
                settled[index] = true;

                // Float-to-int `as` saturates, so huge factors clamp instead of wrapping.
                let base = (f64::from(dist[index]) * distance_factor).floor() as u32;
                for &to in &adjacency[index] {
                    if settled[to] {
                        continue;
                    }
                    let new_distance = base
                        .saturating_add(edge_cost(index, to))
                        .min(MAX_DISTANCE);
                    let old_distance = dist[to];
                    if new_distance < old_distance {
                        dist[to] = new_distance;
                        queue.lower_priority(
                            to,
                            i64::from(old_distance),
                            i64::from(new_distance),
                        )?;
                    }
                }
            }

            cells[start * node_count..(start + 1) * node_count].copy_from_slice(&dist);
        }

        Ok(Self { node_count, cells })
    }

    pub fn len(&self) -> usize {
        self.node_count
    }

    pub fn is_empty(&self) -> bool {
        self.node_count == 0
    }

    /// Raw entry, `UNREACHABLE` included.
    pub fn raw(&self, from: usize, to: usize) -> u32 {
        self.cells[from * self.node_count + to]
    }

    pub fn get(&self, from: usize, to: usize) -> Option<u32> {
        let d = self.raw(from, to);
        (d != UNREACHABLE).then_some(d)
    }

    pub fn row(&self, from: usize) -> &[u32] {
        &self.cells[from * self.node_count..(from + 1) * self.node_count]
    }

    pub fn is_fully_connected(&self) -> bool {
        !self.cells.contains(&UNREACHABLE)
    }

    /// Index pairs `(i, j)`, `i < j`, whose distance differs between the two directions.
    pub fn asymmetries(&self) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for i in 0..self.node_count {
            for j in (i + 1)..self.node_count {
                if self.raw(i, j) != self.raw(j, i) {
                    out.push((i, j));
                }
            }
        }
        out
    }

    /// Human-readable dump keyed by node id. `ids[i]` must name node index `i`.
    pub fn report<'a>(&'a self, ids: &'a [String]) -> DistanceReport<'a> {
        DistanceReport {
            ids,
            table: self,
            asymmetries: self.asymmetries(),
        }
    }
}

/// Diagnostic view over a `DistanceTable`; `Display` renders every row followed by the pairs
/// whose distance is not the same in both directions.
#[derive(Debug, Clone)]
pub struct DistanceReport<'a> {
    ids: &'a [String],
    table: &'a DistanceTable,
    asymmetries: Vec<(usize, usize)>,
}

impl DistanceReport<'_> {
    pub fn asymmetries(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.asymmetries
            .iter()
            .map(|&(i, j)| (self.ids[i].as_str(), self.ids[j].as_str()))
    }

    pub fn is_symmetric(&self) -> bool {
        self.asymmetries.is_empty()
    }
}

impl fmt::Display for DistanceReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, from) in self.ids.iter().enumerate() {
            writeln!(f, "Distances from {from} to:")?;
            for (j, to) in self.ids.iter().enumerate() {
                match self.table.get(i, j) {
                    Some(d) => writeln!(f, "{to}: {d}")?,
                    None => writeln!(f, "{to}: unreachable")?,
                }
            }
            writeln!(f)?;
        }
        for (a, b) in self.asymmetries() {
            writeln!(f, "Distance from {a} to {b} is not the same as back.")?;
        }
        Ok(())
    }
}
