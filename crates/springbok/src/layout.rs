use crate::config::{InitialPlacement, LayoutConfig};
use crate::distance::{DistanceReport, DistanceTable};
use crate::error::{Error, Result};
use crate::force::{ForceModel, ForceParams};
use crate::graph::{Bounds, Graph, Node, Point};
use crate::integrator::Rk4;
use crate::rng::XorShift64Star;
use nalgebra::DVector;

/// Simulated time elapsed so far plus the current coincident-pair separation angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationClock {
    pub time: f64,
    pub angle: f64,
}

/// One layout run over a snapshot of a graph.
///
/// Construction does all of the graph work up front (node indexing, adjacency, the distance
/// table); afterwards the engine only moves points around. Node indices follow the
/// lexicographic order of node ids.
#[derive(Debug)]
pub struct LayoutEngine {
    config: LayoutConfig,
    ids: Vec<String>,
    nodes: Vec<Node>,
    adjacency: Vec<Vec<usize>>,
    state: DVector<f64>,
    force: ForceModel,
    integrator: Rk4,
    steps_taken: usize,
}

impl LayoutEngine {
    pub fn new(graph: &Graph, config: LayoutConfig) -> Result<Self> {
        config.validate()?;
        graph.validate()?;

        let (Some(edge_cost), Some(spring_falloff), Some(repulsion_falloff)) = (
            config.edge_cost.clone(),
            config.spring_falloff,
            config.repulsion_falloff,
        ) else {
            return Err(Error::InvalidConfiguration(
                "edge cost and both falloff curves are required".to_string(),
            ));
        };

        let mut nodes: Vec<Node> = graph.nodes.values().cloned().collect();
        nodes.sort_by(|a, b| a.id.cmp(&b.id));
        let ids: Vec<String> = nodes.iter().map(|n| n.id.clone()).collect();
        tracing::debug!(?ids, "node ids");

        let state = initial_state(&nodes, &config);

        let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
        for e in &graph.edges {
            let from = index_of(&ids, &e.from)?;
            let to = index_of(&ids, &e.to)?;
            adjacency[from].push(to);
            adjacency[to].push(from);
        }
        tracing::debug!(?adjacency, "adjacency");

        let distances = DistanceTable::compute(&adjacency, config.distance_factor, |a, b| {
            edge_cost.cost(&nodes[a], &nodes[b], &adjacency[a], &adjacency[b])
        })?;
        let asymmetric_pairs = distances.asymmetries().len();
        if asymmetric_pairs > 0 {
            tracing::warn!(
                asymmetric_pairs,
                "distance table is not symmetric; the edge cost function depends on direction"
            );
        }
        tracing::debug!(
            nodes = distances.len(),
            connected = distances.is_fully_connected(),
            "distance table ready"
        );

        let force = ForceModel::new(
            distances,
            ForceParams {
                spring_constant: config.spring_constant,
                repulsion_force: config.repulsion_force,
                repulsion_start_time: config.repulsion_start_time(),
                spring_falloff,
                repulsion_falloff,
            },
        );
        let integrator = Rk4::new(config.step_size);

        Ok(Self {
            config,
            ids,
            nodes,
            adjacency,
            state,
            force,
            integrator,
            steps_taken: 0,
        })
    }

    /// Runs the remaining configured iterations. Steps already taken through `step` count.
    pub fn run(&mut self) {
        let _span = tracing::info_span!(
            "layout_run",
            nodes = self.ids.len(),
            iterations = self.config.iterations
        )
        .entered();

        while self.steps_taken < self.config.iterations {
            self.step();
        }
        tracing::debug!(
            time = self.integrator.time(),
            angle = self.force.angle(),
            "layout finished"
        );
    }

    /// One RK4 step. Useful for animating intermediate states.
    pub fn step(&mut self) {
        self.integrator.step(&mut self.state, &mut self.force);
        self.steps_taken += 1;
    }

    /// Copies the current positions into `graph` and returns their bounding box.
    ///
    /// Every engine node must exist in `graph`; nothing is written otherwise.
    pub fn write_back(&self, graph: &mut Graph) -> Result<Bounds> {
        let slots = self
            .ids
            .iter()
            .map(|id| {
                graph
                    .nodes
                    .get_index_of(id.as_str())
                    .ok_or_else(|| Error::NodeNotFound { id: id.clone() })
            })
            .collect::<Result<Vec<usize>>>()?;

        for (p, slot) in self.points().zip(slots) {
            let node = &mut graph.nodes[slot];
            node.x = p.x;
            node.y = p.y;
        }

        Ok(Bounds::from_points(self.points()).unwrap_or_default())
    }

    pub fn find_node_index(&self, id: &str) -> Result<usize> {
        index_of(&self.ids, id)
    }

    pub fn id_for_index(&self, index: usize) -> Option<&str> {
        self.ids.get(index).map(String::as_str)
    }

    pub fn node_count(&self) -> usize {
        self.ids.len()
    }

    /// Snapshot of the node as passed in (pre-layout coordinates).
    pub fn node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn neighbors(&self, index: usize) -> &[usize] {
        self.adjacency.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn distances(&self) -> &DistanceTable {
        self.force.distances()
    }

    pub fn are_all_nodes_connected(&self) -> bool {
        self.distances().is_fully_connected()
    }

    pub fn distance_report(&self) -> DistanceReport<'_> {
        self.distances().report(&self.ids)
    }

    pub fn distance_debug_report(&self) -> String {
        self.distance_report().to_string()
    }

    /// Flat `[x0, y0, x1, y1, ...]` positions in node-index order.
    pub fn positions(&self) -> &[f64] {
        self.state.as_slice()
    }

    pub fn position(&self, index: usize) -> Option<Point> {
        (index < self.ids.len()).then(|| Point {
            x: self.state[index * 2],
            y: self.state[index * 2 + 1],
        })
    }

    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.state
            .as_slice()
            .chunks_exact(2)
            .map(|xy| Point { x: xy[0], y: xy[1] })
    }

    pub fn clock(&self) -> SimulationClock {
        SimulationClock {
            time: self.integrator.time(),
            angle: self.force.angle(),
        }
    }

    pub fn steps_taken(&self) -> usize {
        self.steps_taken
    }
}

fn index_of(ids: &[String], id: &str) -> Result<usize> {
    ids.binary_search_by(|probe| probe.as_str().cmp(id))
        .map_err(|_| Error::NodeNotFound { id: id.to_string() })
}

fn initial_state(nodes: &[Node], config: &LayoutConfig) -> DVector<f64> {
    match config.initial_placement {
        InitialPlacement::Keep => {
            DVector::from_iterator(nodes.len() * 2, nodes.iter().flat_map(|n| [n.x, n.y]))
        }
        InitialPlacement::Scatter { extent } => {
            let mut rng = XorShift64Star::new(config.seed);
            let half = extent / 2.0;
            DVector::from_fn(nodes.len() * 2, |_, _| rng.next_f64_signed() * half)
        }
    }
}
