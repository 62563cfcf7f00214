use crate::distance::EdgeCost;
use crate::error::{Error, Result};
use crate::falloff::FalloffCurve;
use crate::graph::Node;
use std::fmt;
use std::sync::Arc;

/// Where nodes start before the first simulation step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InitialPlacement {
    /// Use the coordinates already stored on the graph's nodes.
    #[default]
    Keep,
    /// Scatter nodes uniformly over a square of side `extent` centred on the origin, driven by
    /// `LayoutConfig::seed`.
    Scatter { extent: f64 },
}

/// Layout parameters. Fixed for the lifetime of a `LayoutEngine`.
#[derive(Clone)]
pub struct LayoutConfig {
    pub iterations: usize,
    pub step_size: f64,
    pub spring_constant: f64,
    pub repulsion_force: f64,
    /// Fraction of the total simulated time after which repulsion switches on, in `[0, 1]`.
    pub repulsion_start: f64,
    /// Multiplier applied to the distance accumulated so far before each edge cost is added.
    pub distance_factor: f64,
    pub seed: u64,
    pub spring_falloff: Option<FalloffCurve>,
    pub repulsion_falloff: Option<FalloffCurve>,
    pub edge_cost: Option<Arc<dyn EdgeCost>>,
    pub initial_placement: InitialPlacement,
}

impl LayoutConfig {
    pub const DEFAULT_ITERATIONS: usize = 1000;
    pub const DEFAULT_STEP_SIZE: f64 = 0.01;
    pub const DEFAULT_SPRING_CONSTANT: f64 = 100.0;
    pub const DEFAULT_REPULSION_FORCE: f64 = 50.0;
    pub const DEFAULT_REPULSION_START: f64 = 0.5;
    pub const DEFAULT_DISTANCE_FACTOR: f64 = 1.0;
    pub const DEFAULT_SEED: u64 = 14_121_970;
    pub const DEFAULT_SPRING_FALLOFF: FalloffCurve =
        FalloffCurve::new(0.9, 1.0, 0.95, 0.0, 0.1, 200.0);
    pub const DEFAULT_REPULSION_FALLOFF: FalloffCurve =
        FalloffCurve::new(0.2, 1.0, 0.3, 0.0, 0.0, 100.0);

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_step_size(mut self, step_size: f64) -> Self {
        self.step_size = step_size;
        self
    }

    pub fn with_spring_constant(mut self, spring_constant: f64) -> Self {
        self.spring_constant = spring_constant;
        self
    }

    pub fn with_repulsion_force(mut self, repulsion_force: f64) -> Self {
        self.repulsion_force = repulsion_force;
        self
    }

    pub fn with_repulsion_start(mut self, repulsion_start: f64) -> Self {
        self.repulsion_start = repulsion_start;
        self
    }

    pub fn with_distance_factor(mut self, distance_factor: f64) -> Self {
        self.distance_factor = distance_factor;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_spring_falloff(mut self, curve: FalloffCurve) -> Self {
        self.spring_falloff = Some(curve);
        self
    }

    pub fn with_repulsion_falloff(mut self, curve: FalloffCurve) -> Self {
        self.repulsion_falloff = Some(curve);
        self
    }

    pub fn with_edge_cost(mut self, cost: impl EdgeCost + 'static) -> Self {
        self.edge_cost = Some(Arc::new(cost));
        self
    }

    /// Closure flavour of `with_edge_cost`; the explicit bound lets argument types be inferred.
    pub fn with_edge_cost_fn<F>(self, cost: F) -> Self
    where
        F: Fn(&Node, &Node, &[usize], &[usize]) -> u32 + Send + Sync + 'static,
    {
        self.with_edge_cost(cost)
    }

    pub fn with_initial_placement(mut self, placement: InitialPlacement) -> Self {
        self.initial_placement = placement;
        self
    }

    /// Simulated time after which repulsion is applied.
    pub fn repulsion_start_time(&self) -> f64 {
        self.iterations as f64 * self.step_size * self.repulsion_start
    }

    pub fn validate(&self) -> Result<()> {
        fn invalid(msg: impl Into<String>) -> Error {
            Error::InvalidConfiguration(msg.into())
        }

        if self.iterations == 0 {
            return Err(invalid("iterations must be positive"));
        }
        if !(self.step_size.is_finite() && self.step_size > 0.0) {
            return Err(invalid(format!(
                "step size must be positive and finite, got {}",
                self.step_size
            )));
        }
        if !(0.0..=1.0).contains(&self.repulsion_start) {
            return Err(invalid(format!(
                "repulsion start must be within [0, 1], got {}",
                self.repulsion_start
            )));
        }
        if !(self.distance_factor.is_finite() && self.distance_factor >= 0.0) {
            return Err(invalid(format!(
                "distance factor must be non-negative and finite, got {}",
                self.distance_factor
            )));
        }
        if !(self.spring_constant.is_finite() && self.repulsion_force.is_finite()) {
            return Err(invalid("spring constant and repulsion force must be finite"));
        }
        if let InitialPlacement::Scatter { extent } = self.initial_placement {
            if !(extent.is_finite() && extent >= 0.0) {
                return Err(invalid(format!(
                    "scatter extent must be non-negative and finite, got {extent}"
                )));
            }
        }

        self.spring_falloff
            .as_ref()
            .ok_or_else(|| invalid("no spring falloff defined"))?
            .validate()?;
        self.repulsion_falloff
            .as_ref()
            .ok_or_else(|| invalid("no repulsion falloff defined"))?
            .validate()?;
        if self.edge_cost.is_none() {
            return Err(invalid("no edge cost function defined"));
        }
        Ok(())
    }
}

impl Default for LayoutConfig {
    /// Usable once an edge cost is supplied.
    fn default() -> Self {
        Self {
            iterations: Self::DEFAULT_ITERATIONS,
            step_size: Self::DEFAULT_STEP_SIZE,
            spring_constant: Self::DEFAULT_SPRING_CONSTANT,
            repulsion_force: Self::DEFAULT_REPULSION_FORCE,
            repulsion_start: Self::DEFAULT_REPULSION_START,
            distance_factor: Self::DEFAULT_DISTANCE_FACTOR,
            seed: Self::DEFAULT_SEED,
            spring_falloff: Some(Self::DEFAULT_SPRING_FALLOFF),
            repulsion_falloff: Some(Self::DEFAULT_REPULSION_FALLOFF),
            edge_cost: None,
            initial_placement: InitialPlacement::Keep,
        }
    }
}

impl fmt::Debug for LayoutConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutConfig")
            .field("iterations", &self.iterations)
            .field("step_size", &self.step_size)
            .field("spring_constant", &self.spring_constant)
            .field("repulsion_force", &self.repulsion_force)
            .field("repulsion_start", &self.repulsion_start)
            .field("distance_factor", &self.distance_factor)
            .field("seed", &self.seed)
            .field("spring_falloff", &self.spring_falloff)
            .field("repulsion_falloff", &self.repulsion_falloff)
            .field("edge_cost", &self.edge_cost.as_ref().map(|_| "<fn>"))
            .field("initial_placement", &self.initial_placement)
            .finish()
    }
}
