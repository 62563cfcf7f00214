use crate::distance::DistanceTable;
use crate::falloff::FalloffCurve;
use crate::integrator::Derivative;
use nalgebra::DVector;

/// Separation substituted for exactly coincident nodes.
const COINCIDENT_DISTANCE: f64 = 0.00001;
/// Rotation applied to the substitute direction after each use.
const COINCIDENT_ANGLE_STEP: f64 = 0.5;

#[derive(Debug, Clone, Copy)]
pub struct ForceParams {
    pub spring_constant: f64,
    pub repulsion_force: f64,
    /// Repulsion only acts once the simulated time is strictly past this point.
    pub repulsion_start_time: f64,
    pub spring_falloff: FalloffCurve,
    pub repulsion_falloff: FalloffCurve,
}

/// Pairwise spring/repulsion model over all node pairs.
///
/// Springs pull every connected pair towards its table distance; repulsion pushes every pair
/// apart once it has been switched on. Both are shaped by their falloff curves.
#[derive(Debug, Clone)]
pub struct ForceModel {
    distances: DistanceTable,
    params: ForceParams,
    angle: f64,
}

impl ForceModel {
    pub fn new(distances: DistanceTable, params: ForceParams) -> Self {
        Self {
            distances,
            params,
            angle: 0.0,
        }
    }

    pub fn distances(&self) -> &DistanceTable {
        &self.distances
    }

    pub fn params(&self) -> &ForceParams {
        &self.params
    }

    /// Direction (radians) the next coincident pair will be separated along.
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Scalar force between `i` and `j`; positive pushes them apart.
    pub fn pair_force(&self, i: usize, j: usize, distance: f64, time: f64) -> f64 {
        let p = &self.params;
        let mut force = 0.0;

        if let Some(target) = self.distances.get(i, j) {
            let factor = p.spring_falloff.evaluate(distance);
            force += -(p.spring_constant * factor) * (distance - f64::from(target));
        }

        if time > p.repulsion_start_time {
            force += p.repulsion_force * p.repulsion_falloff.evaluate(distance);
        }

        force
    }
}

impl Derivative for ForceModel {
    fn derivative(&mut self, state: &DVector<f64>, time: f64, delta: f64) -> DVector<f64> {
        let mut out = DVector::zeros(state.len());
        if delta == 0.0 {
            return out;
        }

        let node_count = self.distances.len();
        debug_assert_eq!(state.len(), node_count * 2);

        for i in 0..node_count {
            let xi = state[i * 2];
            let yi = state[i * 2 + 1];

            for j in (i + 1)..node_count {
                let mut dx = state[j * 2] - xi;
                let mut dy = state[j * 2 + 1] - yi;

                let distance = if dx == 0.0 && dy == 0.0 {
                    dx = self.angle.cos() * COINCIDENT_DISTANCE;
                    dy = self.angle.sin() * COINCIDENT_DISTANCE;
                    self.angle += COINCIDENT_ANGLE_STEP;
                    COINCIDENT_DISTANCE
                } else {
                    (dx * dx + dy * dy).sqrt()
                };

                let force = self.pair_force(i, j, distance, time);
                if force == 0.0 {
                    continue;
                }

                let factor = force * delta / distance;
                let fx = dx * factor;
                let fy = dy * factor;

                out[j * 2] += fx;
                out[j * 2 + 1] += fy;
                out[i * 2] -= fx;
                out[i * 2 + 1] -= fy;
            }
        }

        out
    }
}
