use nalgebra::DVector;

/// Time derivative of a flat `[x0, y0, x1, y1, ...]` state.
///
/// `delta` is the sub-step the evaluation belongs to; RK4 asks for the first sample with
/// `delta == 0`. Takes `&mut self` so implementations can carry evaluation-to-evaluation state.
pub trait Derivative {
    fn derivative(&mut self, state: &DVector<f64>, time: f64, delta: f64) -> DVector<f64>;
}

impl<F> Derivative for F
where
    F: FnMut(&DVector<f64>, f64, f64) -> DVector<f64>,
{
    fn derivative(&mut self, state: &DVector<f64>, time: f64, delta: f64) -> DVector<f64> {
        self(state, time, delta)
    }
}

/// Fixed-step 4th-order Runge-Kutta stepper. Owns the simulated clock.
#[derive(Debug, Clone)]
pub struct Rk4 {
    step_size: f64,
    time: f64,
}

impl Rk4 {
    pub fn new(step_size: f64) -> Self {
        Self {
            step_size,
            time: 0.0,
        }
    }

    pub fn step_size(&self) -> f64 {
        self.step_size
    }

    /// Elapsed simulated time (sum of all applied step sizes).
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Advances `state` by one step and the clock by `step_size`.
    ///
    /// All four samples are taken at the step's start time; only the state and sub-step size
    /// differ between them.
    pub fn step<D: Derivative + ?Sized>(&mut self, state: &mut DVector<f64>, f: &mut D) {
        let h = self.step_size;
        let half = h * 0.5;
        let t = self.time;

        let a = f.derivative(state, t, 0.0);
        let b = f.derivative(&(&*state + &a * half), t, half);
        let c = f.derivative(&(&*state + &b * half), t, half);
        let d = f.derivative(&(&*state + &c * h), t, h);

        let weighted = (d + a) + (b + c) * 2.0;
        *state += weighted * (h / 6.0);
        self.time += h;
    }
}
