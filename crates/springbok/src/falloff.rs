use crate::error::{Error, Result};
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Distance-dependent force multiplier.
///
/// The curve is a cubic Bezier through `(0, 0)`, `(x1, y1)`, `(x2, y2)` and `(0, min_value)`,
/// sampled at `t = distance / max`. Beyond `max` the multiplier is `min_value`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FalloffCurve {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub min_value: f64,
    pub max: f64,
}

impl FalloffCurve {
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64, min_value: f64, max: f64) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            min_value,
            max,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let values = [self.x1, self.y1, self.x2, self.y2, self.min_value, self.max];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidConfiguration(format!(
                "falloff curve has non-finite values: {self:?}"
            )));
        }
        if !(0.0..=1.0).contains(&self.min_value) {
            return Err(Error::InvalidConfiguration(format!(
                "falloff curve min value must be within [0, 1], got {}",
                self.min_value
            )));
        }
        if self.max <= 0.0 {
            return Err(Error::InvalidConfiguration(format!(
                "falloff curve max must be positive, got {}",
                self.max
            )));
        }
        Ok(())
    }

    /// Multiplier in `[0, 1]` for the given distance.
    pub fn evaluate(&self, distance: f64) -> f64 {
        if distance > self.max {
            return self.min_value;
        }
        let t = distance / self.max;

        let p0 = Vector2::new(0.0, 0.0);
        let p1 = Vector2::new(self.x1, self.y1);
        let p2 = Vector2::new(self.x2, self.y2);
        let p3 = Vector2::new(0.0, self.min_value);

        // De Casteljau.
        let a = p0.lerp(&p1, t);
        let b = p1.lerp(&p2, t);
        let c = p2.lerp(&p3, t);
        let ab = a.lerp(&b, t);
        let bc = b.lerp(&c, t);
        let y = ab.lerp(&bc, t).y;

        y.clamp(0.0, 1.0)
    }
}
