/// Tolerances and step floors shared by the sampling code.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct Tolerance {
    /// Linear tolerance for distance comparisons (in road units)
    pub linear: f64,
    /// Step used in place of a non-positive sampling accuracy
    pub min_step: f64,
}

impl Tolerance {
    pub const DEFAULT_LINEAR: f64 = 1e-9;
    pub const DEFAULT_MIN_STEP: f64 = 0.1;

    pub fn new(linear: f64, min_step: f64) -> Self {
        Self { linear, min_step }
    }

    pub fn loose() -> Self {
        Self {
            linear: 1e-4,
            min_step: Self::DEFAULT_MIN_STEP,
        }
    }

    /// Check if two values are equal within linear tolerance
    pub fn linear_eq(self, a: f64, b: f64) -> bool {
        (a - b).abs() < self.linear
    }

    /// Check if a value is zero within linear tolerance
    pub fn is_zero(self, v: f64) -> bool {
        v.abs() < self.linear
    }

    /// Replace a non-positive (or NaN) step with `min_step`.
    pub fn positive_step(self, step: f64) -> f64 {
        if step > 0.0 {
            step
        } else {
            self.min_step
        }
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LINEAR, Self::DEFAULT_MIN_STEP)
    }
}
