//! Evenly resampled lookup from normalized arc length to curve parameter.

use serde::{Deserialize, Serialize};

/// Lookup table mapping normalized distance `[0, 1]` to a curve parameter.
///
/// Values are stored at evenly spaced normalized distances and linearly
/// interpolated. Queries outside `[0, 1]` saturate to the first/last value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceTable {
    values: Vec<f64>,
}

impl DistanceTable {
    /// Resample `(distance, parameter)` pairs onto `buckets` evenly spaced
    /// distances.
    ///
    /// `samples` must be sorted by distance. A table built from a zero total
    /// distance maps everything to the first sample's parameter.
    pub fn from_samples(samples: &[(f64, f64)], buckets: usize) -> Self {
        let buckets = buckets.max(2);
        let Some(&(_, first_t)) = samples.first() else {
            return Self {
                values: vec![0.0; buckets],
            };
        };
        let total = samples[samples.len() - 1].0;
        if total <= 0.0 {
            return Self {
                values: vec![first_t; buckets],
            };
        }

        let mut values = Vec::with_capacity(buckets);
        let mut seg = 0;
        for i in 0..buckets {
            let target = total * i as f64 / (buckets - 1) as f64;
            while seg + 2 < samples.len() && samples[seg + 1].0 < target {
                seg += 1;
            }
            let (d0, t0) = samples[seg];
            let (d1, t1) = samples[(seg + 1).min(samples.len() - 1)];
            let span = d1 - d0;
            let value = if span > 0.0 {
                let s = ((target - d0) / span).clamp(0.0, 1.0);
                t0 + (t1 - t0) * s
            } else {
                t0
            };
            values.push(value);
        }
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Parameter at normalized distance `s`.
    pub fn evaluate(&self, s: f64) -> f64 {
        let count = self.values.len();
        if count < 2 {
            return 0.0;
        }
        if s.is_nan() || s <= 0.0 {
            return self.values[0];
        }
        if s >= 1.0 {
            return self.values[count - 1];
        }

        let it = s * (count - 1) as f64;
        let lower = it as usize;
        let upper = (lower + 1).min(count - 1);
        let frac = it - lower as f64;
        self.values[lower] + (self.values[upper] - self.values[lower]) * frac
    }
}
