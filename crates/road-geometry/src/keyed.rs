//! Keyframed scalar curves used for lane widths along a road.
//!
//! Segments between keys are cubic Hermite splines. Each key carries an
//! incoming and outgoing slope that is derived from its [`TangentMode`]s
//! whenever the key set changes.

use serde::{Deserialize, Serialize};

/// How a key's slope on one side is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TangentMode {
    /// Smooth slope through neighbouring keys, flattened at extrema and at
    /// the ends of the curve.
    #[default]
    Auto,
    /// Straight line toward the neighbour on that side.
    Linear,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub time: f64,
    pub value: f64,
    pub in_tangent: f64,
    pub out_tangent: f64,
    pub in_mode: TangentMode,
    pub out_mode: TangentMode,
}

impl Keyframe {
    pub fn new(time: f64, value: f64) -> Self {
        Self {
            time,
            value,
            in_tangent: 0.0,
            out_tangent: 0.0,
            in_mode: TangentMode::Auto,
            out_mode: TangentMode::Auto,
        }
    }
}

/// A scalar function of distance defined by sorted keyframes.
///
/// Evaluation before the first key or after the last key returns that key's
/// value; an empty curve evaluates to zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyedCurve {
    keys: Vec<Keyframe>,
}

impl KeyedCurve {
    pub fn new() -> Self {
        Self::default()
    }

    /// Straight two-key ramp from `(t0, v0)` to `(t1, v1)` with auto slopes.
    pub fn ramp(t0: f64, v0: f64, t1: f64, v1: f64) -> Self {
        let mut curve = Self::new();
        curve.add_key(t0, v0);
        curve.add_key(t1, v1);
        curve
    }

    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn first_value(&self) -> Option<f64> {
        self.keys.first().map(|k| k.value)
    }

    pub fn last_value(&self) -> Option<f64> {
        self.keys.last().map(|k| k.value)
    }

    /// Insert a key, keeping keys sorted by time. Returns the key's index, or
    /// `None` if a key already exists at that time.
    pub fn add_key(&mut self, time: f64, value: f64) -> Option<usize> {
        let index = match self
            .keys
            .binary_search_by(|k| k.time.total_cmp(&time))
        {
            Ok(_) => return None,
            Err(i) => i,
        };
        self.keys.insert(index, Keyframe::new(time, value));
        self.recompute_tangents();
        Some(index)
    }

    pub fn set_in_mode(&mut self, index: usize, mode: TangentMode) {
        if let Some(key) = self.keys.get_mut(index) {
            key.in_mode = mode;
            self.recompute_tangents();
        }
    }

    pub fn set_out_mode(&mut self, index: usize, mode: TangentMode) {
        if let Some(key) = self.keys.get_mut(index) {
            key.out_mode = mode;
            self.recompute_tangents();
        }
    }

    fn recompute_tangents(&mut self) {
        let n = self.keys.len();
        for i in 0..n {
            let slope_in = (i > 0).then(|| slope(&self.keys[i - 1], &self.keys[i]));
            let slope_out = (i + 1 < n).then(|| slope(&self.keys[i], &self.keys[i + 1]));
            let auto = auto_slope(&self.keys, i);

            let key = &mut self.keys[i];
            key.in_tangent = match key.in_mode {
                TangentMode::Linear => slope_in.unwrap_or(0.0),
                TangentMode::Auto => auto,
            };
            key.out_tangent = match key.out_mode {
                TangentMode::Linear => slope_out.unwrap_or(0.0),
                TangentMode::Auto => auto,
            };
        }
    }

    pub fn evaluate(&self, time: f64) -> f64 {
        let (first, last) = match (self.keys.first(), self.keys.last()) {
            (Some(f), Some(l)) => (f, l),
            _ => return 0.0,
        };
        if time.is_nan() || time <= first.time {
            return first.value;
        }
        if time >= last.time {
            return last.value;
        }

        let upper = self.keys.partition_point(|k| k.time <= time);
        let k0 = &self.keys[upper - 1];
        let k1 = &self.keys[upper];
        let dt = k1.time - k0.time;
        if dt <= 0.0 {
            return k0.value;
        }

        let s = (time - k0.time) / dt;
        let s2 = s * s;
        let s3 = s2 * s;
        let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
        let h10 = s3 - 2.0 * s2 + s;
        let h01 = -2.0 * s3 + 3.0 * s2;
        let h11 = s3 - s2;
        h00 * k0.value + h10 * dt * k0.out_tangent + h01 * k1.value + h11 * dt * k1.in_tangent
    }
}

fn slope(a: &Keyframe, b: &Keyframe) -> f64 {
    let dt = b.time - a.time;
    if dt > 0.0 {
        (b.value - a.value) / dt
    } else {
        0.0
    }
}

fn auto_slope(keys: &[Keyframe], i: usize) -> f64 {
    if i == 0 || i + 1 >= keys.len() {
        return 0.0;
    }
    let prev = &keys[i - 1];
    let key = &keys[i];
    let next = &keys[i + 1];
    let is_extremum = (key.value >= prev.value && key.value >= next.value)
        || (key.value <= prev.value && key.value <= next.value);
    if is_extremum {
        return 0.0;
    }
    slope(prev, next)
}

/// Two-branch curve: `min` and `max` evaluated independently.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MinMaxCurve {
    pub min: KeyedCurve,
    pub max: KeyedCurve,
}

impl MinMaxCurve {
    pub fn new(min: KeyedCurve, max: KeyedCurve) -> Self {
        Self { min, max }
    }

    /// Both branches carry keys.
    pub fn is_two_branch(&self) -> bool {
        !self.min.is_empty() && !self.max.is_empty()
    }

    pub fn evaluate_min(&self, time: f64) -> f64 {
        self.min.evaluate(time)
    }

    pub fn evaluate_max(&self, time: f64) -> f64 {
        self.max.evaluate(time)
    }
}
