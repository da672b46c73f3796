//! Distance stepping along a curve.

use road_core::Tolerance;

/// Distances `0, step, 2*step, ...` up to `total`, with the final sample
/// snapped exactly onto `total`.
///
/// A sample that lands within floating-point noise of `total` is treated as
/// the final one, so a step that evenly divides the length never produces a
/// duplicate end sample. Non-positive steps fall back to a tenth of a unit.
pub fn distance_steps(total: f64, step: f64) -> Vec<f64> {
    let step = Tolerance::default().positive_step(step);
    let total = total.max(0.0);
    let epsilon = 1e-9 * total.max(1.0);

    let mut steps = Vec::with_capacity((total / step) as usize + 2);
    let mut distance = 0.0;
    loop {
        if total - distance <= epsilon {
            steps.push(total);
            break;
        }
        steps.push(distance);
        distance += step;
    }
    steps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_even_division() {
        let steps = distance_steps(10.0, 1.0);
        assert_eq!(steps.len(), 11);
        assert_eq!(steps[0], 0.0);
        assert_eq!(steps[10], 10.0);
    }

    #[test]
    fn test_noise_above_total_does_not_add_sample() {
        assert_eq!(distance_steps(10.000_000_000_000_2, 1.0).len(), 11);
        assert_eq!(distance_steps(9.999_999_999_999_8, 1.0).len(), 11);
    }

    #[test]
    fn test_last_step_is_snapped() {
        let steps = distance_steps(2.5, 1.0);
        assert_eq!(steps, vec![0.0, 1.0, 2.0, 2.5]);
    }

    #[test]
    fn test_zero_total_gives_single_sample() {
        assert_eq!(distance_steps(0.0, 1.0), vec![0.0]);
    }

    #[test]
    fn test_non_positive_step_is_raised() {
        let steps = distance_steps(0.3, 0.0);
        assert_eq!(steps.len(), 4);
        assert!(steps.windows(2).all(|w| w[1] > w[0]));
    }
}
