//! Percentile Computation
//!
//! Linear interpolation between nearest ranks over the raw samples.

/// Compute a single percentile from samples
///
/// Returns `None` for an empty slice.
///
/// ```ignore
/// # use modbench_stats::compute_percentile;
/// let samples = vec![1.0, 2.0, 3.0, 4.0, 5.0];
/// assert_eq!(compute_percentile(&samples, 50.0), Some(3.0));
/// ```
pub fn compute_percentile(samples: &[f64], percentile: f64) -> Option<f64> {
    match samples {
        [] => None,
        [only] => Some(*only),
        _ => {
            let mut sorted = samples.to_vec();
            sorted.sort_by(|a, b| a.total_cmp(b));

            let n = sorted.len();
            let p = percentile.clamp(0.0, 100.0) / 100.0;

            let rank = p * (n - 1) as f64;
            let lower_idx = rank.floor() as usize;
            let upper_idx = (lower_idx + 1).min(n - 1);
            let fraction = rank - lower_idx as f64;

            Some(sorted[lower_idx] + fraction * (sorted[upper_idx] - sorted[lower_idx]))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median() {
        let samples = vec![5.0, 1.0, 4.0, 2.0, 3.0];
        let p50 = compute_percentile(&samples, 50.0).unwrap();
        assert!((p50 - 3.0).abs() < 0.01);
    }

    #[test]
    fn test_even_count_interpolates() {
        let samples = vec![1.0, 2.0, 3.0, 4.0];
        assert_eq!(compute_percentile(&samples, 50.0), Some(2.5));
    }

    #[test]
    fn test_quartiles() {
        let samples: Vec<f64> = (1..=100).map(|x| x as f64).collect();
        let p25 = compute_percentile(&samples, 25.0).unwrap();
        let p75 = compute_percentile(&samples, 75.0).unwrap();

        assert!((p25 - 25.75).abs() < 1.0);
        assert!((p75 - 75.25).abs() < 1.0);
    }

    #[test]
    fn test_single_sample() {
        assert_eq!(compute_percentile(&[42.0], 99.0), Some(42.0));
    }

    #[test]
    fn test_empty_samples() {
        assert_eq!(compute_percentile(&[], 50.0), None);
    }
}
