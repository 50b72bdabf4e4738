// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

//! Numeric helpers shared by the scoring tests.

const KOLMOGOROV_EPS: f64 = 1.1e-16;

/// Arithmetic mean; NaN for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Absolute first differences; one element shorter than the input.
pub fn abs_diffs(values: &[f64]) -> Vec<f64> {
    values
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).abs())
        .collect()
}

/// Average (fractional) ranks, 1-based; ties share the mean of their ranks.
pub fn assign_average_ranks(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]).then_with(|| a.cmp(&b)));

    let mut ranks = vec![0.0; n];
    let mut group_start = 0usize;
    while group_start < n {
        let mut group_end = group_start + 1;
        while group_end < n
            && values[order[group_end]]
                .total_cmp(&values[order[group_start]])
                .is_eq()
        {
            group_end += 1;
        }

        let avg_rank = 0.5 * ((group_start + 1) as f64 + group_end as f64);
        for &idx in &order[group_start..group_end] {
            ranks[idx] = avg_rank;
        }
        group_start = group_end;
    }

    ranks
}

/// Empirical CDF over a sorted sample.
#[derive(Clone, Debug, PartialEq)]
pub struct Ecdf {
    sorted: Vec<f64>,
}

impl Ecdf {
    pub fn new(sample: &[f64]) -> Self {
        let mut sorted = sample.to_vec();
        sorted.sort_by(f64::total_cmp);
        Self { sorted }
    }

    /// Fraction of the sample `<= x`; 0 for an empty sample.
    pub fn eval(&self, x: f64) -> f64 {
        if self.sorted.is_empty() {
            return 0.0;
        }
        let at_or_below = self.sorted.partition_point(|value| *value <= x);
        at_or_below as f64 / self.sorted.len() as f64
    }

    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }
}

/// Exponential squashing of `x` in `[0, 1]`: `(base^x - 1) / (base - 1)`.
///
/// Larger bases push small inputs harder toward 0.
pub fn weight_exp(x: f64, base: f64) -> f64 {
    (base.powf(x) - 1.0) / (base - 1.0)
}

/// Weighted arithmetic mean; 0 when the weights sum to 0 or the result is NaN.
pub fn weighted_mean(values: &[f64], weights: &[f64]) -> f64 {
    debug_assert_eq!(values.len(), weights.len());
    let denominator: f64 = weights.iter().sum();
    if denominator == 0.0 {
        return 0.0;
    }
    let numerator: f64 = values
        .iter()
        .zip(weights)
        .map(|(value, weight)| value * weight)
        .sum();
    let mean = numerator / denominator;
    if mean.is_nan() { 0.0 } else { mean }
}

/// `points` evenly spaced values from `min` to `max` inclusive.
pub fn linspace(min: f64, max: f64, points: usize) -> Vec<f64> {
    match points {
        0 => vec![],
        1 => vec![min],
        _ => {
            let step = (max - min) / (points - 1) as f64;
            (0..points).map(|idx| min + step * idx as f64).collect()
        }
    }
}

/// Two-sample Kolmogorov-Smirnov distance evaluated on a common grid of
/// `reference.len() + active.len()` points spanning both samples.
pub fn ks_statistic(reference: &[f64], active: &[f64]) -> f64 {
    if reference.is_empty() || active.is_empty() {
        return 0.0;
    }

    let (min, max) = reference
        .iter()
        .chain(active)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), value| {
            (lo.min(*value), hi.max(*value))
        });

    let reference_cdf = Ecdf::new(reference);
    let active_cdf = Ecdf::new(active);
    linspace(min, max, reference.len() + active.len())
        .into_iter()
        .map(|point| (reference_cdf.eval(point) - active_cdf.eval(point)).abs())
        .fold(0.0, f64::max)
}

/// Survival function of the Kolmogorov distribution,
/// `Q(y) = 2 * sum_{r>=1} (-1)^(r-1) exp(-2 r^2 y^2)`.
pub fn kolmogorov(y: f64) -> f64 {
    if y < KOLMOGOROV_EPS {
        return 1.0;
    }

    let x = -2.0 * y * y;
    let mut sign = 1.0;
    let mut p = 0.0;
    let mut r = 1.0_f64;
    loop {
        let t = (x * r * r).exp();
        p += sign * t;
        if t == 0.0 || t / p <= KOLMOGOROV_EPS {
            break;
        }
        r += 1.0;
        sign = -sign;
    }
    (2.0 * p).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::{
        Ecdf, abs_diffs, assign_average_ranks, kolmogorov, ks_statistic, linspace, mean,
        weight_exp, weighted_mean,
    };

    fn assert_close(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn mean_of_empty_is_nan() {
        assert!(mean(&[]).is_nan());
        assert_close(mean(&[1.0, 2.0, 6.0]), 3.0, 1e-12);
    }

    #[test]
    fn abs_diffs_shrink_by_one() {
        assert_eq!(abs_diffs(&[1.0, 3.0, 2.0]), vec![2.0, 1.0]);
        assert!(abs_diffs(&[1.0]).is_empty());
        assert!(abs_diffs(&[]).is_empty());
    }

    #[test]
    fn tie_handling_uses_average_ranks() {
        let ranks = assign_average_ranks(&[1.0, 1.0, 2.0, 4.0, 4.0, 4.0]);
        let expected = [1.5, 1.5, 3.0, 5.0, 5.0, 5.0];
        for (actual, expected) in ranks.iter().zip(expected) {
            assert_close(*actual, expected, 1e-12);
        }
    }

    #[test]
    fn ranks_follow_input_order() {
        let ranks = assign_average_ranks(&[0.1, 2.05, 1.5, 8.0]);
        assert_eq!(ranks, vec![1.0, 3.0, 2.0, 4.0]);
    }

    #[test]
    fn ecdf_counts_values_at_or_below() {
        let ecdf = Ecdf::new(&[3.0, 1.0, 2.0, 2.0]);
        assert_eq!(ecdf.len(), 4);
        assert_close(ecdf.eval(0.5), 0.0, 1e-12);
        assert_close(ecdf.eval(2.0), 0.75, 1e-12);
        assert_close(ecdf.eval(10.0), 1.0, 1e-12);
        assert_eq!(Ecdf::new(&[]).eval(1.0), 0.0);
    }

    #[test]
    fn weight_exp_endpoints_and_curvature() {
        assert_close(weight_exp(0.0, 10.0), 0.0, 1e-12);
        assert_close(weight_exp(1.0, 10.0), 1.0, 1e-12);
        assert!(weight_exp(0.5, 10.0) < 0.5);
    }

    #[test]
    fn weighted_mean_with_zero_weights_is_zero() {
        assert_eq!(weighted_mean(&[0.9, 0.7], &[0.0, 0.0]), 0.0);
        assert_eq!(weighted_mean(&[], &[]), 0.0);
        assert_close(weighted_mean(&[1.0, 0.0], &[1.0, 0.5]), 2.0 / 3.0, 1e-12);
    }

    #[test]
    fn linspace_includes_endpoints() {
        assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(linspace(2.0, 2.0, 3), vec![2.0, 2.0, 2.0]);
        assert_eq!(linspace(1.0, 3.0, 1), vec![1.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn ks_statistic_is_zero_for_identical_constant_samples() {
        assert_eq!(ks_statistic(&[4.0; 8], &[4.0; 2]), 0.0);
    }

    #[test]
    fn ks_statistic_is_one_for_disjoint_samples() {
        let d = ks_statistic(&[0.0, 0.1, 0.2, 0.3], &[10.0, 11.0]);
        assert_close(d, 1.0, 1e-12);
    }

    #[test]
    fn kolmogorov_tail_is_monotone() {
        assert_eq!(kolmogorov(0.0), 1.0);
        assert!(kolmogorov(0.5) > kolmogorov(1.0));
        assert!(kolmogorov(3.0) < 1e-6);
        assert_close(kolmogorov(1.36), 0.049, 1e-3);
    }
}
