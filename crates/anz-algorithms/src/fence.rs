// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::split_windows;
use anz_core::stats::{mean, weight_exp};
use anz_core::{Score, ValidatedConfig};

/// Base of the exponential squashing applied to fence distances.
pub const FENCE_WEIGHT_BASE: f64 = 10.0;

/// Closeness of the active mean to the configured fences.
///
/// With both bounds set, distance is measured from the midpoint in units of
/// the half-width; with only an upper bound, it is `mean / upper`. The
/// distance is clamped to `[0, 1]` and squashed with base 10, so only values
/// near a fence score high.
pub fn fence_test(series: &[f64], config: &ValidatedConfig) -> Score {
    let windows = match split_windows(series, config.reference_size(), config.active_size(), 0)
    {
        Ok(windows) => windows,
        Err(reason) => return reason.into(),
    };

    let active_mean = mean(windows.active);
    let upper = config.upper_bound();
    let distance = match config.lower_bound() {
        None => active_mean / upper,
        Some(lower) => {
            let half_width = (upper - lower) / 2.0;
            let midpoint = lower + half_width;
            (active_mean - midpoint).abs() / half_width
        }
    };

    if distance.is_nan() {
        return Score::Valid(0.0);
    }
    Score::clamped(weight_exp(distance.clamp(0.0, 1.0), FENCE_WEIGHT_BASE))
}
