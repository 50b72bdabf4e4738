// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::split_windows;
use anz_core::stats::mean;
use anz_core::{Score, ValidatedConfig};

/// Magnitude only needs one reference point to form a baseline mean.
pub const MAGNITUDE_MIN_REFERENCE: usize = 1;

/// Relative change of the active mean against the reference mean.
///
/// A zero reference mean scores 0 when the active mean is also 0 and 1
/// otherwise.
pub fn magnitude_test(series: &[f64], config: &ValidatedConfig) -> Score {
    let windows = match split_windows(
        series,
        config.reference_size(),
        config.active_size(),
        MAGNITUDE_MIN_REFERENCE,
    ) {
        Ok(windows) => windows,
        Err(reason) => return reason.into(),
    };

    let reference_mean = mean(windows.reference);
    let active_mean = mean(windows.active);
    if reference_mean == 0.0 {
        return Score::Valid(if active_mean == 0.0 { 0.0 } else { 1.0 });
    }

    Score::clamped((active_mean - reference_mean).abs() / reference_mean.abs())
}
