// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::split_windows;
use anz_core::stats::{Ecdf, abs_diffs, mean};
use anz_core::{NotApplicable, Score, ValidatedConfig};

/// Smallest reference window of absolute differences that yields a usable ECDF.
pub const CDF_MIN_REFERENCE_DIFFS: usize = 3;
/// Observations needed to form a single difference.
pub const CDF_MIN_OBSERVATIONS: usize = 2;

/// Two-sided tail score of the active-minus-reference mean difference under
/// the empirical distribution of reference absolute differences.
pub fn cdf_test(series: &[f64], config: &ValidatedConfig) -> Score {
    if series.len() < CDF_MIN_OBSERVATIONS {
        return NotApplicable::InsufficientData {
            required: CDF_MIN_OBSERVATIONS,
            available: series.len(),
        }
        .into();
    }

    let diffs = abs_diffs(series);
    let windows = match split_windows(
        &diffs,
        config.reference_size().saturating_sub(1),
        config.active_size(),
        CDF_MIN_REFERENCE_DIFFS,
    ) {
        Ok(windows) => windows,
        Err(reason) => return reason.into(),
    };

    let percentile =
        Ecdf::new(windows.reference).eval(mean(windows.active) - mean(windows.reference));
    Score::clamped(2.0 * (0.5 - percentile).abs())
}
