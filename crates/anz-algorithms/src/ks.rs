// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::split_windows;
use anz_core::stats::{kolmogorov, ks_statistic};
use anz_core::{KsSignificance, Score, ValidatedConfig};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::trace;

/// Kolmogorov-Smirnov comparison of the reference and active windows.
///
/// With [`KsSignificance::Bootstrap`] the score is the fraction of shuffled
/// series whose statistic falls strictly below the observed one. With
/// [`KsSignificance::Asymptotic`] it is one minus the Kolmogorov tail
/// probability of the size-corrected statistic.
pub fn ks_test<R: Rng + ?Sized>(series: &[f64], config: &ValidatedConfig, rng: &mut R) -> Score {
    let reference_size = config.reference_size();
    let active_size = config.active_size();
    let windows = match split_windows(series, reference_size, active_size, active_size) {
        Ok(windows) => windows,
        Err(reason) => return reason.into(),
    };
    let observed = ks_statistic(windows.reference, windows.active);

    match config.ks_significance() {
        KsSignificance::Asymptotic => {
            let n1 = windows.reference.len() as f64;
            let n2 = windows.active.len() as f64;
            let en = (n1 * n2 / (n1 + n2)).sqrt();
            Score::clamped(1.0 - kolmogorov((en + 0.12 + 0.11 / en) * observed))
        }
        KsSignificance::Bootstrap => {
            let perm_count = config.perm_count();
            if perm_count == 0 || observed == 0.0 {
                return Score::Valid(0.0);
            }

            let mut shuffled = series.to_vec();
            let mut below = 0usize;
            for _ in 0..perm_count {
                shuffled.shuffle(rng);
                let permuted = match split_windows(&shuffled, reference_size, active_size, 0) {
                    Ok(windows) => ks_statistic(windows.reference, windows.active),
                    Err(reason) => return reason.into(),
                };
                if permuted < observed {
                    below += 1;
                }
            }

            trace!(observed, below, perm_count, "ks bootstrap finished");
            Score::clamped(below as f64 / perm_count as f64)
        }
    }
}
