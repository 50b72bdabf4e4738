// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

pub mod cdf;
pub mod fence;
pub mod ks;
pub mod magnitude;
pub mod rank;

pub use cdf::cdf_test;
pub use fence::fence_test;
pub use ks::ks_test;
pub use magnitude::magnitude_test;
pub use rank::{RankVariant, rank_test};

use anz_core::{Method, NotApplicable, Score, ValidatedConfig, WindowPair, extract_windows};
use rand::Rng;

/// Window extraction with insufficiency reported as a not-applicable reason.
pub(crate) fn split_windows(
    series: &[f64],
    reference_size: usize,
    active_size: usize,
    min_reference_size: usize,
) -> Result<WindowPair<'_>, NotApplicable> {
    extract_windows(series, reference_size, active_size, min_reference_size).map_err(|err| {
        NotApplicable::try_from(&err).unwrap_or(NotApplicable::InsufficientData {
            required: min_reference_size.saturating_add(active_size),
            available: series.len(),
        })
    })
}

/// Scores `series` with a single method.
pub fn score_method<R: Rng + ?Sized>(
    method: Method,
    series: &[f64],
    config: &ValidatedConfig,
    rng: &mut R,
) -> Score {
    match method {
        Method::Magnitude => magnitude_test(series, config),
        Method::Fence => fence_test(series, config),
        Method::Cdf => cdf_test(series, config),
        Method::Diff => rank_test(series, config, RankVariant::Diff, rng),
        Method::HighRank => rank_test(series, config, RankVariant::High, rng),
        Method::LowRank => rank_test(series, config, RankVariant::Low, rng),
        Method::Ks => ks_test(series, config, rng),
    }
}

/// Statistical test namespace.
pub fn crate_name() -> &'static str {
    let _ = anz_core::crate_name();
    "anz-algorithms"
}
