// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

//! Rank-permutation tests.
//!
//! The observed statistic is the sum of average ranks over the active window.
//! Each trial shuffles the full raw series, re-ranks it and compares the
//! permuted active sum against the observed one. The score is the fraction of
//! trials the observed sum beats.

use crate::split_windows;
use anz_core::stats::{abs_diffs, assign_average_ranks};
use anz_core::{NotApplicable, Score, ValidatedConfig};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::trace;

/// Which series is ranked and which tail counts as significant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RankVariant {
    /// Ranks absolute first differences; high sums are anomalous.
    Diff,
    /// Ranks raw values; high sums are anomalous.
    High,
    /// Ranks raw values; low sums are anomalous.
    Low,
}

impl RankVariant {
    fn ranks(self, series: &[f64]) -> Vec<f64> {
        match self {
            Self::Diff => assign_average_ranks(&abs_diffs(series)),
            Self::High | Self::Low => assign_average_ranks(series),
        }
    }

    fn reference_size(self, config: &ValidatedConfig) -> usize {
        match self {
            Self::Diff => config.reference_size().saturating_sub(1),
            Self::High | Self::Low => config.reference_size(),
        }
    }

    fn is_significant(self, permuted: f64, observed: f64) -> bool {
        match self {
            Self::Diff | Self::High => permuted < observed,
            Self::Low => permuted > observed,
        }
    }
}

fn active_rank_sum(
    series: &[f64],
    variant: RankVariant,
    config: &ValidatedConfig,
) -> Result<f64, NotApplicable> {
    let ranks = variant.ranks(series);
    let windows = split_windows(
        &ranks,
        variant.reference_size(config),
        config.active_size(),
        config.active_size(),
    )?;
    Ok(windows.active.iter().sum())
}

/// Runs a rank-permutation test with `config.perm_count()` shuffles drawn
/// from `rng`.
pub fn rank_test<R: Rng + ?Sized>(
    series: &[f64],
    config: &ValidatedConfig,
    variant: RankVariant,
    rng: &mut R,
) -> Score {
    let observed = match active_rank_sum(series, variant, config) {
        Ok(sum) => sum,
        Err(reason) => return reason.into(),
    };

    let perm_count = config.perm_count();
    if perm_count == 0 {
        return Score::Valid(0.0);
    }

    let mut shuffled = series.to_vec();
    let mut significant = 0usize;
    for _ in 0..perm_count {
        shuffled.shuffle(rng);
        match active_rank_sum(&shuffled, variant, config) {
            Ok(permuted) if variant.is_significant(permuted, observed) => significant += 1,
            Ok(_) => {}
            Err(reason) => return reason.into(),
        }
    }

    trace!(
        ?variant,
        observed,
        significant,
        perm_count,
        "rank permutation finished"
    );
    Score::clamped(significant as f64 / perm_count as f64)
}
