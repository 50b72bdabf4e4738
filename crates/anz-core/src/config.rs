// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::{AnzError, Method};

/// Seasons multiplier used when `seasons == 0`.
pub const DEFAULT_SEASONS: usize = 4;
/// Permutation count used by resampling tests when `perm_count == 0`.
pub const DEFAULT_PERM_COUNT: usize = 500;
pub const DEFAULT_SENSITIVITY: f64 = 0.1;
pub const DEFAULT_DOMINANT_WEIGHT: f64 = 1.0;
/// Smallest reference window the engine accepts.
pub const MIN_REFERENCE_SIZE: usize = 4;

const AUTO_SEASONS: usize = 0;
const AUTO_PERM_COUNT: usize = 0;
const UNBOUNDED_CAPACITY: usize = 0;

/// Significance procedure applied to the Kolmogorov-Smirnov statistic.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KsSignificance {
    /// Fraction of shuffled series whose statistic falls below the observed one.
    #[default]
    Bootstrap,
    /// Closed-form Kolmogorov distribution tail; no resampling.
    Asymptotic,
}

/// User-supplied anomalyzer configuration.
///
/// Zero-valued `seasons` and `perm_count` select their defaults during
/// validation; an empty `methods` list selects [`Method::DEFAULT_SET`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Debug, PartialEq)]
pub struct AnomalyzerConfig {
    pub upper_bound: Option<f64>,
    /// `None` ignores the lower fence and measures distance to the upper bound.
    pub lower_bound: Option<f64>,
    pub active_size: usize,
    /// Explicit reference size; derived as `seasons * active_size` when unset.
    pub reference_size: Option<usize>,
    pub seasons: usize,
    pub perm_count: usize,
    pub sensitivity: f64,
    /// Maximum buffer length for capped pushes; 0 is unbounded.
    pub capacity: usize,
    pub methods: Vec<String>,
    /// Score 0 until the buffer holds a full reference and active window.
    pub delay: bool,
    pub ks_significance: KsSignificance,
    /// Weight given to a magnitude or fence score above the dominance threshold.
    pub dominant_weight: f64,
    pub seed: Option<u64>,
}

impl Default for AnomalyzerConfig {
    fn default() -> Self {
        Self {
            upper_bound: None,
            lower_bound: None,
            active_size: 1,
            reference_size: None,
            seasons: AUTO_SEASONS,
            perm_count: AUTO_PERM_COUNT,
            sensitivity: DEFAULT_SENSITIVITY,
            capacity: UNBOUNDED_CAPACITY,
            methods: vec![],
            delay: false,
            ks_significance: KsSignificance::Bootstrap,
            dominant_weight: DEFAULT_DOMINANT_WEIGHT,
            seed: None,
        }
    }
}

impl AnomalyzerConfig {
    /// Convenience for building configs from method names.
    pub fn with_methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.methods = methods.into_iter().map(Into::into).collect();
        self
    }

    /// Checks the config and resolves defaults and derived sizes.
    pub fn validate(&self) -> Result<ValidatedConfig, AnzError> {
        let methods = resolve_methods(&self.methods)?;

        if self.active_size < 1 {
            return Err(AnzError::invalid_config(format!(
                "active_size must be >= 1; got {}",
                self.active_size
            )));
        }

        let seasons = if self.seasons == AUTO_SEASONS {
            DEFAULT_SEASONS
        } else {
            self.seasons
        };
        let reference_size = match self.reference_size {
            Some(size) => size,
            None => seasons.checked_mul(self.active_size).ok_or_else(|| {
                AnzError::invalid_config(format!(
                    "seasons={seasons} * active_size={} overflows",
                    self.active_size
                ))
            })?,
        };
        if reference_size < MIN_REFERENCE_SIZE {
            return Err(AnzError::invalid_config(format!(
                "reference window of {reference_size} points (active_size={}, seasons={seasons}) is below the minimum of {MIN_REFERENCE_SIZE}; increase one or both",
                self.active_size
            )));
        }

        let (upper_bound, lower_bound) = validate_bounds(
            self.upper_bound,
            self.lower_bound,
            methods.contains(&Method::Fence),
        )?;

        if methods.contains(&Method::Ks)
            && self.reference_size.is_some()
            && !reference_size.is_multiple_of(self.active_size)
        {
            return Err(AnzError::invalid_config(format!(
                "ks requires reference_size to be a multiple of active_size; got reference_size={reference_size}, active_size={}",
                self.active_size
            )));
        }

        let resampling = methods.iter().any(|method| method.is_resampling());
        let perm_count = if resampling && self.perm_count == AUTO_PERM_COUNT {
            DEFAULT_PERM_COUNT
        } else {
            self.perm_count
        };

        if !self.sensitivity.is_finite() || !(0.0..=1.0).contains(&self.sensitivity) {
            return Err(AnzError::invalid_config(format!(
                "sensitivity must be finite and within [0, 1]; got {}",
                self.sensitivity
            )));
        }

        let full_history_len = reference_size.saturating_add(self.active_size);
        if self.capacity != UNBOUNDED_CAPACITY && self.capacity < full_history_len {
            return Err(AnzError::invalid_config(format!(
                "capacity must be 0 (unbounded) or >= reference_size + active_size = {full_history_len}; got {}",
                self.capacity
            )));
        }

        if !self.dominant_weight.is_finite() || self.dominant_weight <= 0.0 {
            return Err(AnzError::invalid_config(format!(
                "dominant_weight must be finite and > 0; got {}",
                self.dominant_weight
            )));
        }

        Ok(ValidatedConfig {
            upper_bound,
            lower_bound,
            active_size: self.active_size,
            reference_size,
            perm_count,
            sensitivity: self.sensitivity,
            capacity: self.capacity,
            methods,
            delay: self.delay,
            ks_significance: self.ks_significance,
            dominant_weight: self.dominant_weight,
            seed: self.seed,
        })
    }
}

fn resolve_methods(names: &[String]) -> Result<Vec<Method>, AnzError> {
    if names.is_empty() {
        return Ok(Method::DEFAULT_SET.to_vec());
    }

    let mut methods = Vec::with_capacity(names.len());
    for name in names {
        let method: Method = name.parse()?;
        if !methods.contains(&method) {
            methods.push(method);
        }
    }
    Ok(methods)
}

fn validate_bounds(
    upper: Option<f64>,
    lower: Option<f64>,
    fence_enabled: bool,
) -> Result<(f64, Option<f64>), AnzError> {
    for (name, bound) in [("upper_bound", upper), ("lower_bound", lower)] {
        if let Some(value) = bound.filter(|value| !value.is_finite()) {
            return Err(AnzError::invalid_config(format!(
                "{name} must be finite; got {value}"
            )));
        }
    }

    if !fence_enabled {
        return Ok((upper.unwrap_or(0.0), lower));
    }

    let Some(upper) = upper else {
        return Err(AnzError::invalid_config(
            "fence test requires upper_bound to be set",
        ));
    };

    match lower {
        Some(lower) if upper == lower => Err(AnzError::invalid_config(format!(
            "fence test included with identical bounds on the fences ({upper})"
        ))),
        Some(lower) if upper < lower => Err(AnzError::invalid_config(format!(
            "upper_bound ({upper}) was lower than lower_bound ({lower})"
        ))),
        None if upper == 0.0 => Err(AnzError::invalid_config(
            "fence test with an unset lower_bound requires a non-zero upper_bound",
        )),
        _ => Ok((upper, lower)),
    }
}

/// Configuration after validation: defaults applied, sizes derived, methods
/// resolved. Immutable.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct ValidatedConfig {
    upper_bound: f64,
    lower_bound: Option<f64>,
    active_size: usize,
    reference_size: usize,
    perm_count: usize,
    sensitivity: f64,
    capacity: usize,
    methods: Vec<Method>,
    delay: bool,
    ks_significance: KsSignificance,
    dominant_weight: f64,
    seed: Option<u64>,
}

impl ValidatedConfig {
    pub fn upper_bound(&self) -> f64 {
        self.upper_bound
    }

    pub fn lower_bound(&self) -> Option<f64> {
        self.lower_bound
    }

    pub fn active_size(&self) -> usize {
        self.active_size
    }

    pub fn reference_size(&self) -> usize {
        self.reference_size
    }

    pub fn perm_count(&self) -> usize {
        self.perm_count
    }

    pub fn sensitivity(&self) -> f64 {
        self.sensitivity
    }

    /// Capped-push limit, `None` when unbounded.
    pub fn capacity(&self) -> Option<usize> {
        (self.capacity != UNBOUNDED_CAPACITY).then_some(self.capacity)
    }

    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    pub fn has_method(&self, method: Method) -> bool {
        self.methods.contains(&method)
    }

    pub fn delay(&self) -> bool {
        self.delay
    }

    pub fn ks_significance(&self) -> KsSignificance {
        self.ks_significance
    }

    pub fn dominant_weight(&self) -> f64 {
        self.dominant_weight
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Buffer length at which both windows are fully populated.
    pub fn full_history_len(&self) -> usize {
        self.reference_size.saturating_add(self.active_size)
    }
}
