// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::buffer::{AppendPolicy, DataBuffer};
use crate::ensemble::evaluate;
use anz_core::{AnomalyzerConfig, AnzError, Evaluation, ValidatedConfig};
use parking_lot::Mutex;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use tracing::debug;

/// Streaming anomaly scorer over an owned observation buffer.
///
/// Every push appends under its policy and returns the probability that the
/// active window is anomalous relative to the reference window.
#[derive(Clone, Debug)]
pub struct Anomalyzer {
    config: ValidatedConfig,
    buffer: DataBuffer,
    rng: StdRng,
}

impl Anomalyzer {
    /// Validates `config` and seeds the buffer with `data`.
    pub fn new(config: &AnomalyzerConfig, data: Vec<f64>) -> Result<Self, AnzError> {
        let config = config.validate()?;
        let buffer = DataBuffer::new(data, config.capacity())?;
        let rng = match config.seed() {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        debug!(
            methods = ?config.methods(),
            reference_size = config.reference_size(),
            active_size = config.active_size(),
            perm_count = config.perm_count(),
            initial_len = buffer.len(),
            "anomalyzer initialized"
        );
        Ok(Self {
            config,
            buffer,
            rng,
        })
    }

    pub fn config(&self) -> &ValidatedConfig {
        &self.config
    }

    /// Current observations, oldest first.
    pub fn data(&self) -> &[f64] {
        self.buffer.as_slice()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Total observations evicted by fixed and capped pushes.
    pub fn evicted(&self) -> u64 {
        self.buffer.evicted()
    }

    /// Appends `value` and returns the updated probability.
    pub fn push(&mut self, value: f64) -> Result<f64, AnzError> {
        self.push_with(value, AppendPolicy::Unbounded)
    }

    /// Appends `value`, evicting the oldest point so the buffer length is
    /// unchanged. The width is the current length, including anything added
    /// by [`Anomalyzer::update`]. Fails on an empty buffer.
    pub fn push_fixed(&mut self, value: f64) -> Result<f64, AnzError> {
        self.push_with(value, AppendPolicy::Fixed)
    }

    /// Appends `value`, evicting oldest-first down to the configured capacity.
    pub fn push_capped(&mut self, value: f64) -> Result<f64, AnzError> {
        self.push_with(value, AppendPolicy::Capped)
    }

    /// Appends `value` under `policy` and returns the updated probability.
    pub fn push_with(&mut self, value: f64, policy: AppendPolicy) -> Result<f64, AnzError> {
        self.buffer.append(value, policy)?;
        Ok(self.eval())
    }

    /// Appends a batch without evaluating. A batch containing a non-finite
    /// value is rejected as a whole.
    pub fn update(&mut self, batch: &[f64]) -> Result<(), AnzError> {
        self.buffer.extend(batch)
    }

    /// Probability that the current active window is anomalous.
    pub fn eval(&mut self) -> f64 {
        self.eval_by_test().probability
    }

    /// Per-method scores, member weights and the combined probability.
    pub fn eval_by_test(&mut self) -> Evaluation {
        evaluate(self.buffer.as_slice(), &self.config, &mut self.rng)
    }
}

/// Cloneable handle serializing pushes and evaluations through one lock.
#[derive(Clone, Debug)]
pub struct SharedAnomalyzer {
    inner: Arc<Mutex<Anomalyzer>>,
}

impl SharedAnomalyzer {
    pub fn new(anomalyzer: Anomalyzer) -> Self {
        Self {
            inner: Arc::new(Mutex::new(anomalyzer)),
        }
    }

    pub fn push(&self, value: f64) -> Result<f64, AnzError> {
        self.inner.lock().push(value)
    }

    pub fn push_fixed(&self, value: f64) -> Result<f64, AnzError> {
        self.inner.lock().push_fixed(value)
    }

    pub fn push_capped(&self, value: f64) -> Result<f64, AnzError> {
        self.inner.lock().push_capped(value)
    }

    pub fn update(&self, batch: &[f64]) -> Result<(), AnzError> {
        self.inner.lock().update(batch)
    }

    pub fn eval(&self) -> f64 {
        self.inner.lock().eval()
    }

    pub fn eval_by_test(&self) -> Evaluation {
        self.inner.lock().eval_by_test()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Copy of the current observations.
    pub fn snapshot(&self) -> Vec<f64> {
        self.inner.lock().data().to_vec()
    }

    /// Runs `f` with exclusive access to the wrapped anomalyzer.
    pub fn with<T>(&self, f: impl FnOnce(&mut Anomalyzer) -> T) -> T {
        f(&mut self.inner.lock())
    }
}

impl From<Anomalyzer> for SharedAnomalyzer {
    fn from(anomalyzer: Anomalyzer) -> Self {
        Self::new(anomalyzer)
    }
}
