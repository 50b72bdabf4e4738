// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use anz_core::AnzError;
use tracing::trace;

/// How a single observation enters the buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppendPolicy {
    /// Append without eviction.
    Unbounded,
    /// Append, then evict the oldest point so the length is unchanged.
    ///
    /// The width is the length just before the push, so a batch `extend`
    /// widens later fixed appends.
    Fixed,
    /// Append, then evict oldest-first down to the buffer capacity.
    Capped,
}

impl AppendPolicy {
    /// Stable user-facing policy name for diagnostics and messages.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unbounded => "Unbounded",
            Self::Fixed => "Fixed",
            Self::Capped => "Capped",
        }
    }
}

pub(crate) fn ensure_finite(value: f64) -> Result<(), AnzError> {
    if value.is_finite() {
        return Ok(());
    }
    Err(AnzError::invalid_input(format!(
        "observations must be finite; got {value}"
    )))
}

/// Ordered observation buffer, most recent at the tail.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DataBuffer {
    values: Vec<f64>,
    capacity: Option<usize>,
    evicted: u64,
}

impl DataBuffer {
    /// Builds a buffer from initial data; `capacity` bounds capped appends only.
    pub fn new(initial: Vec<f64>, capacity: Option<usize>) -> Result<Self, AnzError> {
        for (idx, value) in initial.iter().enumerate() {
            if !value.is_finite() {
                return Err(AnzError::invalid_input(format!(
                    "initial data must be finite; got {value} at index {idx}"
                )));
            }
        }
        Ok(Self {
            values: initial,
            capacity,
            evicted: 0,
        })
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Total points evicted over the buffer's lifetime.
    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    /// Appends one observation under `policy`, returning how many points were
    /// evicted. A rejected observation leaves the buffer unchanged.
    pub fn append(&mut self, value: f64, policy: AppendPolicy) -> Result<usize, AnzError> {
        ensure_finite(value)?;

        let target_len = match policy {
            AppendPolicy::Unbounded => None,
            AppendPolicy::Fixed => {
                if self.values.is_empty() {
                    return Err(AnzError::invalid_input(
                        "fixed-size push requires a non-empty buffer; the width to preserve is undefined",
                    ));
                }
                Some(self.values.len())
            }
            AppendPolicy::Capped => self.capacity,
        };

        self.values.push(value);
        let evicted = match target_len {
            Some(target) => self.evict_to(target),
            None => 0,
        };
        if evicted > 0 {
            trace!(
                policy = policy.as_str(),
                evicted,
                len = self.values.len(),
                "evicted oldest observations"
            );
        }
        Ok(evicted)
    }

    /// Appends a batch without eviction. The batch is checked as a whole first.
    pub fn extend(&mut self, batch: &[f64]) -> Result<(), AnzError> {
        for (idx, value) in batch.iter().enumerate() {
            if !value.is_finite() {
                return Err(AnzError::invalid_input(format!(
                    "batch observations must be finite; got {value} at index {idx}"
                )));
            }
        }
        self.values.extend_from_slice(batch);
        Ok(())
    }

    fn evict_to(&mut self, target_len: usize) -> usize {
        let excess = self.values.len().saturating_sub(target_len);
        if excess > 0 {
            self.values.drain(..excess);
            self.evicted = self.evicted.saturating_add(excess as u64);
        }
        excess
    }
}
