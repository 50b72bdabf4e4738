// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::{Method, Score};
use std::borrow::Cow;

/// Schema version for serialized evaluation reports.
pub const EVALUATION_SCHEMA_VERSION: u32 = 1;
/// Name of the member that replaces high-rank and low-rank when both run.
pub const RANK_MEMBER: &str = "rank";

/// Why an evaluation returned 0 without running the full ensemble.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ShortCircuit {
    /// Delay mode and the buffer does not yet cover both windows.
    Delay { required: usize, available: usize },
    /// Magnitude score fell below the configured sensitivity.
    BelowSensitivity { magnitude: f64, sensitivity: f64 },
}

/// Score of one configured method.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MethodScore {
    pub method: Method,
    pub score: Score,
}

/// One term of the weighted mean.
///
/// High-rank and low-rank collapse into a single `rank` member when both run.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct EnsembleMember {
    pub name: Cow<'static, str>,
    pub score: f64,
    pub weight: f64,
}

/// Per-test breakdown of an ensemble evaluation.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation {
    pub schema_version: u32,
    pub engine_version: Option<String>,
    pub probability: f64,
    /// Buffer length at evaluation time.
    pub n: usize,
    pub reference_size: usize,
    pub active_size: usize,
    pub scores: Vec<MethodScore>,
    pub members: Vec<EnsembleMember>,
    pub short_circuit: Option<ShortCircuit>,
}

impl Evaluation {
    pub fn new(n: usize, reference_size: usize, active_size: usize) -> Self {
        Self {
            schema_version: EVALUATION_SCHEMA_VERSION,
            engine_version: Some(env!("CARGO_PKG_VERSION").to_string()),
            probability: 0.0,
            n,
            reference_size,
            active_size,
            scores: vec![],
            members: vec![],
            short_circuit: None,
        }
    }

    pub fn score(&self, method: Method) -> Option<Score> {
        self.scores
            .iter()
            .find(|entry| entry.method == method)
            .map(|entry| entry.score)
    }

    /// Weight of an ensemble member by name, e.g. `"magnitude"` or
    /// [`RANK_MEMBER`].
    pub fn weight(&self, member: &str) -> Option<f64> {
        self.members
            .iter()
            .find(|entry| entry.name == member)
            .map(|entry| entry.weight)
    }

    /// Weight a scored method contributed. High-rank and low-rank report the
    /// weight of [`RANK_MEMBER`] when they were collapsed into it. A method
    /// that was not scored, or scored not-applicable, has no weight.
    pub fn method_weight(&self, method: Method) -> Option<f64> {
        if !self.score(method)?.is_valid() {
            return None;
        }
        self.weight(method.as_str()).or_else(|| match method {
            Method::HighRank | Method::LowRank => self.weight(RANK_MEMBER),
            _ => None,
        })
    }

    /// Methods that produced no score.
    pub fn not_applicable(&self) -> impl Iterator<Item = Method> + '_ {
        self.scores
            .iter()
            .filter(|entry| !entry.score.is_valid())
            .map(|entry| entry.method)
    }
}
