// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod method;
#[cfg(feature = "serde")]
pub mod schema_migration;
pub mod score;
pub mod stats;
pub mod window;

pub use config::{
    AnomalyzerConfig, DEFAULT_DOMINANT_WEIGHT, DEFAULT_PERM_COUNT, DEFAULT_SEASONS,
    DEFAULT_SENSITIVITY, KsSignificance, MIN_REFERENCE_SIZE, ValidatedConfig,
};
pub use diagnostics::{
    EVALUATION_SCHEMA_VERSION, EnsembleMember, Evaluation, MethodScore, RANK_MEMBER,
    ShortCircuit,
};
pub use error::AnzError;
pub use method::Method;
#[cfg(feature = "serde")]
pub use schema_migration::{
    AnomalyzerConfigWire, CURRENT_SCHEMA_VERSION, EvaluationWire,
    MAX_FORWARD_COMPAT_SCHEMA_VERSION, validate_schema_version,
};
pub use score::{NotApplicable, Score, WindowKind};
pub use window::{WindowPair, extract_windows};

/// Core shared types for the anz engine.
pub fn crate_name() -> &'static str {
    "anz-core"
}
