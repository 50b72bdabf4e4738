// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

pub mod anomalyzer;
pub mod buffer;
pub mod ensemble;

pub use anomalyzer::{Anomalyzer, SharedAnomalyzer};
pub use buffer::{AppendPolicy, DataBuffer};
pub use ensemble::{
    BASE_WEIGHT, DOMINANCE_THRESHOLD, RANK_MEMBER, ensemble_members, evaluate, member_weight,
};

/// Streaming scorer namespace.
pub fn crate_name() -> &'static str {
    let _ = (anz_core::crate_name(), anz_algorithms::crate_name());
    "anz-online"
}
