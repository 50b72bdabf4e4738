// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::AnzError;
use std::fmt;
use std::str::FromStr;

/// Registry of supported statistical tests.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Method {
    Magnitude,
    Diff,
    HighRank,
    LowRank,
    Fence,
    Ks,
    Cdf,
}

impl Method {
    pub const ALL: [Method; 7] = [
        Method::Magnitude,
        Method::Diff,
        Method::HighRank,
        Method::LowRank,
        Method::Fence,
        Method::Ks,
        Method::Cdf,
    ];

    /// Methods used when a config names none.
    pub const DEFAULT_SET: [Method; 2] = [Method::Magnitude, Method::Ks];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Magnitude => "magnitude",
            Self::Diff => "diff",
            Self::HighRank => "highrank",
            Self::LowRank => "lowrank",
            Self::Fence => "fence",
            Self::Ks => "ks",
            Self::Cdf => "cdf",
        }
    }

    /// True for tests that shuffle the series and need a permutation count.
    pub const fn is_resampling(self) -> bool {
        matches!(self, Self::Diff | Self::HighRank | Self::LowRank | Self::Ks)
    }

    /// True for tests whose weight depends on their own score.
    pub const fn has_dynamic_weight(self) -> bool {
        matches!(self, Self::Magnitude | Self::Fence)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = AnzError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .into_iter()
            .find(|method| method.as_str() == raw)
            .ok_or_else(|| AnzError::unsupported_method(raw))
    }
}
