// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::AnzError;
use std::fmt;

/// Which half of a window pair a size constraint refers to.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WindowKind {
    Reference,
    Active,
}

impl WindowKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reference => "reference",
            Self::Active => "active",
        }
    }
}

impl fmt::Display for WindowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reason a test produced no score.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotApplicable {
    /// A reference or active window was shorter than the test requires.
    InsufficientWindow {
        window: WindowKind,
        required: usize,
        available: usize,
    },
    /// The series is too short for the transform the test applies.
    InsufficientData { required: usize, available: usize },
}

impl fmt::Display for NotApplicable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientWindow {
                window,
                required,
                available,
            } => write!(
                f,
                "{window} window has {available} points, {required} required"
            ),
            Self::InsufficientData {
                required,
                available,
            } => write!(f, "series has {available} points, {required} required"),
        }
    }
}

/// Outcome of a single statistical test.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Score {
    /// Probability-like score in `[0, 1]`.
    Valid(f64),
    NotApplicable(NotApplicable),
}

impl Score {
    /// Builds a valid score, clamping into `[0, 1]` and mapping NaN to 0.
    pub fn clamped(value: f64) -> Self {
        if value.is_nan() {
            return Self::Valid(0.0);
        }
        Self::Valid(value.clamp(0.0, 1.0))
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Valid(value) => Some(*value),
            Self::NotApplicable(_) => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }
}

impl From<NotApplicable> for Score {
    fn from(reason: NotApplicable) -> Self {
        Self::NotApplicable(reason)
    }
}

impl TryFrom<&AnzError> for NotApplicable {
    type Error = ();

    fn try_from(err: &AnzError) -> Result<Self, Self::Error> {
        match err {
            AnzError::InsufficientWindow {
                window,
                required,
                available,
            } => Ok(Self::InsufficientWindow {
                window: *window,
                required: *required,
                available: *available,
            }),
            _ => Err(()),
        }
    }
}
