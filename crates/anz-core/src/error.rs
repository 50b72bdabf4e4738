// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::score::WindowKind;

/// Errors raised by the anomaly-scoring engine.
///
/// Only configuration and input errors reach callers; `InsufficientWindow` is
/// recovered inside the ensemble as a not-applicable score.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AnzError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("unsupported detection method '{0}'")]
    UnsupportedMethod(String),
    #[error("insufficient {window} window: {available} points available, {required} required")]
    InsufficientWindow {
        window: WindowKind,
        required: usize,
        available: usize,
    },
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl AnzError {
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    pub fn unsupported_method(name: impl Into<String>) -> Self {
        Self::UnsupportedMethod(name.into())
    }

    pub fn insufficient_window(window: WindowKind, required: usize, available: usize) -> Self {
        Self::InsufficientWindow {
            window,
            required,
            available,
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// True for errors raised while validating configuration.
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::InvalidConfig(_) | Self::UnsupportedMethod(_))
    }
}
