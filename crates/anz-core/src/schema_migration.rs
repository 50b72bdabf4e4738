// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::{AnomalyzerConfig, AnzError, Evaluation, ValidatedConfig};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Current schema version written by this engine.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;
/// Maximum additive forward-compatible schema version accepted by readers.
pub const MAX_FORWARD_COMPAT_SCHEMA_VERSION: u32 = 2;
/// Path to migration guidance included in schema-version errors.
pub const MIGRATION_GUIDANCE_PATH: &str = "docs/schema_migration.md";

pub type UnknownFields = Map<String, Value>;

fn unsupported_schema_message(artifact: &str, schema_version: u32) -> String {
    format!(
        "{artifact} schema_version={schema_version} is unsupported; supported versions are {CURRENT_SCHEMA_VERSION}..={MAX_FORWARD_COMPAT_SCHEMA_VERSION}. See {MIGRATION_GUIDANCE_PATH} for migration guidance."
    )
}

/// Validates whether an artifact schema version is currently readable.
pub fn validate_schema_version(schema_version: u32, artifact: &str) -> Result<(), AnzError> {
    if (CURRENT_SCHEMA_VERSION..=MAX_FORWARD_COMPAT_SCHEMA_VERSION).contains(&schema_version) {
        return Ok(());
    }

    Err(AnzError::invalid_input(unsupported_schema_message(
        artifact,
        schema_version,
    )))
}

/// Wire format for versioned anomalyzer config payloads.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnomalyzerConfigWire {
    pub schema_version: u32,
    #[serde(flatten)]
    pub config: AnomalyzerConfig,
    #[serde(default, flatten)]
    pub unknown_fields: UnknownFields,
}

impl AnomalyzerConfigWire {
    pub fn from_runtime(config: AnomalyzerConfig) -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            config,
            unknown_fields: UnknownFields::new(),
        }
    }

    pub fn from_runtime_with_unknown(
        config: AnomalyzerConfig,
        schema_version: u32,
        unknown_fields: UnknownFields,
    ) -> Self {
        Self {
            schema_version,
            config,
            unknown_fields,
        }
    }

    /// Checks the schema version and config, returning the config with any
    /// fields this reader does not know.
    pub fn into_runtime_parts(self) -> Result<(AnomalyzerConfig, UnknownFields), AnzError> {
        validate_schema_version(self.schema_version, "AnomalyzerConfig")?;
        self.config.validate()?;
        Ok((self.config, self.unknown_fields))
    }

    pub fn to_runtime(self) -> Result<AnomalyzerConfig, AnzError> {
        let (config, _) = self.into_runtime_parts()?;
        Ok(config)
    }

    pub fn to_validated(self) -> Result<ValidatedConfig, AnzError> {
        validate_schema_version(self.schema_version, "AnomalyzerConfig")?;
        self.config.validate()
    }
}

/// Wire format for evaluation reports that preserves unknown fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvaluationWire {
    #[serde(flatten)]
    pub evaluation: Evaluation,
    #[serde(default, flatten)]
    pub unknown_fields: UnknownFields,
}

impl EvaluationWire {
    pub fn from_runtime(evaluation: Evaluation) -> Self {
        Self {
            evaluation,
            unknown_fields: UnknownFields::new(),
        }
    }

    pub fn schema_version(&self) -> u32 {
        self.evaluation.schema_version
    }

    pub fn into_runtime_parts(self) -> Result<(Evaluation, UnknownFields), AnzError> {
        validate_schema_version(self.evaluation.schema_version, "Evaluation")?;
        let probability = self.evaluation.probability;
        if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
            return Err(AnzError::invalid_input(format!(
                "Evaluation probability must be within [0, 1]; got {probability}"
            )));
        }
        Ok((self.evaluation, self.unknown_fields))
    }

    pub fn to_runtime(self) -> Result<Evaluation, AnzError> {
        let (evaluation, _) = self.into_runtime_parts()?;
        Ok(evaluation)
    }
}
