use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    Expansions,
    error::{ModelError, ModelResult},
};

/// Raw, untyped command configuration as it arrives from a task document.
pub type ParamMap = serde_json::Map<String, Value>;

/// Typed configuration for the increment command.
///
/// `IncParams` names *which* counter to bump (`key`) and *where* the
/// resulting value lands (`destination`, an expansion name). Both fields
/// may carry `${name}` references that are resolved against the task's
/// expansions right before the command runs.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncParams {
    /// Counter name sent to the service.
    #[serde(default)]
    pub key: String,

    /// Expansion name the post-increment value is published under.
    #[serde(default)]
    pub destination: String,
}

impl IncParams {
    pub fn new(key: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            destination: destination.into(),
        }
    }

    /// Decode typed params from a raw map.
    ///
    /// Unknown fields are ignored; absent fields default to empty and are
    /// caught by [`IncParams::validate`].
    pub fn from_params(params: &ParamMap) -> ModelResult<Self> {
        serde_json::from_value(Value::Object(params.clone()))
            .map_err(|e| ModelError::MalformedParams(e.to_string()))
    }

    /// Reject configurations with a blank `key` or `destination`.
    ///
    /// Blank means empty or whitespace-only. Validation runs twice: once
    /// when the raw params are decoded and once after expansion, so a
    /// reference that resolves to nothing is still caught.
    pub fn validate(&self) -> ModelResult<()> {
        if self.key.trim().is_empty() {
            return Err(ModelError::BlankField("key"));
        }
        if self.destination.trim().is_empty() {
            return Err(ModelError::BlankField("destination"));
        }
        Ok(())
    }

    /// Resolve `${name}` references in both fields and re-validate.
    pub fn expanded(&self, expansions: &Expansions) -> ModelResult<Self> {
        let resolved = Self {
            key: expansions.expand(&self.key)?,
            destination: expansions.expand(&self.destination)?,
        };
        resolved.validate()?;
        Ok(resolved)
    }
}
