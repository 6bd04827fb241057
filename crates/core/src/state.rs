//! Completion state - the persisted flag mapping.

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use crate::id::StepId;

/// Error raised when a stored value is not a flag mapping.
#[derive(Debug, thiserror::Error)]
pub enum ParseStateError {
    /// Valid JSON, but not an object
    #[error("expected a JSON object of step flags, found {found}")]
    NotAMapping {
        /// Kind of JSON value that was found instead
        found: &'static str,
    },

    /// Not JSON at all, or an object with non-boolean flags
    #[error("malformed step flags: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Mapping of step id to completion flag.
///
/// Missing keys read as `false`. Keys that do not name a known step are kept
/// as-is so that a round trip through storage never loses data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressState(BTreeMap<StepId, bool>);

impl ProgressState {
    /// Empty state: nothing has been completed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored flag for a step, `false` when absent.
    pub fn get(&self, id: &str) -> bool {
        self.0.get(id).copied().unwrap_or(false)
    }

    /// Return a copy of this state with `id` set to complete.
    pub fn with_completed(&self, id: &StepId) -> Self {
        let mut next = self.0.clone();
        next.insert(id.clone(), true);
        Self(next)
    }

    /// Number of stored entries, including unknown keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no flags are stored.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse a stored value.
    pub fn from_json(raw: &str) -> Result<Self, ParseStateError> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        if value.is_object() {
            return Ok(serde_json::from_value(value)?);
        }
        let found = match value {
            serde_json::Value::Object(_) => "an object",
            serde_json::Value::Null => "null",
            serde_json::Value::Bool(_) => "a boolean",
            serde_json::Value::Number(_) => "a number",
            serde_json::Value::String(_) => "a string",
            serde_json::Value::Array(_) => "an array",
        };
        Err(ParseStateError::NotAMapping { found })
    }

    /// Serialize for storage.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
