//! Sensu event model.
//!
//! Mirrors the subset of the Sensu Go `core/v2` event JSON that the handler
//! reads. Unknown fields are ignored so full events from `sensu-backend`
//! deserialize cleanly.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

use crate::error::EventError;

/// Check result status as reported by the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckStatus {
    /// 0
    #[default]
    Ok,
    /// 1
    Warning,
    /// 2
    Critical,
    /// Anything else
    Unknown(u32),
}

impl CheckStatus {
    /// Raw exit code for this status.
    #[must_use]
    pub const fn code(&self) -> u32 {
        match self {
            Self::Ok => 0,
            Self::Warning => 1,
            Self::Critical => 2,
            Self::Unknown(code) => *code,
        }
    }

    /// Human label used in message text.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Warning => "WARNING",
            Self::Critical => "CRITICAL",
            Self::Unknown(_) => "UNKNOWN",
        }
    }

    /// Slack attachment color for this status.
    #[must_use]
    pub const fn color(&self) -> &'static str {
        match self {
            Self::Ok => "#36a64f",       // Green
            Self::Warning => "#ffcc00",  // Amber
            Self::Critical => "#ff0000", // Red
            Self::Unknown(_) => "#6600cc", // Purple
        }
    }
}

impl From<u32> for CheckStatus {
    fn from(code: u32) -> Self {
        match code {
            0 => Self::Ok,
            1 => Self::Warning,
            2 => Self::Critical,
            other => Self::Unknown(other),
        }
    }
}

impl Serialize for CheckStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.code())
    }
}

impl<'de> Deserialize<'de> for CheckStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u32::deserialize(deserializer).map(Self::from)
    }
}

/// Sensu treats `null` and absent maps the same way.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Object metadata shared by entities and checks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectMeta {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub labels: HashMap<String, String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub annotations: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Entity {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub entity_class: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Check {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub status: CheckStatus,
    #[serde(default)]
    pub output: String,
    #[serde(default)]
    pub occurrences: i64,
    #[serde(default)]
    pub occurrences_watermark: i64,
}

/// A single check result for an entity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Event {
    /// Unix seconds
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub entity: Entity,
    #[serde(default)]
    pub check: Check,
}

impl Event {
    /// Minimal OK event in the `default` namespace.
    #[must_use]
    pub fn fixture(entity_name: &str, check_name: &str) -> Self {
        Self {
            timestamp: 0,
            entity: Entity {
                metadata: ObjectMeta {
                    name: entity_name.to_string(),
                    namespace: "default".to_string(),
                    ..ObjectMeta::default()
                },
                entity_class: "host".to_string(),
            },
            check: Check {
                metadata: ObjectMeta {
                    name: check_name.to_string(),
                    namespace: "default".to_string(),
                    ..ObjectMeta::default()
                },
                ..Check::default()
            },
        }
    }

    #[must_use]
    pub fn entity_name(&self) -> &str {
        &self.entity.metadata.name
    }

    #[must_use]
    pub fn check_name(&self) -> &str {
        &self.check.metadata.name
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.entity.metadata.namespace
    }

    /// Checks the fields every message depends on.
    pub fn validate(&self) -> Result<(), EventError> {
        if self.entity_name().is_empty() {
            return Err(EventError::MissingEntityName);
        }
        if self.check_name().is_empty() {
            return Err(EventError::MissingCheckName);
        }
        Ok(())
    }
}
