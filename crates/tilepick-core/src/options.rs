//! Configuration options for the picking subsystem.

use serde::{Deserialize, Serialize};

use crate::error::{PickError, Result};
use crate::viewport::TargetSize;

/// Configuration for a [`Picker`](crate::Picker) and its GPU surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickOptions {
    /// Resolution of the offscreen pick target.
    pub target_size: TargetSize,

    /// How pick requests waiting for the next frame are handled.
    pub schedule: SchedulePolicy,

    /// Property that links a feature to the object it is part of.
    pub grouping_property: String,

    /// How the parts of a picked object are collected.
    pub aggregation: Aggregation,
}

impl Default for PickOptions {
    fn default() -> Self {
        Self {
            target_size: TargetSize::DEFAULT,
            schedule: SchedulePolicy::Queue,
            grouping_property: "building".to_string(),
            aggregation: Aggregation::Rescan,
        }
    }
}

impl PickOptions {
    /// Parses options from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Checks that the options describe a usable configuration.
    pub fn validate(&self) -> Result<()> {
        self.target_size.validate()?;
        if self.grouping_property.is_empty() {
            return Err(PickError::InvalidConfig(
                "grouping_property must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Handling of pick requests that wait for the same frame tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SchedulePolicy {
    /// Every request runs its own pass, in request order.
    #[default]
    Queue,
    /// Only the newest request runs. Superseded requests complete with no
    /// result at the next frame tick.
    LatestOnly,
}

/// Strategy for collecting the parts of a picked object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Scan every feature of every item on each hit.
    #[default]
    Rescan,
    /// Build a group index once per frame tick and share it between the
    /// passes of that tick.
    Indexed,
}
