//! Data types shared by the API client, storage and backup controller.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Catalog identifier assigned by the robot.
pub type ToolpathId = u64;

/// Entry from the robot's toolpath catalog listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolpathSummary {
    pub id: ToolpathId,
    pub name: String,
    /// Remaining listing fields (hash, timestamps, ...), kept as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Full toolpath as retrieved from the robot and stored on disk.
///
/// `toolpath` is the vendor payload and is never interpreted here. Any other
/// fields the robot returns are carried through `extra` so a backup file
/// holds exactly what was retrieved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Toolpath {
    pub name: String,
    pub toolpath: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Toolpath {
    pub fn new(name: impl Into<String>, toolpath: Value) -> Self {
        Self {
            name: name.into(),
            toolpath,
            extra: Map::new(),
        }
    }
}

/// Robot control state as reported in the data snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RobotState {
    Error,
    Stopping,
    Disabled,
    Ready,
    Teach,
    Running,
    Paused,
    Backdriving,
    ShuttingDown,
    Updating,
    Collision,
    #[serde(other)]
    Unknown,
}

impl RobotState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RobotState::Error => "error",
            RobotState::Stopping => "stopping",
            RobotState::Disabled => "disabled",
            RobotState::Ready => "ready",
            RobotState::Teach => "teach",
            RobotState::Running => "running",
            RobotState::Paused => "paused",
            RobotState::Backdriving => "backdriving",
            RobotState::ShuttingDown => "shutting_down",
            RobotState::Updating => "updating",
            RobotState::Collision => "collision",
            RobotState::Unknown => "unknown",
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, RobotState::Running)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, RobotState::Ready)
    }
}

impl fmt::Display for RobotState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A toolpath file found in the local backup directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalToolpathInfo {
    pub name: String,
    pub path: String,
    pub updated_at: String,
}
