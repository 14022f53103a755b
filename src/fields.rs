//! Enumerations and field types for task tracking.
//!
//! This module defines the lifecycle tag carried by every task and the
//! conversions between it and its on-disk / command-line text form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Task lifecycle status.
///
/// Transitions are unrestricted: any status may be overwritten with any other.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Todo,
    InProgress,
    Done,
}

impl Status {
    /// All statuses, in lifecycle order.
    pub const ALL: [Status; 3] = [Status::Todo, Status::InProgress, Status::Done];

    /// The text form used both in the backing file and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Todo => "todo",
            Status::InProgress => "in-progress",
            Status::Done => "done",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names none of the known statuses.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid status: '{0}' (must be one of: todo, in-progress, done)")]
pub struct InvalidStatus(pub String);

impl FromStr for Status {
    type Err = InvalidStatus;

    /// Parse case-insensitively, so `Done` and `DONE` are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == lowered)
            .ok_or_else(|| InvalidStatus(s.to_string()))
    }
}
