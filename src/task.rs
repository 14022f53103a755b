//! Task data structure.
//!
//! This module defines the `Task` record persisted in the backing file. Field
//! names are serialised in camelCase (`createdAt`, `updatedAt`) so files written
//! by earlier versions of the tracker load unchanged.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, SubsecRound, Timelike};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::fields::Status;

/// A single unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: u64,
    pub description: String,
    pub status: Status,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Task {
    /// Build a fresh `todo` task whose timestamps are both "now".
    pub fn new(id: u64, description: impl Into<String>) -> Self {
        let now = Timestamp::now();
        Task {
            id,
            description: description.into(),
            status: Status::Todo,
            created_at: now,
            updated_at: now,
        }
    }

    /// Refresh `updated_at`, never moving it before `created_at`.
    pub fn touch(&mut self) {
        let now = Timestamp::now();
        self.updated_at = if now.to_local() < self.created_at.to_local() {
            self.created_at
        } else {
            now
        };
    }
}

/// An ISO-8601 timestamp as stored in the task file.
///
/// Timestamps written by the tracker carry no offset. Files edited by hand or
/// by other tools may use an explicit offset (`+02:00`, `Z`); those are kept
/// with their offset so a rewrite does not shift them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timestamp {
    Naive(NaiveDateTime),
    Offset(DateTime<FixedOffset>),
}

impl Timestamp {
    /// Current local wall-clock time at microsecond precision.
    pub fn now() -> Self {
        Timestamp::Naive(Local::now().naive_local().trunc_subsecs(6))
    }

    /// Wall-clock time in the local zone, used for ordering.
    pub fn to_local(self) -> NaiveDateTime {
        match self {
            Timestamp::Naive(naive) => naive,
            Timestamp::Offset(dt) => dt.with_timezone(&Local).naive_local(),
        }
    }
}

/// Returned when a string is not an ISO-8601 date-time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid timestamp: '{0}'")]
pub struct InvalidTimestamp(pub String);

impl FromStr for Timestamp {
    type Err = InvalidTimestamp;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(Timestamp::Offset(dt));
        }
        if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z") {
            return Ok(Timestamp::Offset(dt));
        }
        s.parse::<NaiveDateTime>()
            .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
            .map(Timestamp::Naive)
            .map_err(|_| InvalidTimestamp(s.to_string()))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::Naive(naive) => {
                write!(f, "{}", naive.format(&layout(naive.nanosecond(), "")))
            }
            Timestamp::Offset(dt) => write!(f, "{}", dt.format(&layout(dt.nanosecond(), "%:z"))),
        }
    }
}

/// Seconds-resolution layout plus as many fraction digits as the value needs
/// (none, microseconds, or nanoseconds).
fn layout(nanos: u32, zone: &str) -> String {
    let fraction = match nanos % 1_000_000_000 {
        0 => "",
        n if n % 1_000 == 0 => "%.6f",
        _ => "%.9f",
    };
    format!("%Y-%m-%dT%H:%M:%S{fraction}{zone}")
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}
