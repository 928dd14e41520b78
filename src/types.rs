//! Core types for rocket telemetry.

use crate::store::Keyed;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mission label forced onto a rocket once it has exploded.
pub const EXPLODED_MISSION: &str = "EXPLODED";

/// Producer-assigned position of an event within one rocket's stream.
///
/// Only comparable between events for the same channel.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Sequence(pub u64);

impl fmt::Debug for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Seq({})", self.0)
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Microseconds since Unix epoch.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Current time.
    pub fn now() -> Self {
        Timestamp(Utc::now().timestamp_micros())
    }

    pub fn from_datetime<Tz: TimeZone>(dt: &DateTime<Tz>) -> Self {
        Timestamp(dt.timestamp_micros())
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({})", self.0)
    }
}

/// Kind tag of a telemetry event.
///
/// Unknown tags are kept verbatim so they can be logged; they never change
/// rocket state.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventKind {
    Launched,
    SpeedIncreased,
    SpeedDecreased,
    Exploded,
    MissionChanged,
    Unrecognized(String),
}

impl EventKind {
    /// Parse a wire tag such as `RocketLaunched`.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "RocketLaunched" => EventKind::Launched,
            "RocketSpeedIncreased" => EventKind::SpeedIncreased,
            "RocketSpeedDecreased" => EventKind::SpeedDecreased,
            "RocketExploded" => EventKind::Exploded,
            "RocketMissionChanged" => EventKind::MissionChanged,
            other => EventKind::Unrecognized(other.to_string()),
        }
    }

    pub fn as_tag(&self) -> &str {
        match self {
            EventKind::Launched => "RocketLaunched",
            EventKind::SpeedIncreased => "RocketSpeedIncreased",
            EventKind::SpeedDecreased => "RocketSpeedDecreased",
            EventKind::Exploded => "RocketExploded",
            EventKind::MissionChanged => "RocketMissionChanged",
            EventKind::Unrecognized(tag) => tag,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, EventKind::Unrecognized(_))
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

impl From<String> for EventKind {
    fn from(tag: String) -> Self {
        EventKind::from_tag(&tag)
    }
}

impl From<EventKind> for String {
    fn from(kind: EventKind) -> Self {
        kind.as_tag().to_string()
    }
}

/// One telemetry message for a single rocket.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    /// Routing key identifying the rocket.
    pub channel: String,

    /// Per-channel sequence number.
    pub sequence: Sequence,

    /// When the producer emitted the event.
    pub time: Timestamp,

    pub kind: EventKind,

    /// Kind-specific JSON payload, decoded only when applied.
    pub payload: Vec<u8>,
}

impl Event {
    pub fn new(
        channel: impl Into<String>,
        sequence: u64,
        kind: EventKind,
        payload: Vec<u8>,
    ) -> Self {
        Self {
            channel: channel.into(),
            sequence: Sequence(sequence),
            time: Timestamp::now(),
            kind,
            payload,
        }
    }

    /// Build an event with a JSON-serialized payload.
    pub fn json(
        channel: impl Into<String>,
        sequence: u64,
        kind: EventKind,
        payload: &impl Serialize,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self::new(channel, sequence, kind, serde_json::to_vec(payload)?))
    }

    pub fn with_time(mut self, time: Timestamp) -> Self {
        self.time = time;
        self
    }
}

/// Payload of `RocketLaunched`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchedPayload {
    #[serde(rename = "type")]
    pub rocket_type: String,
    pub launch_speed: i64,
    pub mission: String,
}

/// Payload of `RocketSpeedIncreased` and `RocketSpeedDecreased`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeedChangedPayload {
    pub by: i64,
}

/// Payload of `RocketExploded`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplodedPayload {
    pub reason: String,
}

/// Payload of `RocketMissionChanged`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionChangedPayload {
    pub new_mission: String,
}

/// Reconstructed state of one rocket.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rocket {
    pub channel: String,

    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub rocket_type: String,

    pub speed: i64,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub mission: String,

    pub exploded: bool,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub explosion_reason: String,

    #[serde(skip)]
    pub(crate) last_sequence: Sequence,

    #[serde(skip)]
    pub(crate) last_event_time: Timestamp,
}

impl Rocket {
    /// A rocket nothing has happened to yet.
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            rocket_type: String::new(),
            speed: 0,
            mission: String::new(),
            exploded: false,
            explosion_reason: String::new(),
            last_sequence: Sequence(0),
            last_event_time: Timestamp(0),
        }
    }

    /// Sequence of the last event applied to this rocket.
    pub fn last_sequence(&self) -> Sequence {
        self.last_sequence
    }

    /// Producer time of the last event applied to this rocket.
    pub fn last_event_time(&self) -> Timestamp {
        self.last_event_time
    }
}

impl Keyed for Rocket {
    fn key(&self) -> &str {
        &self.channel
    }
}

/// Outcome of processing one event that did not fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProcessStatus {
    /// Sequence advanced; transition applied and persisted.
    Processed,
    /// Same sequence as the last applied event; transition re-applied and persisted.
    ReprocessedDuplicate,
    /// Older than the last applied event; nothing changed.
    IgnoringOldMessage,
}

impl ProcessStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessStatus::Processed => "processed",
            ProcessStatus::ReprocessedDuplicate => "re-processed_duplicate",
            ProcessStatus::IgnoringOldMessage => "ignoring_old_message",
        }
    }
}

impl fmt::Display for ProcessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
