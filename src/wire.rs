//! JSON envelope accepted from telemetry producers.
//!
//! ```json
//! {
//!   "metadata": {
//!     "channel": "193270a9-c9cf-404a-8f83-838e71d9ae67",
//!     "messageNumber": 1,
//!     "messageTime": "2022-02-02T19:39:05.86337+01:00",
//!     "messageType": "RocketLaunched"
//!   },
//!   "message": { "type": "Falcon-9", "launchSpeed": 500, "mission": "ARTEMIS" }
//! }
//! ```
//!
//! Only the metadata is checked here. The `message` body stays raw until the
//! state machine decodes it for the given kind.

use crate::error::{Result, TelemetryError};
use crate::types::{Event, EventKind, Sequence, Timestamp};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

/// Routing and ordering fields of an incoming message.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub channel: String,
    pub message_number: u64,
    pub message_time: DateTime<FixedOffset>,
    pub message_type: EventKind,
}

/// A full incoming message as sent by a producer.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope {
    pub metadata: Metadata,
    pub message: Box<RawValue>,
}

impl Envelope {
    /// Decode an envelope from JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let envelope: Envelope = serde_json::from_slice(bytes)?;
        if envelope.metadata.channel.is_empty() {
            return Err(TelemetryError::InvalidEvent(
                "metadata.channel must not be empty".to_string(),
            ));
        }
        Ok(envelope)
    }

    pub fn into_event(self) -> Event {
        Event {
            channel: self.metadata.channel,
            sequence: Sequence(self.metadata.message_number),
            time: Timestamp::from_datetime(&self.metadata.message_time),
            kind: self.metadata.message_type,
            payload: self.message.get().as_bytes().to_vec(),
        }
    }
}

/// Decode JSON bytes straight into an [`Event`].
pub fn decode_event(bytes: &[u8]) -> Result<Event> {
    Ok(Envelope::from_slice(bytes)?.into_event())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LaunchedPayload;
    use serde_json::json;

    fn launched_json(channel: &str) -> Vec<u8> {
        serde_json::to_vec(&json!({
            "metadata": {
                "channel": channel,
                "messageNumber": 3,
                "messageTime": "2022-02-02T19:39:05.86337+01:00",
                "messageType": "RocketLaunched"
            },
            "message": {"type": "Falcon-9", "launchSpeed": 500, "mission": "ARTEMIS"}
        }))
        .unwrap()
    }

    #[test]
    fn test_decode_event() {
        let event = decode_event(&launched_json("193270a9")).unwrap();
        assert_eq!(event.channel, "193270a9");
        assert_eq!(event.sequence, Sequence(3));
        assert_eq!(event.kind, EventKind::Launched);

        let expected = DateTime::parse_from_rfc3339("2022-02-02T19:39:05.86337+01:00").unwrap();
        assert_eq!(event.time, Timestamp::from_datetime(&expected));

        // Payload is passed through untouched
        let payload: LaunchedPayload = serde_json::from_slice(&event.payload).unwrap();
        assert_eq!(payload.mission, "ARTEMIS");
    }

    #[test]
    fn test_empty_channel_rejected() {
        let result = decode_event(&launched_json(""));
        assert!(matches!(result, Err(TelemetryError::InvalidEvent(_))));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let result = decode_event(br#"{"invalid json"#);
        assert!(matches!(result, Err(TelemetryError::InvalidEvent(_))));
    }

    #[test]
    fn test_unknown_message_type_is_kept() {
        let bytes = serde_json::to_vec(&json!({
            "metadata": {
                "channel": "c1",
                "messageNumber": 1,
                "messageTime": "2022-02-02T19:39:05Z",
                "messageType": "RocketDocked"
            },
            "message": {}
        }))
        .unwrap();

        let event = decode_event(&bytes).unwrap();
        assert_eq!(event.kind, EventKind::Unrecognized("RocketDocked".into()));
    }
}
