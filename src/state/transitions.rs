//! Per-kind rocket state transitions.

use crate::error::{Result, TelemetryError};
use crate::types::{
    EventKind, ExplodedPayload, LaunchedPayload, MissionChangedPayload, Rocket,
    SpeedChangedPayload, EXPLODED_MISSION,
};
use serde::de::DeserializeOwned;

/// Apply one event to a rocket, returning the next state.
///
/// Pure: never touches a store and never reads sequence bookkeeping. The
/// payload is decoded for every recognized kind, even when the rocket has
/// exploded and the transition ends up changing nothing, so malformed
/// payloads are always reported.
///
/// Once exploded, speed stays at zero and the mission stays at
/// [`EXPLODED_MISSION`]; only a new launch clears the explosion.
pub fn apply_event(mut rocket: Rocket, kind: &EventKind, payload: &[u8]) -> Result<Rocket> {
    match kind {
        EventKind::Launched => {
            let launched: LaunchedPayload = decode(kind, payload)?;
            rocket.rocket_type = launched.rocket_type;
            rocket.speed = launched.launch_speed;
            rocket.mission = launched.mission;
            rocket.exploded = false;
            rocket.explosion_reason.clear();
        }

        EventKind::SpeedIncreased => {
            let change: SpeedChangedPayload = decode(kind, payload)?;
            if !rocket.exploded {
                rocket.speed = rocket.speed.saturating_add(change.by);
            }
        }

        // No floor: speed may go negative.
        EventKind::SpeedDecreased => {
            let change: SpeedChangedPayload = decode(kind, payload)?;
            if !rocket.exploded {
                rocket.speed = rocket.speed.saturating_sub(change.by);
            }
        }

        EventKind::Exploded => {
            let exploded: ExplodedPayload = decode(kind, payload)?;
            rocket.exploded = true;
            rocket.explosion_reason = exploded.reason;
            rocket.speed = 0;
            rocket.mission = EXPLODED_MISSION.to_string();
        }

        EventKind::MissionChanged => {
            let changed: MissionChangedPayload = decode(kind, payload)?;
            if rocket.exploded {
                tracing::debug!(
                    channel = %rocket.channel,
                    new_mission = %changed.new_mission,
                    "Mission change on exploded rocket has no effect"
                );
            } else {
                rocket.mission = changed.new_mission;
            }
        }

        EventKind::Unrecognized(tag) => {
            tracing::warn!(channel = %rocket.channel, kind = %tag, "Unrecognized event kind");
        }
    }

    Ok(rocket)
}

fn decode<T: DeserializeOwned>(kind: &EventKind, payload: &[u8]) -> Result<T> {
    serde_json::from_slice(payload).map_err(|e| TelemetryError::PayloadDecode {
        kind: kind.to_string(),
        message: e.to_string(),
    })
}
